//! Book browsing query.

use crate::catalog::Book;
use crate::search::{FilterParseError, FilterToggle, PriceRange};
use serde::{Deserialize, Serialize};

/// Sort options for the book list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    /// Price, low to high.
    PriceAsc,
    /// Price, high to low.
    PriceDesc,
}

impl SortOption {
    /// Parse a sort dropdown key (`"l-t-h"` or `"h-t-l"`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "l-t-h" => Some(SortOption::PriceAsc),
            "h-t-l" => Some(SortOption::PriceDesc),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortOption::PriceAsc => "l-t-h",
            SortOption::PriceDesc => "h-t-l",
        }
    }

    /// `sortOrder` query value.
    pub fn sort_order(&self) -> &'static str {
        match self {
            SortOption::PriceAsc => "asc",
            SortOption::PriceDesc => "desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::PriceAsc => "Price \u{2191}",
            SortOption::PriceDesc => "Price \u{2193}",
        }
    }
}

/// The browsing page's active filters.
///
/// Dimensions combine with AND, values inside one dimension with OR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFilter {
    /// Free text matched against title or author.
    pub search_term: Option<String>,
    pub price: Option<PriceRange>,
    /// Checked authors in the order they were checked.
    pub authors: Vec<String>,
    /// Checked categories in the order they were checked.
    pub categories: Vec<String>,
    pub sort: Option<SortOption>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a checkbox change.
    ///
    /// A checked range replaces the previous one; unchecking any range clears
    /// the price filter.
    pub fn toggle(&mut self, toggle: FilterToggle, checked: bool) {
        match toggle {
            FilterToggle::PriceRange(range) => {
                self.price = checked.then_some(range);
            }
            FilterToggle::Author(name) => set_membership(&mut self.authors, name, checked),
            FilterToggle::Category(name) => set_membership(&mut self.categories, name, checked),
        }
    }

    /// Parse and apply a raw checkbox value.
    pub fn toggle_value(&mut self, raw: &str, checked: bool) -> Result<(), FilterParseError> {
        let toggle = FilterToggle::parse(raw)?;
        self.toggle(toggle, checked);
        Ok(())
    }

    /// Set the free-text search. Blank input clears it.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim();
        self.search_term = (!term.is_empty()).then(|| term.to_string());
    }

    /// Set the sort from a dropdown key. Unknown keys leave the sort unchanged
    /// and return `false`.
    pub fn set_sort_key(&mut self, key: &str) -> bool {
        match SortOption::from_key(key) {
            Some(sort) => {
                self.sort = Some(sort);
                true
            }
            None => false,
        }
    }

    /// Check if any filter or sort is active.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_none()
            && self.price.is_none()
            && self.authors.is_empty()
            && self.categories.is_empty()
            && self.sort.is_none()
    }

    /// Reset to no filters and no sort.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check one book against every active dimension.
    pub fn matches(&self, book: &Book) -> bool {
        let term_ok = self.search_term.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            book.title.to_lowercase().contains(&term) || book.author.to_lowercase().contains(&term)
        });
        let price_ok = self
            .price
            .map_or(true, |range| range.contains(book.price.to_decimal()));
        let author_ok = any_matches(&self.authors, &book.author);
        let category_ok = any_matches(&self.categories, &book.category);

        term_ok && price_ok && author_ok && category_ok
    }

    /// Filter then sort. Sorting is stable, so equal prices keep list order.
    pub fn apply<'a>(&self, books: &'a [Book]) -> Vec<&'a Book> {
        let mut selected: Vec<&Book> = books.iter().filter(|b| self.matches(b)).collect();
        match self.sort {
            Some(SortOption::PriceAsc) => selected.sort_by_key(|b| b.price.amount_cents),
            Some(SortOption::PriceDesc) => {
                selected.sort_by_key(|b| std::cmp::Reverse(b.price.amount_cents))
            }
            None => {}
        }
        selected
    }

    /// Backend query parameters for this filter. Multi-valued dimensions
    /// repeat their key.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(term) = &self.search_term {
            pairs.push(("searchTerm", term.clone()));
        }
        if let Some(range) = self.price {
            pairs.push(("minPrice", range.min.to_string()));
            pairs.push(("maxPrice", range.max.to_string()));
        }
        pairs.extend(self.authors.iter().map(|a| ("author", a.clone())));
        pairs.extend(self.categories.iter().map(|c| ("category", c.clone())));
        if let Some(sort) = self.sort {
            pairs.push(("sortBy", "price".to_string()));
            pairs.push(("sortOrder", sort.sort_order().to_string()));
        }
        pairs
    }
}

fn set_membership(values: &mut Vec<String>, name: String, checked: bool) {
    let present = values.iter().position(|v| v.eq_ignore_ascii_case(&name));
    match (checked, present) {
        (true, None) => values.push(name),
        (false, Some(index)) => {
            values.remove(index);
        }
        _ => {}
    }
}

fn any_matches(wanted: &[String], actual: &str) -> bool {
    wanted.is_empty()
        || wanted
            .iter()
            .any(|w| w.trim().eq_ignore_ascii_case(actual.trim()))
}
