//! Filter checkbox values.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An inclusive price range in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Parse `"<min>,<max>"`, e.g. `"20,50"`.
    pub fn parse(value: &str) -> Result<Self, FilterParseError> {
        let invalid = || FilterParseError::InvalidRange(value.to_string());

        let (min, max) = value.split_once(',').ok_or_else(invalid)?;
        let min: f64 = min.trim().parse().map_err(|_| invalid())?;
        let max: f64 = max.trim().parse().map_err(|_| invalid())?;

        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(invalid());
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

/// One filter checkbox, parsed from its `"<dimension>-<value>"` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterToggle {
    /// `range-<min>,<max>`
    PriceRange(PriceRange),
    /// `author-<name>`
    Author(String),
    /// `category-<name>`
    Category(String),
}

impl FilterToggle {
    /// Parse a checkbox value. Only the first `-` separates the dimension, so
    /// names may contain dashes.
    ///
    /// ```
    /// use librant_commerce::search::FilterToggle;
    /// let toggle = FilterToggle::parse("author-Jean-Paul Sartre").unwrap();
    /// assert_eq!(toggle, FilterToggle::Author("Jean-Paul Sartre".into()));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, FilterParseError> {
        let (dimension, value) = raw
            .split_once('-')
            .ok_or_else(|| FilterParseError::MissingSeparator(raw.to_string()))?;

        let value = value.trim();
        if value.is_empty() {
            return Err(FilterParseError::EmptyValue(raw.to_string()));
        }

        match dimension.trim() {
            "range" => Ok(FilterToggle::PriceRange(PriceRange::parse(value)?)),
            "author" => Ok(FilterToggle::Author(value.to_string())),
            "category" => Ok(FilterToggle::Category(value.to_string())),
            other => Err(FilterParseError::UnknownDimension(other.to_string())),
        }
    }
}

/// A checkbox value that could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("Filter value has no dimension: {0}")]
    MissingSeparator(String),

    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),

    #[error("Filter value is empty: {0}")]
    EmptyValue(String),

    #[error("Invalid price range: {0}")]
    InvalidRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(
            FilterToggle::parse("range-0,20").unwrap(),
            FilterToggle::PriceRange(PriceRange { min: 0.0, max: 20.0 })
        );
        assert_eq!(
            FilterToggle::parse("range-100,500").unwrap(),
            FilterToggle::PriceRange(PriceRange { min: 100.0, max: 500.0 })
        );
    }

    #[test]
    fn test_parse_category_with_dash() {
        assert_eq!(
            FilterToggle::parse("category-Self-Help").unwrap(),
            FilterToggle::Category("Self-Help".into())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            FilterToggle::parse("fiction"),
            Err(FilterParseError::MissingSeparator("fiction".into()))
        );
        assert_eq!(
            FilterToggle::parse("publisher-Penguin"),
            Err(FilterParseError::UnknownDimension("publisher".into()))
        );
        assert_eq!(
            FilterToggle::parse("author- "),
            Err(FilterParseError::EmptyValue("author- ".into()))
        );
        assert!(matches!(
            FilterToggle::parse("range-50"),
            Err(FilterParseError::InvalidRange(_))
        ));
        assert!(matches!(
            FilterToggle::parse("range-50,20"),
            Err(FilterParseError::InvalidRange(_))
        ));
        assert!(matches!(
            FilterToggle::parse("range-a,b"),
            Err(FilterParseError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let range = PriceRange::parse("20,50").unwrap();
        assert!(range.contains(20.0));
        assert!(range.contains(50.0));
        assert!(!range.contains(50.01));
        assert_eq!(range.to_string(), "20,50");
    }
}
