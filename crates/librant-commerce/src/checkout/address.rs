//! Shipping address and its form validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Shipping details entered at checkout.
///
/// Serialized in the backend's camelCase shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub address_line1: String,
    /// Apartment, suite, etc. Optional, sent as an empty string when absent.
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    /// State or division.
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone_number: String,
}

impl ShippingAddress {
    /// Check every required field, collecting all failures in form order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        for field in AddressField::REQUIRED {
            if self.value(field).trim().is_empty() {
                errors.push(FieldError::missing(field));
            } else if field == AddressField::Email && !is_valid_email(self.email.trim()) {
                errors.push(FieldError {
                    field,
                    message: "Please enter a valid email".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Format as a single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address_line1.trim()];
        if !self.address_line2.trim().is_empty() {
            parts.push(self.address_line2.trim());
        }
        parts.push(self.city.trim());
        parts.push(self.state.trim());
        parts.push(self.postal_code.trim());
        parts.push(self.country.trim());
        parts.join(", ")
    }

    fn value(&self, field: AddressField) -> &str {
        match field {
            AddressField::FullName => &self.full_name,
            AddressField::Email => &self.email,
            AddressField::AddressLine1 => &self.address_line1,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Country => &self.country,
            AddressField::PostalCode => &self.postal_code,
            AddressField::PhoneNumber => &self.phone_number,
        }
    }
}

/// A required checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    FullName,
    Email,
    AddressLine1,
    City,
    State,
    Country,
    PostalCode,
    PhoneNumber,
}

impl AddressField {
    /// Required fields in form order.
    pub const REQUIRED: [AddressField; 8] = [
        AddressField::FullName,
        AddressField::Email,
        AddressField::AddressLine1,
        AddressField::City,
        AddressField::State,
        AddressField::Country,
        AddressField::PostalCode,
        AddressField::PhoneNumber,
    ];

    /// Form field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::FullName => "fullName",
            AddressField::Email => "email",
            AddressField::AddressLine1 => "addressLine1",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Country => "country",
            AddressField::PostalCode => "postalCode",
            AddressField::PhoneNumber => "phoneNumber",
        }
    }

    fn missing_message(&self) -> &'static str {
        match self {
            AddressField::FullName => "Please enter your full name",
            AddressField::Email => "Please enter your email",
            AddressField::AddressLine1 => "Please enter your address",
            AddressField::City => "Please enter your city",
            AddressField::State => "Please enter your division",
            AddressField::Country => "Please select your country",
            AddressField::PostalCode => "Please enter your postal code",
            AddressField::PhoneNumber => "Please enter your phone number",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field failure, shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: AddressField,
    pub message: String,
}

impl FieldError {
    fn missing(field: AddressField) -> Self {
        Self {
            field,
            message: field.missing_message().to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Rejects every address if the pattern fails to compile.
fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}
