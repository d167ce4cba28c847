//! User profile model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency label used when the user has not picked one
pub const DEFAULT_CURRENCY: &str = "INR - ₹ India";

/// Currencies offered in settings, as "CODE - SYMBOL Country"
pub const CURRENCY_OPTIONS: &[&str] = &[
    DEFAULT_CURRENCY,
    "USD - $ United States",
    "EUR - € Europe",
    "GBP - £ United Kingdom",
    "JPY - ¥ Japan",
];

/// Profile fields synced to the document store and cached in settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            currency: default_currency(),
        }
    }
}

impl Profile {
    /// Currency symbol from the label, "₹" when it cannot be extracted
    pub fn currency_symbol(&self) -> &str {
        currency_symbol(&self.currency)
    }

    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            return Err(ProfileValidationError::InvalidEmail(self.email.clone()));
        }
        let phone_ok = self
            .phone
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == ' ' || c == '-');
        if !phone_ok {
            return Err(ProfileValidationError::InvalidPhone(self.phone.clone()));
        }
        Ok(())
    }
}

/// Extract the symbol from a "CODE - SYMBOL Country" label
pub fn currency_symbol(label: &str) -> &str {
    let symbol = label
        .split_once(" - ")
        .map(|(_, rest)| rest.split(' ').next().unwrap_or(""))
        .unwrap_or("");
    if symbol.trim().is_empty() {
        "₹"
    } else {
        symbol
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.name, self.email, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyName,
    InvalidEmail(String),
    InvalidPhone(String),
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::InvalidEmail(e) => write!(f, "Invalid email address: {}", e),
            Self::InvalidPhone(p) => write!(f, "Invalid phone number: {}", p),
        }
    }
}

impl std::error::Error for ProfileValidationError {}
