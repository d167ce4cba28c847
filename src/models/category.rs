//! Category reference lists
//!
//! Categories are free text on a transaction; these lists are what the
//! entry forms offer. Matching between a budget's category and a
//! transaction's category is trimmed and case-insensitive.

/// Fallback bucket for blank categories
pub const OTHERS: &str = "Others";

/// Categories offered when recording an expense
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Bills",
    "Shopping",
    "Entertainment",
    "Health",
    "Travel",
    OTHERS,
];

/// Categories shown on the budget screen before the user adds any
pub const BUDGET_DEFAULT_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Bills",
    "Shopping",
    "Entertainment",
];

/// Categories offered when recording income
pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Bonus",
    "Investment Return",
    "Rental Income",
    "Gift",
    "Business",
    OTHERS,
];

pub const PAYMENT_METHODS: &[&str] = &["Cash", "UPI", "Credit Card", "Debit Card", "Net Banking"];

/// Trimmed, lowercased key used for category identity
pub fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether two category labels refer to the same category
pub fn same_category(a: &str, b: &str) -> bool {
    category_key(a) == category_key(b)
}

/// Resolve user input against a reference list, keeping the canonical
/// spelling when it matches and the trimmed input otherwise
pub fn canonical_name(input: &str, list: &[&str]) -> String {
    list.iter()
        .find(|known| same_category(known, input))
        .map(|known| known.to_string())
        .unwrap_or_else(|| input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_category() {
        assert!(same_category("Food & Dining", "  food & dining "));
        assert!(!same_category("Bills", "Bill"));
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("upi", PAYMENT_METHODS), "UPI");
        assert_eq!(canonical_name(" Pets ", EXPENSE_CATEGORIES), "Pets");
    }

    #[test]
    fn test_budget_defaults_are_expense_categories() {
        for name in BUDGET_DEFAULT_CATEGORIES {
            assert!(EXPENSE_CATEGORIES.contains(name));
        }
    }
}
