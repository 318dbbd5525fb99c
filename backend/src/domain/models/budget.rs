//! Domain model for a monthly category budget.

/// Monthly cap for one category. The normalized category is the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub category: String,
    pub amount: f64,
}
