//! Domain model for a transaction.
use chrono::NaiveDate;
use std::fmt;

pub use shared::TransactionType;

/// Storage format for transaction dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date. chrono alone accepts short years, unpadded
/// fields and a leading sign, so the shape is checked first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Opaque identifier assigned by the storage backend on creation.
/// SQLite renders its autoincrement key as text, the CSV store uses a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A validated, normalized transaction that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
}

impl NewTransaction {
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_requires_iso_shape() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("0024-02-05"), NaiveDate::from_ymd_opt(24, 2, 5));

        for bad in ["24-02-05", "2024-2-5", "+2024-02-05", "2024-02-5 ", "2024/02/05", "2023-02-29", ""] {
            assert_eq!(parse_date(bad), None, "accepted '{}'", bad);
        }
    }
}
