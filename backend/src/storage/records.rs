//! Raw record shapes as they sit in a backend, and their validation into
//! domain models.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::models::{parse_date, Budget, NewTransaction, Transaction, TransactionId, TransactionType, DATE_FORMAT};

/// Column order used by the CSV store
pub const TRANSACTION_HEADER: [&str; 6] = ["id", "date", "description", "amount", "type", "category"];
pub const BUDGET_HEADER: [&str; 2] = ["category", "amount"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub date: String,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub category: String,
}

impl TransactionRecord {
    pub fn from_domain(id: &TransactionId, transaction: &NewTransaction) -> Self {
        Self {
            id: id.to_string(),
            date: transaction.date.format(DATE_FORMAT).to_string(),
            description: transaction.description.clone(),
            amount: transaction.amount,
            transaction_type: transaction.transaction_type.as_str().to_string(),
            category: transaction.category.clone(),
        }
    }

    /// Validate a stored record; malformed data fails here rather than downstream
    pub fn into_domain(self) -> Result<Transaction> {
        if self.id.trim().is_empty() {
            bail!("stored transaction has an empty id");
        }
        let date = parse_date(&self.date)
            .with_context(|| format!("stored transaction {} has invalid date '{}'", self.id, self.date))?;
        let transaction_type: TransactionType = self
            .transaction_type
            .parse()
            .map_err(|e| anyhow!("stored transaction {}: {}", self.id, e))?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            bail!("stored transaction {} has non-positive amount {}", self.id, self.amount);
        }
        if self.category.trim().is_empty() {
            bail!("stored transaction {} has an empty category", self.id);
        }

        Ok(Transaction {
            id: TransactionId::new(self.id),
            date,
            description: self.description.filter(|d| !d.is_empty()),
            amount: self.amount,
            transaction_type,
            category: self.category,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub category: String,
    pub amount: f64,
}

impl BudgetRecord {
    pub fn from_domain(budget: &Budget) -> Self {
        Self {
            category: budget.category.clone(),
            amount: budget.amount,
        }
    }

    pub fn into_domain(self) -> Result<Budget> {
        if self.category.trim().is_empty() {
            bail!("stored budget has an empty category");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            bail!("stored budget '{}' has non-positive amount {}", self.category, self.amount);
        }
        Ok(Budget {
            category: self.category,
            amount: self.amount,
        })
    }
}
