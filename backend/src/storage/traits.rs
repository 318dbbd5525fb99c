//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::{Budget, NewTransaction, Transaction, TransactionId};

/// Trait defining the interface for transaction storage operations
///
/// Implementations validate every stored record on read, so a malformed row
/// surfaces as an error instead of a half-populated `Transaction`.
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    /// Insert a new transaction and return the identifier assigned to it
    async fn store_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId>;

    /// Retrieve a specific transaction by ID
    async fn get_transaction(&self, id: &TransactionId) -> Result<Option<Transaction>>;

    /// All transactions, most recent date first
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Transactions dated within `[start, end]` inclusive, most recent date first
    async fn list_transactions_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>>;

    /// Replace every field except the id.
    /// Returns false if no transaction has that id.
    async fn update_transaction(&self, id: &TransactionId, transaction: &NewTransaction) -> Result<bool>;

    /// Returns true if the transaction was found and deleted, false otherwise
    async fn delete_transaction(&self, id: &TransactionId) -> Result<bool>;
}

/// Trait defining the interface for budget storage operations.
/// Budgets are keyed by their normalized category.
#[async_trait]
pub trait BudgetStorage: Send + Sync {
    /// Insert the budget, or overwrite the amount if the category already exists
    async fn upsert_budget(&self, budget: &Budget) -> Result<()>;

    /// All budgets ordered by category ascending
    async fn list_budgets(&self) -> Result<Vec<Budget>>;

    /// Category names ordered ascending
    async fn list_budget_categories(&self) -> Result<Vec<String>>;

    /// Returns true if a budget was found and deleted, false otherwise
    async fn delete_budget(&self, category: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (database, CSV, etc.)
/// and provides factory methods for creating repositories.
pub trait Connection: Send + Sync + Clone {
    type TransactionRepository: TransactionStorage + 'static;
    type BudgetRepository: BudgetStorage + 'static;

    fn create_transaction_repository(&self) -> Self::TransactionRepository;

    fn create_budget_repository(&self) -> Self::BudgetRepository;
}
