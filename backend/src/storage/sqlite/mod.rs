//! # SQLite Storage Module
//!
//! Embedded relational backend. Two tables: `budgets` (unique category key +
//! amount) and `transactions` (autoincrement id, ISO date text, description,
//! amount, type with a CHECK constraint, category).

pub mod budget_repository;
pub mod connection;
pub mod transaction_repository;

pub use budget_repository::SqliteBudgetRepository;
pub use connection::DbConnection;
pub use transaction_repository::SqliteTransactionRepository;
