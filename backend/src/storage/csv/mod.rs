//! # CSV Storage Module
//!
//! Document-style backend: each collection is one CSV file under the data
//! directory. Transactions get generated UUID keys; budgets are keyed by
//! normalized category name. Month queries are date range predicates over the
//! parsed records, never string prefix matches.
//!
//! ## File Format
//!
//! ```csv
//! id,date,description,amount,type,category
//! 3f1c0c2e-5a7b-4d4e-9a43-0d2b8f6f1a11,2024-02-29,Lunch,25000.0,Expense,Food
//! ```
//!
//! ```csv
//! category,amount
//! Food,100000.0
//! ```

pub mod budget_repository;
pub mod connection;
pub mod transaction_repository;

pub use budget_repository::CsvBudgetRepository;
pub use connection::CsvConnection;
pub use transaction_repository::CsvTransactionRepository;
