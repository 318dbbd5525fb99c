pub mod budget;
pub mod transaction;

pub use budget::Budget;
pub use transaction::{parse_date, NewTransaction, Transaction, TransactionId, TransactionType, DATE_FORMAT};
