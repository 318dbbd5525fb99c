pub mod ai_parsing_service;
pub mod budget_service;
pub mod errors;
pub mod models;
pub mod normalization;
pub mod reporting;
pub mod transaction_service;

pub use ai_parsing_service::{AiParsingService, ParsedDraft};
pub use budget_service::BudgetService;
pub use errors::{FinanceError, FinanceResult};
pub use reporting::ReportingService;
pub use transaction_service::{RecordedTransaction, TransactionInput, TransactionService};
