//! Conversions between the shared API types and the domain layer.

use chrono::{Local, NaiveDate};
use shared::{
    Budget as SharedBudget, CreateTransactionRequest, CreateTransactionResponse, MonthKey,
    ParseTransactionResponse, Transaction as SharedTransaction,
};

use crate::domain::errors::{FinanceError, FinanceResult};
use crate::domain::models::{parse_date, Budget as DomainBudget, Transaction as DomainTransaction};
use crate::domain::{ParsedDraft, RecordedTransaction, TransactionInput};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id.to_string(),
            date: domain.date_string(),
            description: domain.description,
            amount: domain.amount,
            transaction_type: domain.transaction_type,
            category: domain.category,
        }
    }

    pub fn to_dtos(domain: Vec<DomainTransaction>) -> Vec<SharedTransaction> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn recorded_to_dto(recorded: RecordedTransaction) -> CreateTransactionResponse {
        CreateTransactionResponse {
            transaction: Self::to_dto(recorded.transaction),
            warning: recorded.warning,
        }
    }

    /// A missing date means today
    pub fn to_input(request: CreateTransactionRequest) -> FinanceResult<TransactionInput> {
        Ok(TransactionInput {
            date: parse_optional_date(request.date.as_deref())?.unwrap_or_else(|| Local::now().date_naive()),
            description: request.description,
            amount: request.amount,
            transaction_type: request.transaction_type,
            category: request.category,
        })
    }

    /// An update replaces every field, so the date must be given
    pub fn to_update_input(request: CreateTransactionRequest) -> FinanceResult<TransactionInput> {
        if parse_optional_date(request.date.as_deref())?.is_none() {
            return Err(FinanceError::validation("date is required when updating a transaction"));
        }
        Self::to_input(request)
    }
}

pub struct BudgetMapper;

impl BudgetMapper {
    pub fn to_dto(domain: DomainBudget) -> SharedBudget {
        SharedBudget {
            category: domain.category,
            amount: domain.amount,
        }
    }

    pub fn to_dtos(domain: Vec<DomainBudget>) -> Vec<SharedBudget> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}

pub fn parsed_draft_to_dto(parsed: ParsedDraft) -> ParseTransactionResponse {
    ParseTransactionResponse {
        draft: parsed.draft,
        warning: parsed.warning,
    }
}

/// `None` and blank strings both mean "not given"
pub fn parse_optional_date(raw: Option<&str>) -> FinanceResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| FinanceError::validation(format!("date must be YYYY-MM-DD, got '{}'", s))),
        None => Ok(None),
    }
}

pub fn parse_month(raw: &str) -> FinanceResult<MonthKey> {
    raw.parse::<MonthKey>()
        .map_err(|e| FinanceError::validation(e.to_string()))
}
