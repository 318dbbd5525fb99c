//! Transaction service domain logic for the finance tracker.
//!
//! Every write goes through [`TransactionService::prepare`], which validates the
//! amount, normalizes type and category, and reconciles the category against the
//! current category lists. Nothing is written when validation fails.
use chrono::NaiveDate;
use shared::MonthKey;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::budget_service::BudgetService;
use crate::domain::errors::{FinanceError, FinanceResult};
use crate::domain::models::{NewTransaction, Transaction, TransactionId, TransactionType};
use crate::domain::normalization::{normalize_category, normalize_type, reconcile_category};
use crate::storage::traits::TransactionStorage;

/// Raw transaction fields as submitted by a caller
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub amount: f64,
    pub transaction_type: String,
    pub category: String,
}

/// A stored transaction plus the fallback warning, if the category was replaced
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTransaction {
    pub transaction: Transaction,
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionStorage>,
    budget_service: BudgetService,
}

impl TransactionService {
    pub fn new(transaction_repository: Arc<dyn TransactionStorage>, budget_service: BudgetService) -> Self {
        Self {
            transaction_repository,
            budget_service,
        }
    }

    /// `stored` is the type and category already on record. That pair stays
    /// valid even if the category has left the lists, as long as an edit
    /// changes neither of them.
    async fn prepare(
        &self,
        input: TransactionInput,
        stored: Option<(TransactionType, &str)>,
    ) -> FinanceResult<(NewTransaction, Option<String>)> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(FinanceError::validation(format!(
                "amount must be greater than zero, got {}",
                input.amount
            )));
        }

        let transaction_type = normalize_type(&input.transaction_type)?;
        let category = normalize_category(&input.category);
        if category.is_empty() {
            return Err(FinanceError::validation("category must not be empty"));
        }

        let (category, warning) = if stored == Some((transaction_type, category.as_str())) {
            (category, None)
        } else {
            let lists = self.budget_service.category_lists().await?;
            let reconciliation = reconcile_category(transaction_type, &category, &lists);
            let warning = reconciliation.warning(transaction_type);
            if let Some(message) = &warning {
                warn!("{}", message);
            }
            (reconciliation.category, warning)
        };

        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok((
            NewTransaction {
                date: input.date,
                description,
                amount: input.amount,
                transaction_type,
                category,
            },
            warning,
        ))
    }

    pub async fn add_transaction(&self, input: TransactionInput) -> FinanceResult<RecordedTransaction> {
        let (new_transaction, warning) = self.prepare(input, None).await?;
        let id = self.transaction_repository.store_transaction(&new_transaction).await?;
        info!(
            "Recorded {} of {} in {} as {}",
            new_transaction.transaction_type, new_transaction.amount, new_transaction.category, id
        );

        Ok(RecordedTransaction {
            transaction: new_transaction.with_id(id),
            warning,
        })
    }

    /// Full replace of every field except the id
    pub async fn update_transaction(
        &self,
        id: &TransactionId,
        input: TransactionInput,
    ) -> FinanceResult<RecordedTransaction> {
        let existing = self.get_transaction(id).await?;
        let (new_transaction, warning) = self
            .prepare(input, Some((existing.transaction_type, existing.category.as_str())))
            .await?;

        if !self.transaction_repository.update_transaction(id, &new_transaction).await? {
            return Err(FinanceError::NotFound(format!("transaction {}", id)));
        }
        info!("Updated transaction {}", id);

        Ok(RecordedTransaction {
            transaction: new_transaction.with_id(id.clone()),
            warning,
        })
    }

    /// Idempotent; returns whether a transaction existed
    pub async fn delete_transaction(&self, id: &TransactionId) -> FinanceResult<bool> {
        let deleted = self.transaction_repository.delete_transaction(id).await?;
        if deleted {
            info!("Deleted transaction {}", id);
        }
        Ok(deleted)
    }

    pub async fn get_transaction(&self, id: &TransactionId) -> FinanceResult<Transaction> {
        self.transaction_repository
            .get_transaction(id)
            .await?
            .ok_or_else(|| FinanceError::NotFound(format!("transaction {}", id)))
    }

    /// All transactions, most recent date first
    pub async fn list_transactions(&self) -> FinanceResult<Vec<Transaction>> {
        Ok(self.transaction_repository.list_transactions().await?)
    }

    /// Transactions dated from the first to the last day of `month`, inclusive
    pub async fn transactions_for_month(&self, month: MonthKey) -> FinanceResult<Vec<Transaction>> {
        Ok(self
            .transaction_repository
            .list_transactions_between(month.first_day(), month.last_day())
            .await?)
    }
}
