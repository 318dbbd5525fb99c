//! Budget service: monthly category caps and the category lists derived from them.
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{FinanceError, FinanceResult};
use crate::domain::models::Budget;
use crate::domain::normalization::{normalize_category, CategoryLists};
use crate::storage::traits::BudgetStorage;

#[derive(Clone)]
pub struct BudgetService {
    budget_repository: Arc<dyn BudgetStorage>,
    income_categories: Vec<String>,
}

impl BudgetService {
    pub fn new(budget_repository: Arc<dyn BudgetStorage>, income_categories: Vec<String>) -> Self {
        Self {
            budget_repository,
            income_categories,
        }
    }

    fn validate(category: &str, amount: f64) -> FinanceResult<Budget> {
        let category = normalize_category(category);
        if category.is_empty() {
            return Err(FinanceError::validation("budget category must not be empty"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FinanceError::validation(format!(
                "budget amount must be greater than zero, got {}",
                amount
            )));
        }
        Ok(Budget { category, amount })
    }

    /// Insert or overwrite the budget for a category
    pub async fn set_budget(&self, category: &str, amount: f64) -> FinanceResult<Budget> {
        let budget = Self::validate(category, amount)?;
        self.budget_repository.upsert_budget(&budget).await?;
        info!("Set budget for {} to {}", budget.category, budget.amount);
        Ok(budget)
    }

    /// All budgets, category ascending
    pub async fn list_budgets(&self) -> FinanceResult<Vec<Budget>> {
        Ok(self.budget_repository.list_budgets().await?)
    }

    pub async fn budget_categories(&self) -> FinanceResult<Vec<String>> {
        Ok(self.budget_repository.list_budget_categories().await?)
    }

    /// Idempotent; returns whether a budget existed
    pub async fn delete_budget(&self, category: &str) -> FinanceResult<bool> {
        let category = normalize_category(category);
        let deleted = self.budget_repository.delete_budget(&category).await?;
        if deleted {
            info!("Deleted budget for {}", category);
        }
        Ok(deleted)
    }

    /// Expense list from the stored budgets, income list from configuration
    pub async fn category_lists(&self) -> FinanceResult<CategoryLists> {
        let expense = self.budget_categories().await?;
        Ok(CategoryLists::new(expense, &self.income_categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalization::{EXPENSE_FALLBACK_CATEGORY, INCOME_FALLBACK_CATEGORY};
    use crate::storage::sqlite::{DbConnection, SqliteBudgetRepository};

    async fn create_test_service() -> BudgetService {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        BudgetService::new(
            Arc::new(SqliteBudgetRepository::new(db)),
            vec!["Salary".to_string(), "bonus".to_string()],
        )
    }

    #[tokio::test]
    async fn test_set_budget_normalizes_and_upserts() {
        let service = create_test_service().await;

        let stored = service.set_budget("  food ", 100000.0).await.unwrap();
        assert_eq!(stored.category, "Food");
        service.set_budget("FOOD", 120000.0).await.unwrap();

        let budgets = service.list_budgets().await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 120000.0);
    }

    #[tokio::test]
    async fn test_set_budget_rejects_invalid_input() {
        let service = create_test_service().await;

        assert!(matches!(service.set_budget("Food", 0.0).await, Err(FinanceError::Validation(_))));
        assert!(matches!(service.set_budget("Food", -5.0).await, Err(FinanceError::Validation(_))));
        assert!(matches!(service.set_budget("Food", f64::NAN).await, Err(FinanceError::Validation(_))));
        assert!(matches!(service.set_budget("   ", 10.0).await, Err(FinanceError::Validation(_))));
        assert!(service.list_budgets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_budget_is_idempotent() {
        let service = create_test_service().await;
        service.set_budget("Food", 1.0).await.unwrap();

        assert!(service.delete_budget(" FOOD ").await.unwrap());
        assert!(!service.delete_budget("food").await.unwrap());
    }

    #[tokio::test]
    async fn test_category_lists_combine_budgets_and_income() {
        let service = create_test_service().await;
        service.set_budget("transport", 1.0).await.unwrap();
        service.set_budget("food", 1.0).await.unwrap();

        let lists = service.category_lists().await.unwrap();
        assert_eq!(lists.expense(), ["Food", "Transport", EXPENSE_FALLBACK_CATEGORY]);
        assert_eq!(lists.income(), ["Salary", "Bonus", INCOME_FALLBACK_CATEGORY]);
    }
}
