use anyhow::Result;
use async_trait::async_trait;

use super::connection::CsvConnection;
use crate::domain::models::Budget;
use crate::domain::normalization::normalize_category;
use crate::storage::records::{BudgetRecord, BUDGET_HEADER};
use crate::storage::traits::BudgetStorage;

/// CSV-based budget collection keyed by normalized category name
#[derive(Clone)]
pub struct CsvBudgetRepository {
    connection: CsvConnection,
}

impl CsvBudgetRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<Vec<BudgetRecord>> {
        self.connection.read_records(&self.connection.budgets_file_path())
    }

    fn write_records(&self, records: &[BudgetRecord]) -> Result<()> {
        self.connection
            .write_records(&self.connection.budgets_file_path(), &BUDGET_HEADER, records)
    }

    fn read_budgets(&self) -> Result<Vec<Budget>> {
        let mut budgets = self
            .read_records()?
            .into_iter()
            .map(BudgetRecord::into_domain)
            .collect::<Result<Vec<_>>>()?;
        budgets.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(budgets)
    }

    fn upsert(&self, budget: &Budget) -> Result<()> {
        let _guard = self.connection.lock();
        let category = normalize_category(&budget.category);
        let mut records = self.read_records()?;

        match records.iter_mut().find(|r| r.category == category) {
            Some(existing) => existing.amount = budget.amount,
            None => records.push(BudgetRecord::from_domain(&Budget {
                category,
                amount: budget.amount,
            })),
        }

        self.write_records(&records)
    }

    fn remove(&self, category: &str) -> Result<bool> {
        let _guard = self.connection.lock();
        let category = normalize_category(category);
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.category != category);
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records)?;
        Ok(true)
    }
}

#[async_trait]
impl BudgetStorage for CsvBudgetRepository {
    async fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        self.upsert(budget)
    }

    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.read_budgets()
    }

    async fn list_budget_categories(&self) -> Result<Vec<String>> {
        Ok(self.read_budgets()?.into_iter().map(|b| b.category).collect())
    }

    async fn delete_budget(&self, category: &str) -> Result<bool> {
        self.remove(category)
    }
}
