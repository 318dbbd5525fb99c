use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::connection::DbConnection;
use crate::domain::models::Budget;
use crate::domain::normalization::normalize_category;
use crate::storage::records::BudgetRecord;
use crate::storage::traits::BudgetStorage;

/// Repository for budget rows in SQLite, keyed by the unique category column
#[derive(Clone)]
pub struct SqliteBudgetRepository {
    db: DbConnection,
}

impl SqliteBudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn to_domain(row: &SqliteRow) -> Result<Budget> {
        BudgetRecord {
            category: row.try_get("category")?,
            amount: row.try_get("amount")?,
        }
        .into_domain()
    }
}

#[async_trait]
impl BudgetStorage for SqliteBudgetRepository {
    async fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (category, amount)
            VALUES (?, ?)
            ON CONFLICT(category) DO UPDATE SET amount = excluded.amount
            "#,
        )
        .bind(normalize_category(&budget.category))
        .bind(budget.amount)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let rows = sqlx::query("SELECT category, amount FROM budgets ORDER BY category ASC")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::to_domain).collect()
    }

    async fn list_budget_categories(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT category FROM budgets ORDER BY category ASC")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("category").map_err(anyhow::Error::from))
            .collect()
    }

    async fn delete_budget(&self, category: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE category = ?")
            .bind(normalize_category(category))
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
