use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::connection::DbConnection;
use crate::domain::models::{NewTransaction, Transaction, TransactionId, DATE_FORMAT};
use crate::storage::records::TransactionRecord;
use crate::storage::traits::TransactionStorage;

const SELECT_COLUMNS: &str = "SELECT id, date, description, amount, type, category FROM transactions";

/// Repository for transaction rows in SQLite
#[derive(Clone)]
pub struct SqliteTransactionRepository {
    db: DbConnection,
}

impl SqliteTransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Ids that are not integers cannot exist in this table
    fn row_id(id: &TransactionId) -> Option<i64> {
        id.as_str().parse::<i64>().ok()
    }

    fn to_domain(row: &SqliteRow) -> Result<Transaction> {
        let record = TransactionRecord {
            id: row.try_get::<i64, _>("id")?.to_string(),
            date: row.try_get("date")?,
            description: row.try_get("description")?,
            amount: row.try_get("amount")?,
            transaction_type: row.try_get("type")?,
            category: row.try_get("category")?,
        };
        record.into_domain()
    }

    fn collect(rows: &[SqliteRow]) -> Result<Vec<Transaction>> {
        rows.iter().map(Self::to_domain).collect()
    }
}

#[async_trait]
impl TransactionStorage for SqliteTransactionRepository {
    async fn store_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (date, description, amount, type, category)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(transaction.description.as_deref())
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(&transaction.category)
        .execute(self.db.pool())
        .await?;

        Ok(TransactionId::new(result.last_insert_rowid().to_string()))
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<Option<Transaction>> {
        let Some(row_id) = Self::row_id(id) else {
            return Ok(None);
        };

        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(row_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::to_domain).transpose()
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!("{} ORDER BY date DESC, id DESC", SELECT_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        Self::collect(&rows)
    }

    async fn list_transactions_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        // ISO dates compare correctly as text
        let rows = sqlx::query(&format!(
            "{} WHERE date >= ? AND date <= ? ORDER BY date DESC, id DESC",
            SELECT_COLUMNS
        ))
        .bind(start.format(DATE_FORMAT).to_string())
        .bind(end.format(DATE_FORMAT).to_string())
        .fetch_all(self.db.pool())
        .await?;

        Self::collect(&rows)
    }

    async fn update_transaction(&self, id: &TransactionId, transaction: &NewTransaction) -> Result<bool> {
        let Some(row_id) = Self::row_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET date = ?, description = ?, amount = ?, type = ?, category = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(transaction.description.as_deref())
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(&transaction.category)
        .bind(row_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<bool> {
        let Some(row_id) = Self::row_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(row_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
