use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::{SqliteBudgetRepository, SqliteTransactionRepository};
use crate::storage::traits::Connection;

/// DbConnection owns the SQLite pool shared by the repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating SQLite database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// A private in-memory database. The pool is pinned to one connection that
    /// never expires, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection; used at application shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL UNIQUE,
                amount REAL NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                description TEXT,
                amount REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('Income', 'Expense')),
                category TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Month queries are date range scans
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_transactions_date
            ON transactions(date);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type TransactionRepository = SqliteTransactionRepository;
    type BudgetRepository = SqliteBudgetRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        SqliteTransactionRepository::new(self.clone())
    }

    fn create_budget_repository(&self) -> Self::BudgetRepository {
        SqliteBudgetRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        DbConnection::setup_schema(db.pool()).await.expect("Schema setup should be repeatable");
    }

    #[tokio::test]
    async fn test_type_check_constraint_rejects_unknown_types() {
        let db = DbConnection::in_memory().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO transactions (date, description, amount, type, category) VALUES (?, ?, ?, ?, ?)",
        )
        .bind("2024-01-01")
        .bind("Bad")
        .bind(1.0)
        .bind("Transfer")
        .bind("Food")
        .execute(db.pool())
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.path().join("finance.db").display());
        let db = DbConnection::new(&url).await.expect("Failed to create file database");
        db.close().await;
        assert!(dir.path().join("finance.db").exists());
    }
}
