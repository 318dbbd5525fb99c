//! # Storage Module
//!
//! Two interchangeable backends behind the traits in [`traits`]: an embedded
//! SQLite database and a directory of CSV collection files. The backend is
//! chosen by configuration and constructed once at startup; callers only see
//! `Arc<dyn TransactionStorage>` and `Arc<dyn BudgetStorage>`.

pub mod csv;
pub mod records;
pub mod sqlite;
pub mod traits;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageConfig, StorageKind};
pub use self::csv::CsvConnection;
pub use sqlite::DbConnection;
pub use traits::{BudgetStorage, Connection, TransactionStorage};

/// The opened storage backend, owned by the application entry point
#[derive(Clone)]
pub enum StorageBackend {
    Sqlite(DbConnection),
    Csv(CsvConnection),
}

impl StorageBackend {
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        match config.kind {
            StorageKind::Sqlite => {
                info!("Opening SQLite storage at {}", config.database_url);
                Ok(StorageBackend::Sqlite(DbConnection::new(&config.database_url).await?))
            }
            StorageKind::Csv => {
                info!("Opening CSV storage in {}", config.data_dir.display());
                Ok(StorageBackend::Csv(CsvConnection::new(&config.data_dir)?))
            }
        }
    }

    pub fn transaction_repository(&self) -> Arc<dyn TransactionStorage> {
        match self {
            StorageBackend::Sqlite(db) => Arc::new(db.create_transaction_repository()),
            StorageBackend::Csv(csv) => Arc::new(csv.create_transaction_repository()),
        }
    }

    pub fn budget_repository(&self) -> Arc<dyn BudgetStorage> {
        match self {
            StorageBackend::Sqlite(db) => Arc::new(db.create_budget_repository()),
            StorageBackend::Csv(csv) => Arc::new(csv.create_budget_repository()),
        }
    }

    /// Release backend resources; SQLite pools are drained, CSV files need nothing
    pub async fn close(&self) {
        if let StorageBackend::Sqlite(db) = self {
            db.close().await;
        }
        info!("Storage closed");
    }
}
