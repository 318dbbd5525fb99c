use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use super::{CsvBudgetRepository, CsvTransactionRepository};
use crate::storage::records::{BUDGET_HEADER, TRANSACTION_HEADER};
use crate::storage::traits::Connection;

const TRANSACTIONS_FILE: &str = "transactions.csv";
const BUDGETS_FILE: &str = "budgets.csv";

/// CsvConnection manages the collection files under one base directory
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            info!("Creating CSV data directory {}", base_path.display());
            fs::create_dir_all(&base_path)?;
        }

        let connection = Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        };
        connection.ensure_file_exists(&connection.transactions_file_path(), &TRANSACTION_HEADER)?;
        connection.ensure_file_exists(&connection.budgets_file_path(), &BUDGET_HEADER)?;

        Ok(connection)
    }

    pub fn transactions_file_path(&self) -> PathBuf {
        self.base_directory.join(TRANSACTIONS_FILE)
    }

    pub fn budgets_file_path(&self) -> PathBuf {
        self.base_directory.join(BUDGETS_FILE)
    }

    /// Serializes read-modify-write cycles within this process
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded unit value cannot be left inconsistent by a panic
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ensure a CSV file exists with the given header
    fn ensure_file_exists(&self, path: &Path, header: &[&str]) -> Result<()> {
        if !path.exists() {
            let mut writer = WriterBuilder::new().from_path(path)?;
            writer.write_record(header)?;
            writer.flush()?;
        }
        Ok(())
    }

    pub fn read_records<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for (index, result) in reader.deserialize().enumerate() {
            let record: T = result.with_context(|| format!("Malformed row {} in {}", index + 1, path.display()))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Rewrite a whole collection file through a temporary file and rename
    pub fn write_records<T: Serialize>(&self, path: &Path, header: &[&str], records: &[T]) -> Result<()> {
        let temp_path = path.with_extension("tmp");

        {
            let file = File::create(&temp_path)?;
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            writer.write_record(header)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type TransactionRepository = CsvTransactionRepository;
    type BudgetRepository = CsvBudgetRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        CsvTransactionRepository::new(self.clone())
    }

    fn create_budget_repository(&self) -> Self::BudgetRepository {
        CsvBudgetRepository::new(self.clone())
    }
}
