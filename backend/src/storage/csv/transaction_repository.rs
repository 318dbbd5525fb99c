use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Reverse;
use uuid::Uuid;

use super::connection::CsvConnection;
use crate::domain::models::{NewTransaction, Transaction, TransactionId};
use crate::storage::records::{TransactionRecord, TRANSACTION_HEADER};
use crate::storage::traits::TransactionStorage;

/// CSV-based transaction collection with generated string keys
#[derive(Clone)]
pub struct CsvTransactionRepository {
    connection: CsvConnection,
}

impl CsvTransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self) -> Result<Vec<TransactionRecord>> {
        self.connection.read_records(&self.connection.transactions_file_path())
    }

    fn write_records(&self, records: &[TransactionRecord]) -> Result<()> {
        self.connection
            .write_records(&self.connection.transactions_file_path(), &TRANSACTION_HEADER, records)
    }

    /// Read, validate and sort by date descending; file order breaks ties
    /// with the most recently appended first.
    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self
            .read_records()?
            .into_iter()
            .map(TransactionRecord::into_domain)
            .collect::<Result<Vec<_>>>()?;
        transactions.reverse();
        transactions.sort_by_key(|t| Reverse(t.date));
        Ok(transactions)
    }

    fn insert(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        let _guard = self.connection.lock();
        let mut records = self.read_records()?;
        let id = TransactionId::new(Uuid::new_v4().to_string());
        records.push(TransactionRecord::from_domain(&id, transaction));
        self.write_records(&records)?;
        Ok(id)
    }

    fn replace(&self, id: &TransactionId, transaction: &NewTransaction) -> Result<bool> {
        let _guard = self.connection.lock();
        let mut records = self.read_records()?;
        match records.iter_mut().find(|r| r.id == id.as_str()) {
            Some(record) => {
                *record = TransactionRecord::from_domain(id, transaction);
                self.write_records(&records)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: &TransactionId) -> Result<bool> {
        let _guard = self.connection.lock();
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.id != id.as_str());
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records)?;
        Ok(true)
    }
}

#[async_trait]
impl TransactionStorage for CsvTransactionRepository {
    async fn store_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        self.insert(transaction)
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<Option<Transaction>> {
        self.read_records()?
            .into_iter()
            .find(|r| r.id == id.as_str())
            .map(TransactionRecord::into_domain)
            .transpose()
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.read_transactions()
    }

    async fn list_transactions_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        let mut transactions = self.read_transactions()?;
        transactions.retain(|t| t.date >= start && t.date <= end);
        Ok(transactions)
    }

    async fn update_transaction(&self, id: &TransactionId, transaction: &NewTransaction) -> Result<bool> {
        self.replace(id, transaction)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<bool> {
        self.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{TransactionType, DATE_FORMAT};
    use tempfile::TempDir;

    fn setup_test() -> (TempDir, CsvTransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        (temp_dir, CsvTransactionRepository::new(connection))
    }

    fn new_tx(date: &str, amount: f64, transaction_type: TransactionType, category: &str) -> NewTransaction {
        NewTransaction {
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            description: Some(format!("{}, on {}", category, date)),
            amount,
            transaction_type,
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_assigns_unique_string_ids() {
        let (_dir, repo) = setup_test();
        let tx = new_tx("2024-03-05", 25000.0, TransactionType::Expense, "Food");

        let first = repo.store_transaction(&tx).await.unwrap();
        let second = repo.store_transaction(&tx).await.unwrap();
        assert_ne!(first, second);

        let stored = repo.get_transaction(&first).await.unwrap().unwrap();
        assert_eq!(stored, tx.with_id(first));
    }

    #[tokio::test]
    async fn test_list_orders_by_date_descending() {
        let (_dir, repo) = setup_test();
        for date in ["2024-01-10", "2024-03-01", "2024-02-15"] {
            repo.store_transaction(&new_tx(date, 1.0, TransactionType::Expense, "Food")).await.unwrap();
        }

        let dates: Vec<String> = repo
            .list_transactions()
            .await
            .unwrap()
            .iter()
            .map(|t| t.date_string())
            .collect();
        assert_eq!(dates, ["2024-03-01", "2024-02-15", "2024-01-10"]);
    }

    #[tokio::test]
    async fn test_leap_month_range_is_inclusive() {
        let (_dir, repo) = setup_test();
        for date in ["2024-01-31", "2024-02-01", "2024-02-29", "2024-03-01"] {
            repo.store_transaction(&new_tx(date, 10.0, TransactionType::Expense, "Food")).await.unwrap();
        }

        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let dates: Vec<String> = repo
            .list_transactions_between(start, end)
            .await
            .unwrap()
            .iter()
            .map(|t| t.date_string())
            .collect();
        assert_eq!(dates, ["2024-02-29", "2024-02-01"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_dir, repo) = setup_test();
        let id = repo
            .store_transaction(&new_tx("2024-03-05", 1.0, TransactionType::Expense, "Food"))
            .await
            .unwrap();

        let replacement = new_tx("2024-03-07", 9.0, TransactionType::Income, "Salary");
        assert!(repo.update_transaction(&id, &replacement).await.unwrap());
        assert_eq!(repo.get_transaction(&id).await.unwrap().unwrap(), replacement.clone().with_id(id.clone()));

        let missing = TransactionId::new("missing");
        assert!(!repo.update_transaction(&missing, &replacement).await.unwrap());

        assert!(repo.delete_transaction(&id).await.unwrap());
        assert!(!repo.delete_transaction(&id).await.unwrap());
        assert!(repo.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_description_with_commas_and_none_survive() {
        let (_dir, repo) = setup_test();
        let mut tx = new_tx("2024-03-05", 1.0, TransactionType::Expense, "Food");
        tx.description = Some("coffee, \"large\"".to_string());
        let with_text = repo.store_transaction(&tx).await.unwrap();
        tx.description = None;
        let without = repo.store_transaction(&tx).await.unwrap();

        let read_text = repo.get_transaction(&with_text).await.unwrap().unwrap();
        assert_eq!(read_text.description.as_deref(), Some("coffee, \"large\""));
        assert_eq!(repo.get_transaction(&without).await.unwrap().unwrap().description, None);
    }

    #[tokio::test]
    async fn test_malformed_document_fails_on_read() {
        let (_dir, repo) = setup_test();
        std::fs::write(
            repo.connection.transactions_file_path(),
            "id,date,description,amount,type,category\nabc,2024-13-01,,5,Expense,Food\n",
        )
        .unwrap();

        assert!(repo.list_transactions().await.is_err());
    }
}
