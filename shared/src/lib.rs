use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recorded money movement as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier assigned by the storage backend
    pub id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Always positive; direction is carried by `transaction_type`
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Normalized (trimmed, title-cased) category name
    pub category: String,
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse of the stored form. Forgiving user input goes through the
/// backend's normalization instead.
impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A monthly spending cap for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Calendar date (YYYY-MM-DD) - uses today if not provided
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    /// Raw type label; casing and surrounding whitespace are normalized
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub category: String,
}

/// Full replacement of every field except the id
pub type UpdateTransactionRequest = CreateTransactionRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub transaction: Transaction,
    /// Set when the submitted category was replaced by a fallback category
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertBudgetRequest {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseTransactionRequest {
    /// Free-text description of a transaction, e.g. "lunch at the diner 25k"
    pub text: String,
}

/// A structured transaction proposed by the language model, awaiting confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseTransactionResponse {
    pub draft: TransactionDraft,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmDraftRequest {
    pub draft: TransactionDraft,
    /// Calendar date (YYYY-MM-DD) - uses today if not provided
    pub date: Option<String>,
}

/// Income and expense totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub total_income: f64,
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub net: f64,
}

/// Budget-vs-actual for one budgeted category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    /// actual / budgeted * 100, unclamped
    pub percent: f64,
    /// `percent` clamped to [0, 100] for bounded progress displays
    pub progress_percent: f64,
    pub over_budget: bool,
    /// actual - budgeted when over budget, otherwise zero
    pub overage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDashboard {
    pub month: MonthKey,
    pub summary: MonthlySummary,
    pub budgets: Vec<BudgetStatus>,
    /// Expense totals per category; empty when there is no expense in the month
    pub breakdown: Vec<CategorySpending>,
}

/// Error body returned by every failing API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthKeyError {
    #[error("month key must look like YYYY-MM, got '{0}'")]
    Format(String),
    #[error("month out of range in '{0}'")]
    OutOfRange(String),
}

/// Identifies a calendar month as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| MonthKeyError::OutOfRange(format!("{:04}-{:02}", year, month)))
    }

    /// Truncate a date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 always exists for a month that already contains `date`
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last calendar day of the month, accounting for month length and leap years
    pub fn last_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            // Only the final month chrono can represent has no successor
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .filter(|(y, m)| y.len() == 4 && m.len() == 2)
            .ok_or_else(|| MonthKeyError::Format(s.to_string()))?;

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(year) || !all_digits(month) {
            return Err(MonthKeyError::Format(s.to_string()));
        }

        let year = year
            .parse::<i32>()
            .map_err(|_| MonthKeyError::Format(s.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| MonthKeyError::Format(s.to_string()))?;

        Self::new(year, month).map_err(|_| MonthKeyError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
