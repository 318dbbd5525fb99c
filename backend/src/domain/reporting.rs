//! # Reporting
//!
//! Monthly aggregation for the dashboard: income/expense totals, budget versus
//! actual per budgeted category, and the expense breakdown used for charts.
//! The functions here are pure; [`ReportingService`] loads the month's data and
//! calls them.

use shared::{BudgetStatus, CategorySpending, MonthKey, MonthlyDashboard, MonthlySummary};
use std::collections::HashMap;
use tracing::info;

use crate::domain::budget_service::BudgetService;
use crate::domain::errors::FinanceResult;
use crate::domain::models::{Budget, Transaction, TransactionType};
use crate::domain::normalization::normalize_category;
use crate::domain::transaction_service::TransactionService;

pub fn monthly_summary(transactions: &[Transaction]) -> MonthlySummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => total_expense += transaction.amount,
        }
    }

    MonthlySummary {
        total_income,
        total_expense,
        net: total_income - total_expense,
    }
}

/// Expense totals keyed by normalized category
fn expense_by_category(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(normalize_category(&transaction.category)).or_insert(0.0) += transaction.amount;
    }
    totals
}

pub fn budget_status(budget: &Budget, actual: f64) -> BudgetStatus {
    let percent = if budget.amount > 0.0 {
        actual * 100.0 / budget.amount
    } else {
        0.0
    };
    let over_budget = percent > 100.0;

    BudgetStatus {
        category: budget.category.clone(),
        budgeted: budget.amount,
        actual,
        percent,
        progress_percent: percent.clamp(0.0, 100.0),
        over_budget,
        overage: if over_budget { actual - budget.amount } else { 0.0 },
    }
}

/// One status per budget, in the order the budgets are given. Spending in
/// categories without a budget is left out.
pub fn budget_statuses(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetStatus> {
    let spent = expense_by_category(transactions);
    budgets
        .iter()
        .map(|budget| {
            let actual = spent
                .get(&normalize_category(&budget.category))
                .copied()
                .unwrap_or(0.0);
            budget_status(budget, actual)
        })
        .collect()
}

/// Expense per category, largest first; empty when nothing was spent
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySpending> {
    let mut breakdown: Vec<CategorySpending> = expense_by_category(transactions)
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(category, amount)| CategorySpending { category, amount })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

#[derive(Clone)]
pub struct ReportingService {
    transaction_service: TransactionService,
    budget_service: BudgetService,
}

impl ReportingService {
    pub fn new(transaction_service: TransactionService, budget_service: BudgetService) -> Self {
        Self {
            transaction_service,
            budget_service,
        }
    }

    pub async fn monthly_dashboard(&self, month: MonthKey) -> FinanceResult<MonthlyDashboard> {
        let transactions = self.transaction_service.transactions_for_month(month).await?;
        let budgets = self.budget_service.list_budgets().await?;
        info!(
            "Building dashboard for {} from {} transactions and {} budgets",
            month,
            transactions.len(),
            budgets.len()
        );

        Ok(MonthlyDashboard {
            month,
            summary: monthly_summary(&transactions),
            budgets: budget_statuses(&budgets, &transactions),
            breakdown: category_breakdown(&transactions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionId;
    use crate::domain::transaction_service::TransactionInput;
    use crate::storage::sqlite::{DbConnection, SqliteBudgetRepository, SqliteTransactionRepository};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn tx(transaction_type: TransactionType, amount: f64, category: &str) -> Transaction {
        Transaction {
            id: TransactionId::new("1"),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            description: None,
            amount,
            transaction_type,
            category: category.to_string(),
        }
    }

    fn budget(category: &str, amount: f64) -> Budget {
        Budget {
            category: category.to_string(),
            amount,
        }
    }

    fn sample_month() -> Vec<Transaction> {
        vec![
            tx(TransactionType::Expense, 25000.0, "Food"),
            tx(TransactionType::Expense, 15000.0, "Food"),
            tx(TransactionType::Income, 5000000.0, "Salary"),
        ]
    }

    #[test]
    fn test_monthly_summary_totals() {
        let summary = monthly_summary(&sample_month());
        assert_eq!(summary.total_income, 5000000.0);
        assert_eq!(summary.total_expense, 40000.0);
        assert_eq!(summary.net, 4960000.0);
    }

    #[test]
    fn test_budget_within_limit() {
        let statuses = budget_statuses(&[budget("Food", 100000.0)], &sample_month());

        assert_eq!(statuses.len(), 1);
        let food = &statuses[0];
        assert_eq!(food.actual, 40000.0);
        assert_eq!(food.percent, 40.0);
        assert_eq!(food.progress_percent, 40.0);
        assert!(!food.over_budget);
        assert_eq!(food.overage, 0.0);
    }

    #[test]
    fn test_over_budget_reports_overage() {
        let statuses = budget_statuses(
            &[budget("Food", 10000.0)],
            &[tx(TransactionType::Expense, 15000.0, "Food")],
        );

        let food = &statuses[0];
        assert!(food.over_budget);
        assert_eq!(food.overage, 5000.0);
        assert_eq!(food.percent, 150.0);
        assert_eq!(food.progress_percent, 100.0);
    }

    #[test]
    fn test_exactly_on_budget_is_not_over() {
        let status = budget_status(&budget("Food", 100.0), 100.0);
        assert!(!status.over_budget);
        assert_eq!(status.overage, 0.0);
    }

    #[test]
    fn test_budget_without_spending_and_spending_without_budget() {
        let statuses = budget_statuses(
            &[budget("Transport", 50000.0)],
            &[tx(TransactionType::Expense, 999.0, "Gadgets")],
        );

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].category, "Transport");
        assert_eq!(statuses[0].actual, 0.0);
        assert_eq!(statuses[0].percent, 0.0);
    }

    #[test]
    fn test_income_does_not_count_against_budget() {
        let statuses = budget_statuses(
            &[budget("Bonus", 100.0)],
            &[tx(TransactionType::Income, 500.0, "Bonus")],
        );
        assert_eq!(statuses[0].actual, 0.0);
    }

    #[test]
    fn test_category_breakdown() {
        let mut transactions = sample_month();
        transactions.push(tx(TransactionType::Expense, 60000.0, "Transport"));
        transactions.push(tx(TransactionType::Expense, 40000.0, "Bills"));

        let breakdown = category_breakdown(&transactions);
        let pairs: Vec<(&str, f64)> = breakdown.iter().map(|c| (c.category.as_str(), c.amount)).collect();
        assert_eq!(pairs, [("Transport", 60000.0), ("Bills", 40000.0), ("Food", 40000.0)]);

        let income_only = [tx(TransactionType::Income, 10.0, "Salary")];
        assert!(category_breakdown(&income_only).is_empty());
        assert!(category_breakdown(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_monthly_dashboard_uses_only_the_requested_month() {
        let db = DbConnection::in_memory().await.unwrap();
        let budget_service = BudgetService::new(
            Arc::new(SqliteBudgetRepository::new(db.clone())),
            vec!["Salary".to_string()],
        );
        let transaction_service = TransactionService::new(
            Arc::new(SqliteTransactionRepository::new(db)),
            budget_service.clone(),
        );
        budget_service.set_budget("Food", 100000.0).await.unwrap();
        budget_service.set_budget("Transport", 50000.0).await.unwrap();

        let entries = [
            ("2024-03-01", 25000.0, "Expense", "Food"),
            ("2024-03-31", 15000.0, "Expense", "food"),
            ("2024-03-15", 5000000.0, "Income", "Salary"),
            ("2024-04-01", 99999.0, "Expense", "Food"),
        ];
        for (date, amount, transaction_type, category) in entries {
            transaction_service
                .add_transaction(TransactionInput {
                    date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                    description: None,
                    amount,
                    transaction_type: transaction_type.to_string(),
                    category: category.to_string(),
                })
                .await
                .unwrap();
        }

        let reporting = ReportingService::new(transaction_service, budget_service);
        let dashboard = reporting.monthly_dashboard("2024-03".parse().unwrap()).await.unwrap();

        assert_eq!(dashboard.month.to_string(), "2024-03");
        assert_eq!(dashboard.summary.total_expense, 40000.0);
        assert_eq!(dashboard.summary.net, 4960000.0);
        assert_eq!(dashboard.budgets.len(), 2);
        assert_eq!(dashboard.budgets[0].category, "Food");
        assert_eq!(dashboard.budgets[0].percent, 40.0);
        assert_eq!(dashboard.budgets[1].actual, 0.0);
        assert_eq!(dashboard.breakdown.len(), 1);
    }
}
