use axum::{
    extract::{Path, State},
    response::Json,
};
use shared::MonthlyDashboard;
use tracing::info;

use super::mappers::parse_month;
use crate::domain::errors::FinanceResult;
use crate::AppState;

/// Totals, budget-vs-actual and expense breakdown for one `YYYY-MM` month
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> FinanceResult<Json<MonthlyDashboard>> {
    info!("GET /api/dashboard/{}", month);

    let month = parse_month(&month)?;
    Ok(Json(state.reporting_service.monthly_dashboard(month).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionInput;
    use crate::io::rest::test_utils::setup_test_state;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_dashboard_for_month() {
        let state = setup_test_state().await;
        state
            .transaction_service
            .add_transaction(TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                description: None,
                amount: 25000.0,
                transaction_type: "Expense".to_string(),
                category: "Food".to_string(),
            })
            .await
            .unwrap();

        let Json(dashboard) = get_dashboard(State(state), Path("2024-03".to_string())).await.unwrap();
        assert_eq!(dashboard.summary.total_expense, 25000.0);
        let food = dashboard.budgets.iter().find(|b| b.category == "Food").unwrap();
        assert_eq!(food.percent, 25.0);
        assert_eq!(dashboard.breakdown.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_month_is_bad_request() {
        let state = setup_test_state().await;
        let response = get_dashboard(State(state), Path("2024-00".to_string())).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
