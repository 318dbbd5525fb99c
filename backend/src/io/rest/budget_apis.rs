//! # REST API for Budgets

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use shared::{Budget, UpsertBudgetRequest};
use tracing::info;

use super::mappers::BudgetMapper;
use super::ApiJson;
use crate::domain::errors::FinanceResult;
use crate::AppState;

pub async fn list_budgets(State(state): State<AppState>) -> FinanceResult<Json<Vec<Budget>>> {
    info!("GET /api/budgets");

    let budgets = state.budget_service.list_budgets().await?;
    Ok(Json(BudgetMapper::to_dtos(budgets)))
}

/// Insert or overwrite the budget for a category
pub async fn upsert_budget(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpsertBudgetRequest>,
) -> FinanceResult<Json<Budget>> {
    info!("POST /api/budgets - request: {:?}", request);

    let budget = state.budget_service.set_budget(&request.category, request.amount).await?;
    Ok(Json(BudgetMapper::to_dto(budget)))
}

pub async fn list_budget_categories(State(state): State<AppState>) -> FinanceResult<Json<Vec<String>>> {
    info!("GET /api/budgets/categories");

    Ok(Json(state.budget_service.budget_categories().await?))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> FinanceResult<StatusCode> {
    info!("DELETE /api/budgets/{}", category);

    state.budget_service.delete_budget(&category).await?;
    Ok(StatusCode::NO_CONTENT)
}
