//! # REST API for Transactions
//!
//! Endpoints for listing, creating, replacing and deleting transactions, and
//! for the calendar-month view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use shared::{CreateTransactionRequest, CreateTransactionResponse, Transaction, UpdateTransactionRequest};
use tracing::info;

use super::mappers::{parse_month, TransactionMapper};
use super::ApiJson;
use crate::domain::errors::FinanceResult;
use crate::domain::models::TransactionId;
use crate::AppState;

/// List every transaction, most recent first
pub async fn list_transactions(State(state): State<AppState>) -> FinanceResult<Json<Vec<Transaction>>> {
    info!("GET /api/transactions");

    let transactions = state.transaction_service.list_transactions().await?;
    Ok(Json(TransactionMapper::to_dtos(transactions)))
}

/// Create a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> FinanceResult<(StatusCode, Json<CreateTransactionResponse>)> {
    info!("POST /api/transactions - request: {:?}", request);

    let input = TransactionMapper::to_input(request)?;
    let recorded = state.transaction_service.add_transaction(input).await?;
    Ok((StatusCode::CREATED, Json(TransactionMapper::recorded_to_dto(recorded))))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTransactionRequest>,
) -> FinanceResult<Json<CreateTransactionResponse>> {
    info!("PUT /api/transactions/{} - request: {:?}", id, request);

    let input = TransactionMapper::to_update_input(request)?;
    let recorded = state
        .transaction_service
        .update_transaction(&TransactionId::new(id), input)
        .await?;
    Ok(Json(TransactionMapper::recorded_to_dto(recorded)))
}

/// Answers 204 whether or not the transaction existed
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> FinanceResult<StatusCode> {
    info!("DELETE /api/transactions/{}", id);

    state.transaction_service.delete_transaction(&TransactionId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transactions_for_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> FinanceResult<Json<Vec<Transaction>>> {
    info!("GET /api/transactions/month/{}", month);

    let month = parse_month(&month)?;
    let transactions = state.transaction_service.transactions_for_month(month).await?;
    Ok(Json(TransactionMapper::to_dtos(transactions)))
}
