//! # REST API for AI-assisted entry
//!
//! `parse` proposes a draft without writing anything; `confirm` stores a draft
//! the user accepted, possibly after editing it.

use axum::{extract::State, http::StatusCode, response::Json};
use shared::{ConfirmDraftRequest, CreateTransactionResponse, ParseTransactionRequest, ParseTransactionResponse};
use tracing::info;

use super::mappers::{parse_optional_date, parsed_draft_to_dto, TransactionMapper};
use super::ApiJson;
use crate::domain::errors::FinanceResult;
use crate::AppState;

pub async fn parse_transaction(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ParseTransactionRequest>,
) -> FinanceResult<Json<ParseTransactionResponse>> {
    info!("POST /api/ai/parse - {} chars", request.text.len());

    let parsed = state.ai_parsing_service.parse(&request.text).await?;
    Ok(Json(parsed_draft_to_dto(parsed)))
}

pub async fn confirm_draft(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ConfirmDraftRequest>,
) -> FinanceResult<(StatusCode, Json<CreateTransactionResponse>)> {
    info!("POST /api/ai/confirm - draft: {:?}", request.draft);

    let date = parse_optional_date(request.date.as_deref())?;
    let recorded = state.ai_parsing_service.confirm(request.draft, date).await?;
    Ok((StatusCode::CREATED, Json(TransactionMapper::recorded_to_dto(recorded))))
}
