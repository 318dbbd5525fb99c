//! # REST API Interface Layer
//!
//! JSON over HTTP for the finance tracker. Handlers translate between the
//! shared API types and the domain services; they hold no business logic.
//! Every domain error becomes a status code plus an [`shared::ApiError`] body:
//!
//! | error | status |
//! |---|---|
//! | validation | 400 |
//! | not found | 404 |
//! | malformed model response | 502 |
//! | external service | 502 |
//! | configuration | 503 |
//! | storage | 500 |
//!
//! Request bodies are read through [`ApiJson`] so that a body axum cannot
//! decode is reported the same way, as a validation error.

pub mod ai_apis;
pub mod budget_apis;
pub mod dashboard_apis;
pub mod mappers;
pub mod transaction_apis;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ApiError;
use tracing::{error, warn};

use crate::domain::errors::FinanceError;

/// `Json` extractor whose rejection is an [`ApiError`] body instead of plain text
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(FinanceError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for FinanceError {
    fn from(rejection: JsonRejection) -> Self {
        FinanceError::validation(rejection.body_text())
    }
}

impl FinanceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FinanceError::Validation(_) => StatusCode::BAD_REQUEST,
            FinanceError::NotFound(_) => StatusCode::NOT_FOUND,
            FinanceError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
            FinanceError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            FinanceError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            FinanceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FinanceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        let body = ApiError {
            kind: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Arc;

    use crate::ai::LanguageModel;
    use crate::domain::ai_parsing_service::test_support::ScriptedModel;
    use crate::storage::{DbConnection, StorageBackend};
    use crate::AppState;

    /// In-memory state with Food and Transport budgets and a model that has no replies
    pub async fn setup_test_state() -> AppState {
        setup_test_state_with_model(Arc::new(ScriptedModel::new(vec![]))).await
    }

    pub async fn setup_test_state_with_model(model: Arc<dyn LanguageModel>) -> AppState {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        let storage = StorageBackend::Sqlite(db);
        let state = AppState::with_model(&storage, vec!["Salary".to_string()], model);
        state.budget_service.set_budget("Food", 100000.0).await.unwrap();
        state.budget_service.set_budget("Transport", 50000.0).await.unwrap();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GeminiClient;
    use crate::config::AiConfig;
    use crate::create_router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(FinanceError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(FinanceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(FinanceError::ExternalService("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            FinanceError::Configuration("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            FinanceError::Storage(anyhow::anyhow!("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn send(router: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(value) => Body::from(value.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_router_end_to_end() {
        let router = create_router(test_utils::setup_test_state().await);

        let (status, created) = send(
            router.clone(),
            "POST",
            "/api/transactions",
            Some(json!({"date": "2024-02-29", "description": "Lunch", "amount": 25000, "type": "expense", "category": "food"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["transaction"]["type"], "Expense");
        assert_eq!(created["transaction"]["category"], "Food");

        let (status, month) = send(router.clone(), "GET", "/api/transactions/month/2024-02", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(month.as_array().unwrap().len(), 1);

        let (status, categories) = send(router.clone(), "GET", "/api/budgets/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(categories, json!(["Food", "Transport"]));

        let (status, dashboard) = send(router.clone(), "GET", "/api/dashboard/2024-02", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["month"], "2024-02");
        assert_eq!(dashboard["summary"]["total_expense"], 25000.0);

        let (status, _) = send(router.clone(), "DELETE", "/api/budgets/Transport", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let update = json!({"date": "2024-02-01", "amount": 1, "type": "Expense", "category": "Food"});
        let (status, error) = send(router, "PUT", "/api/transactions/999", Some(update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_api_error() {
        let router = create_router(test_utils::setup_test_state().await);

        let request = Request::builder()
            .method("POST")
            .uri("/api/budgets")
            .header("content-type", "application/json")
            .body(Body::from("{\"category\": \"Food\","))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.kind, "validation");

        let (status, error) = send(router, "POST", "/api/transactions", Some(json!({"amount": 10}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["kind"], "validation");
        assert!(error["message"].as_str().unwrap().contains("missing field"));
    }

    #[tokio::test]
    async fn test_missing_model_credentials_is_service_unavailable() {
        let client = GeminiClient::new(&AiConfig {
            api_key: None,
            model: "gemini-flash-latest".to_string(),
            endpoint: "http://127.0.0.1:9".to_string(),
            request_timeout: None,
        })
        .unwrap();
        let router = create_router(test_utils::setup_test_state_with_model(Arc::new(client)).await);

        let (status, error) = send(router, "POST", "/api/ai/parse", Some(json!({"text": "lunch 25k"}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error["kind"], "configuration");
    }
}
