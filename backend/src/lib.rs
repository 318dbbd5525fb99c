//! # Finance Tracker Backend
//!
//! Personal income/expense tracking with monthly category budgets and
//! AI-assisted entry from free text.
//!
//! ## Layers
//!
//! - **storage**: two interchangeable backends (SQLite, CSV files) behind
//!   repository traits
//! - **domain**: normalization, category reconciliation, the services and the
//!   monthly reporting
//! - **ai**: prompt construction, language-model client and response parsing
//! - **io::rest**: the axum HTTP surface
//!
//! The storage backend is opened once by the entry point, handed to every
//! service through [`AppState`], and closed on shutdown.

pub mod ai;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::ai::{GeminiClient, LanguageModel};
use crate::config::Config;
use crate::domain::{AiParsingService, BudgetService, ReportingService, TransactionService};
use crate::io::rest::{ai_apis, budget_apis, dashboard_apis, transaction_apis};
use crate::storage::StorageBackend;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService,
    pub budget_service: BudgetService,
    pub reporting_service: ReportingService,
    pub ai_parsing_service: AiParsingService,
}

impl AppState {
    /// Wire every service to the opened storage and the configured Gemini client
    pub fn new(storage: &StorageBackend, config: &Config) -> Result<Self> {
        let model = GeminiClient::new(&config.ai)?;
        if config.ai.api_key.is_none() {
            info!("GEMINI_API_KEY is not set; AI parsing will fail until it is configured");
        }
        Ok(Self::with_model(storage, config.income_categories.clone(), Arc::new(model)))
    }

    pub fn with_model(
        storage: &StorageBackend,
        income_categories: Vec<String>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        info!("Setting up domain model");
        let budget_service = BudgetService::new(storage.budget_repository(), income_categories);
        let transaction_service = TransactionService::new(storage.transaction_repository(), budget_service.clone());
        let reporting_service = ReportingService::new(transaction_service.clone(), budget_service.clone());
        let ai_parsing_service = AiParsingService::new(model, budget_service.clone(), transaction_service.clone());

        Self {
            transaction_service,
            budget_service,
            reporting_service,
            ai_parsing_service,
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:8080"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/transactions",
            get(transaction_apis::list_transactions).post(transaction_apis::create_transaction),
        )
        .route(
            "/transactions/:id",
            put(transaction_apis::update_transaction).delete(transaction_apis::delete_transaction),
        )
        .route("/transactions/month/:month", get(transaction_apis::transactions_for_month))
        .route(
            "/budgets",
            get(budget_apis::list_budgets).post(budget_apis::upsert_budget),
        )
        .route("/budgets/categories", get(budget_apis::list_budget_categories))
        .route("/budgets/:category", delete(budget_apis::delete_budget))
        .route("/dashboard/:month", get(dashboard_apis::get_dashboard))
        .route("/ai/parse", post(ai_apis::parse_transaction))
        .route("/ai/confirm", post(ai_apis::confirm_draft));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
