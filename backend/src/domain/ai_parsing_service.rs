//! Free text to transaction draft, via the language model.
//!
//! `parse` never writes: it returns a draft for the user to confirm, and only
//! `confirm` persists it through [`TransactionService`].
use chrono::{Local, NaiveDate};
use shared::TransactionDraft;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{build_prompt, parse_model_output, AiError, LanguageModel};
use crate::domain::budget_service::BudgetService;
use crate::domain::errors::{FinanceError, FinanceResult};
use crate::domain::normalization::{normalize_type, reconcile_category};
use crate::domain::transaction_service::{RecordedTransaction, TransactionInput, TransactionService};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDraft {
    pub draft: TransactionDraft,
    /// Set when the model's category was replaced by a fallback category
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct AiParsingService {
    model: Arc<dyn LanguageModel>,
    budget_service: BudgetService,
    transaction_service: TransactionService,
}

impl AiParsingService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        budget_service: BudgetService,
        transaction_service: TransactionService,
    ) -> Self {
        Self {
            model,
            budget_service,
            transaction_service,
        }
    }

    pub async fn parse(&self, text: &str) -> FinanceResult<ParsedDraft> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FinanceError::validation("text to parse must not be empty"));
        }

        let lists = self.budget_service.category_lists().await?;
        let prompt = build_prompt(text, &lists.all());
        let raw = self.model.generate(&prompt).await?;

        let parsed = parse_model_output(&raw).map_err(|e| {
            if let AiError::MalformedResponse { raw, reason } = &e {
                warn!("Unparseable model output ({}): {}", reason, raw);
            }
            e
        })?;

        // Model output is untrusted; normalize and validate it like user input
        let malformed = |reason: String| {
            warn!("Rejected model output ({}): {}", reason, raw);
            FinanceError::MalformedResponse {
                raw: raw.clone(),
                reason,
            }
        };
        let transaction_type = normalize_type(&parsed.transaction_type).map_err(|e| malformed(e.to_string()))?;
        if !parsed.amount.is_finite() || parsed.amount <= 0.0 {
            return Err(malformed(format!("amount {} is not positive", parsed.amount)));
        }

        let reconciliation = reconcile_category(transaction_type, &parsed.category, &lists);
        let warning = reconciliation.warning(transaction_type);
        if let Some(message) = &warning {
            warn!("{}", message);
        }

        info!("Parsed draft {} of {} in {}", transaction_type, parsed.amount, reconciliation.category);
        Ok(ParsedDraft {
            draft: TransactionDraft {
                transaction_type,
                amount: parsed.amount,
                description: parsed.description.trim().to_string(),
                category: reconciliation.category,
            },
            warning,
        })
    }

    /// Persist a draft the user accepted; `date` defaults to today
    pub async fn confirm(
        &self,
        draft: TransactionDraft,
        date: Option<NaiveDate>,
    ) -> FinanceResult<RecordedTransaction> {
        self.transaction_service
            .add_transaction(TransactionInput {
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                description: Some(draft.description),
                amount: draft.amount,
                transaction_type: draft.transaction_type.as_str().to_string(),
                category: draft.category,
            })
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns canned responses in order and records every prompt
    pub struct ScriptedModel {
        responses: Mutex<Vec<Result<String, AiError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(responses: Vec<Result<String, AiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(AiError::Configuration("no scripted response left".to_string()));
            }
            responses.remove(0)
        }
    }
}
