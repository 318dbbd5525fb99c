//! Parsing of the language model's answer.

use serde::{Deserialize, Deserializer};

use super::AiError;

/// The four fields the model is asked to return, before normalization
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelTransaction {
    #[serde(rename = "type")]
    pub transaction_type: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub amount: f64,
    pub description: String,
    pub category: String,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("amount '{}' is not a number", text))),
    }
}

/// Remove a leading ```` ```json ```` or ```` ``` ```` fence and a trailing ```` ``` ````
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json").or_else(|| text.strip_prefix("```")) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

pub fn parse_model_output(raw: &str) -> Result<ModelTransaction, AiError> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|e| AiError::MalformedResponse {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("  {} "), "{}");
        assert_eq!(strip_code_fences("{}\n```"), "{}");
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = "```json\n{\"type\": \"Expense\", \"amount\": 25000, \"description\": \"Lunch\", \"category\": \"Food\"}\n```";
        let parsed = parse_model_output(raw).unwrap();
        assert_eq!(
            parsed,
            ModelTransaction {
                transaction_type: "Expense".to_string(),
                amount: 25000.0,
                description: "Lunch".to_string(),
                category: "Food".to_string(),
            }
        );
    }

    #[test]
    fn test_amount_may_be_a_numeric_string() {
        let raw = r#"{"type": "income", "amount": " 1500000 ", "description": "Bonus", "category": "Bonus"}"#;
        assert_eq!(parse_model_output(raw).unwrap().amount, 1500000.0);

        let raw = r#"{"type": "income", "amount": "1.5M", "description": "Bonus", "category": "Bonus"}"#;
        assert!(parse_model_output(raw).is_err());
    }

    #[test]
    fn test_prose_is_malformed_and_keeps_raw_text() {
        let raw = "Sure! The transaction is an expense of 25000.";
        match parse_model_output(raw) {
            Err(AiError::MalformedResponse { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_requires_exactly_four_fields() {
        let missing = r#"{"type": "Expense", "amount": 1, "description": "x"}"#;
        assert!(parse_model_output(missing).is_err());

        let extra = r#"{"type": "Expense", "amount": 1, "description": "x", "category": "Food", "date": "2024-01-01"}"#;
        assert!(parse_model_output(extra).is_err());
    }
}
