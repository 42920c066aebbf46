//! Assistant collaborator: the question-for-answer exchange

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AskError;

/// Reply payload from the knowledge endpoint.
///
/// `answer` may be absent or empty; the engine substitutes its fallback
/// phrase in that case rather than treating the reply as a failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Answer {
    pub answer: Option<String>,
}

impl Answer {
    /// Build a reply carrying the given answer text.
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
        }
    }
}

/// The one external boundary the engine depends on.
///
/// Called exactly once per accepted submit; implementations must be safe to
/// call that often and may take arbitrarily long (the engine stays in
/// `Awaiting` until the future resolves).
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, question: &str) -> Result<Answer, AskError>;
}

/// HTTP implementation posting to the knowledge endpoint.
pub struct HttpAssistant {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAssistant {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/knowledge/query/", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Assistant for HttpAssistant {
    async fn ask(&self, question: &str) -> Result<Answer, AskError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await
            .map_err(|e| AskError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AskError::Status(status.as_u16()));
        }

        // An unparsable body is a degraded success, not a failure: the engine
        // falls back to its default phrase for an absent answer.
        Ok(response.json::<Answer>().await.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_payload_roundtrip() {
        let parsed: Answer = serde_json::from_str(r#"{"answer":"Bonjour"}"#).unwrap();
        assert_eq!(parsed.answer.as_deref(), Some("Bonjour"));
    }

    #[test]
    fn test_answer_payload_missing_field() {
        let parsed: Answer = serde_json::from_str(r#"{"confidence":0.2}"#).unwrap();
        assert!(parsed.answer.is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let assistant = HttpAssistant::new("http://localhost:8000/");
        assert_eq!(assistant.endpoint(), "http://localhost:8000/knowledge/query/");
    }
}
