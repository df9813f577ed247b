//! Core LLM client trait, errors and a scripted mock

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - every call carries the full conversation
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (awaits the full response)
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier used for requests
    fn model(&self) -> &str;
}

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}

enum Scripted {
    Reply(CompletionResponse),
    Fail { status: u16, message: String },
}

/// Scripted LLM client for tests and offline runs
///
/// Replies are handed out in order. Once the script is exhausted the
/// fallback reply (if any) is repeated, otherwise an error is returned.
/// Every request is recorded for later inspection.
pub struct MockLlmClient {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<CompletionResponse>,
    requests: Mutex<Vec<CompletionRequest>>,
    model: String,
}

impl MockLlmClient {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(Scripted::Reply).collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            model: "mock-model".to_string(),
        }
    }

    /// A client that answers every request with the same response
    pub fn repeating(response: CompletionResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::new(Vec::new())
        }
    }

    /// Queue an API failure after the currently scripted replies
    pub fn then_fail(self, status: u16, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Scripted::Fail {
                status,
                message: message.into(),
            });
        self
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let next = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail { status, message }) => Err(LlmError::ApiError { status, message }),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LlmError::InvalidResponse("mock script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
