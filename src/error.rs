//! Error types for crypto-research
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can abort a research request
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Reasoning engine failure
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// A required tool argument was not supplied
    #[error("Tool '{tool}' is missing required argument '{argument}'")]
    MissingArgument { tool: String, argument: String },

    /// A tool argument was supplied with the wrong shape
    #[error("Tool '{tool}' got invalid argument '{argument}': {reason}")]
    InvalidArgument {
        tool: String,
        argument: String,
        reason: String,
    },

    /// The engine kept requesting tools past the round budget
    #[error("Exceeded iteration budget of {limit} tool rounds")]
    IterationBudgetExceeded { limit: u32 },

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResearchError {
    pub fn missing_argument(tool: &str, argument: &str) -> Self {
        Self::MissingArgument {
            tool: tool.to_string(),
            argument: argument.to_string(),
        }
    }

    pub fn invalid_argument(tool: &str, argument: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            tool: tool.to_string(),
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }

    /// A missing credential, detected before any remote call is made
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Llm(LlmError::MissingApiKey { .. }))
    }
}

/// Result type alias for research operations
pub type Result<T> = std::result::Result<T, ResearchError>;
