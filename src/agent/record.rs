//! Research outcome records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fetchers::truncate_chars;
use crate::llm::Usage;

/// Characters of tool output kept in a record preview
pub const PREVIEW_CHARS: usize = 200;

/// One tool invocation made during a research request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub input: Value,
    pub result_preview: String,
}

impl ToolCallRecord {
    pub fn new(tool: impl Into<String>, input: Value, output: &str) -> Self {
        Self {
            tool: tool.into(),
            input,
            result_preview: preview(output),
        }
    }
}

/// First PREVIEW_CHARS characters of `output`, with "..." when cut
pub fn preview(output: &str) -> String {
    if output.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(output, PREVIEW_CHARS))
    } else {
        output.to_string()
    }
}

/// Final result of a research request
///
/// `report` is present exactly when `success` is true, `error` exactly when
/// it is false. Tool records are kept in both cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub success: bool,
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    pub tool_calls: Vec<ToolCallRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub model: String,
    pub usage: Usage,
}

impl ResearchResult {
    pub fn success(
        ticker: impl Into<String>,
        report: impl Into<String>,
        tool_calls: Vec<ToolCallRecord>,
        model: impl Into<String>,
        usage: Usage,
    ) -> Self {
        Self {
            success: true,
            ticker: ticker.into(),
            report: Some(report.into()),
            tool_calls,
            error: None,
            model: model.into(),
            usage,
        }
    }

    pub fn failure(
        ticker: impl Into<String>,
        error: impl Into<String>,
        tool_calls: Vec<ToolCallRecord>,
        model: impl Into<String>,
        usage: Usage,
    ) -> Self {
        Self {
            success: false,
            ticker: ticker.into(),
            report: None,
            tool_calls,
            error: Some(error.into()),
            model: model.into(),
            usage,
        }
    }
}
