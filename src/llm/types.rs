//! LLM types for Anthropic API communication
//!
//! This module defines the conversation and completion types exchanged with
//! the reasoning engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One block of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },

    /// A request from the engine to invoke a named tool
    ToolUse { id: String, name: String, input: Value },

    /// The serialized output of a tool, correlated by `tool_use_id`
    ToolResult { tool_use_id: String, content: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
        }
    }

    /// View a tool_use block as a ToolCall
    pub fn as_tool_call(&self) -> Option<ToolCall> {
        match self {
            Self::ToolUse { id, name, input } => Some(ToolCall::new(id.clone(), name.clone(), input.clone())),
            _ => None,
        }
    }
}

/// A turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message holding a single text block
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Create an assistant message from response content
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Create the user message answering a round of tool requests
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: results,
        }
    }

    /// Correlation ids of the tool_use blocks, in order
    pub fn tool_use_ids(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Correlation ids of the tool_result blocks, in order
    pub fn tool_result_ids(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolResult { tool_use_id, .. } => Some(tool_use_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Tool definition advertised to the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Convert to Anthropic API schema format
    pub fn to_anthropic_schema(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema
        })
    }
}

/// A tool call from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// Reason why the LLM stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    Other(String),
}

impl StopReason {
    /// Parse the API's stop_reason string
    pub fn from_api(reason: &str) -> Self {
        match reason {
            "end_turn" => Self::EndTurn,
            "tool_use" => Self::ToolUse,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if the stop reason indicates more work is needed
    pub fn needs_continuation(&self) -> bool {
        matches!(self, StopReason::ToolUse)
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    /// Create new usage stats
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Calculate total tokens
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Accumulate usage from another instance
    pub fn add(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Request to the LLM for completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
}

impl CompletionRequest {
    /// Create a new completion request with a system prompt
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add a user message
    pub fn with_user_message(self, content: impl Into<String>) -> Self {
        self.with_message(Message::user(content))
    }

    /// Add tools to the request
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from the LLM
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl CompletionResponse {
    /// A final answer made of one text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        }
    }

    /// A response requesting the given tools
    pub fn tool_use(calls: Vec<ToolCall>) -> Self {
        Self {
            content: calls
                .into_iter()
                .map(|c| ContentBlock::tool_use(c.id, c.name, c.input))
                .collect(),
            stop_reason: StopReason::ToolUse,
            usage: Usage::default(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Concatenate all text blocks, in order
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tool calls requested by this response, in order
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content.iter().filter_map(ContentBlock::as_tool_call).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_content_block_wire_format() {
        let block = ContentBlock::tool_use("toolu_1", "get_crypto_price", json!({"ticker": "BTC"}));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "tool_use");
        assert_eq!(value["id"], "toolu_1");
        assert_eq!(value["input"]["ticker"], "BTC");

        let result = ContentBlock::tool_result("toolu_1", "{}");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "tool_result");
        assert_eq!(value["tool_use_id"], "toolu_1");

        let text = serde_json::to_value(ContentBlock::text("hi")).unwrap();
        assert_eq!(text, json!({"type": "text", "text": "hi"}));
    }

    #[test]
    fn test_message_user_is_single_text_block() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, vec![ContentBlock::text("Hello")]);
    }

    #[test]
    fn test_message_correlation_ids() {
        let assistant = Message::assistant(vec![
            ContentBlock::text("Looking up"),
            ContentBlock::tool_use("a", "get_crypto_price", json!({})),
            ContentBlock::tool_use("b", "get_crypto_news", json!({})),
        ]);
        assert_eq!(assistant.tool_use_ids(), vec!["a", "b"]);
        assert!(assistant.tool_result_ids().is_empty());

        let results = Message::tool_results(vec![
            ContentBlock::tool_result("a", "1"),
            ContentBlock::tool_result("b", "2"),
        ]);
        assert_eq!(results.role, Role::User);
        assert_eq!(results.tool_result_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_tool_definition_to_anthropic_schema() {
        let tool = ToolDefinition::new(
            "get_crypto_price",
            "Fetch price",
            json!({"type": "object", "properties": {"ticker": {"type": "string"}}, "required": ["ticker"]}),
        );
        let schema = tool.to_anthropic_schema();
        assert_eq!(schema["name"], "get_crypto_price");
        assert_eq!(schema["description"], "Fetch price");
        assert!(schema["input_schema"].is_object());
    }

    #[test]
    fn test_stop_reason_from_api() {
        assert_eq!(StopReason::from_api("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_api("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from_api("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_api("stop_sequence"), StopReason::StopSequence);
        assert_eq!(StopReason::from_api("refusal"), StopReason::Other("refusal".to_string()));
    }

    #[test]
    fn test_stop_reason_needs_continuation() {
        assert!(StopReason::ToolUse.needs_continuation());
        assert!(!StopReason::EndTurn.needs_continuation());
        assert!(!StopReason::MaxTokens.needs_continuation());
        assert!(!StopReason::Other("pause_turn".into()).needs_continuation());
    }

    #[test]
    fn test_usage_add() {
        let mut usage = Usage::new(100, 50);
        usage.add(&Usage::new(200, 100));
        assert_eq!(usage.input_tokens, 300);
        assert_eq!(usage.output_tokens, 150);
        assert_eq!(usage.total(), 450);
    }

    #[test]
    fn test_completion_request_builder() {
        let req = CompletionRequest::new("You are an analyst")
            .with_user_message("Research BTC")
            .with_max_tokens(4096);

        assert_eq!(req.system, "You are an analyst");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.max_tokens, Some(4096));
        assert!(req.tools.is_empty());
    }

    #[test]
    fn test_response_joined_text_skips_tool_blocks() {
        let resp = CompletionResponse {
            content: vec![
                ContentBlock::text("Part one. "),
                ContentBlock::tool_use("x", "get_crypto_price", json!({})),
                ContentBlock::text("Part two."),
            ],
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        };
        assert_eq!(resp.joined_text(), "Part one. Part two.");
        assert_eq!(resp.tool_calls().len(), 1);
        assert_eq!(resp.tool_calls()[0].id, "x");
    }

    #[test]
    fn test_response_constructors() {
        let done = CompletionResponse::text("Report body");
        assert_eq!(done.stop_reason, StopReason::EndTurn);
        assert_eq!(done.joined_text(), "Report body");

        let calls = CompletionResponse::tool_use(vec![ToolCall::new("t1", "get_crypto_news", json!({"ticker": "ETH"}))]);
        assert_eq!(calls.stop_reason, StopReason::ToolUse);
        assert_eq!(calls.tool_calls()[0].input["ticker"], "ETH");
    }
}
