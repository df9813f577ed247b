//! LLM Client Layer - Anthropic API integration
//!
//! This module provides:
//! - Conversation and completion types
//! - LlmClient trait for API abstraction
//! - AnthropicClient implementation
//! - MockLlmClient for scripted runs

pub mod anthropic;
pub mod client;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, LlmError, MockLlmClient};
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, Role, StopReason, ToolCall, ToolDefinition, Usage,
};
