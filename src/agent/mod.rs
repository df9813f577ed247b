//! Research agent - prompt, conversation, loop and result records

mod conversation;
mod prompt;
mod record;
mod research;

pub use conversation::Conversation;
pub use prompt::{DETAIL_SUFFIX, SYSTEM_PROMPT, research_request};
pub use record::{PREVIEW_CHARS, ResearchResult, ToolCallRecord, preview};
pub use research::{AgentConfig, ResearchAgent};
