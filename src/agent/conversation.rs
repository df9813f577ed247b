//! Conversation history for a single research request

use crate::llm::{ContentBlock, Message, Role};

/// Ordered list of turns sent to the model
///
/// Starts with one user turn and only ever grows. Each tool round adds an
/// assistant turn carrying the tool requests followed by a user turn that
/// answers every request, in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Message>,
}

impl Conversation {
    pub fn new(opening: impl Into<String>) -> Self {
        Self {
            turns: vec![Message::user(opening)],
        }
    }

    /// Record one tool round: the model's full response and the matching results
    pub fn push_round(&mut self, assistant: Vec<ContentBlock>, results: Vec<ContentBlock>) {
        self.turns.push(Message::assistant(assistant));
        self.turns.push(Message::tool_results(results));
    }

    pub fn messages(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Check turn alternation and tool-use/tool-result correlation
    pub fn is_well_formed(&self) -> bool {
        let Some((first, rest)) = self.turns.split_first() else {
            return false;
        };
        if first.role != Role::User || rest.len() % 2 != 0 {
            return false;
        }

        rest.chunks(2).all(|pair| {
            let (assistant, user) = (&pair[0], &pair[1]);
            let requested = assistant.tool_use_ids();
            assistant.role == Role::Assistant
                && user.role == Role::User
                && !requested.is_empty()
                && requested == user.tool_result_ids()
                && user.content.len() == requested.len()
        })
    }
}
