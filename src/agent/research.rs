//! The research agent loop
//!
//! The agent sends the conversation to the model, runs every tool the model
//! asks for, feeds the results back and repeats until the model stops asking.
//! The final text blocks form the report.

use std::sync::Arc;

use crate::error::{ResearchError, Result};
use crate::llm::{CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, StopReason, Usage};
use crate::tools::{ToolCatalog, ToolDispatcher};

use super::conversation::Conversation;
use super::prompt::{SYSTEM_PROMPT, research_request};
use super::record::{ResearchResult, ToolCallRecord};

/// Configuration for the ResearchAgent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum tokens per model response
    pub max_tokens: u32,
    /// Maximum number of tool rounds before the request is abandoned
    pub max_tool_rounds: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tokens: crate::llm::anthropic::DEFAULT_MAX_TOKENS,
            max_tool_rounds: 10,
        }
    }
}

/// Accumulated state of one `run`
#[derive(Debug, Default)]
struct RunState {
    records: Vec<ToolCallRecord>,
    usage: Usage,
}

/// Drives the tool-use conversation for research requests
pub struct ResearchAgent<L, D>
where
    L: LlmClient,
    D: ToolDispatcher,
{
    llm: Arc<L>,
    dispatcher: Arc<D>,
    catalog: ToolCatalog,
    config: AgentConfig,
}

impl<L, D> ResearchAgent<L, D>
where
    L: LlmClient,
    D: ToolDispatcher,
{
    pub fn new(llm: Arc<L>, dispatcher: Arc<D>) -> Self {
        Self::with_config(llm, dispatcher, AgentConfig::default())
    }

    pub fn with_config(llm: Arc<L>, dispatcher: Arc<D>, config: AgentConfig) -> Self {
        Self {
            llm,
            dispatcher,
            catalog: ToolCatalog::new(),
            config,
        }
    }

    /// Research `ticker` and return the report or the reason it failed
    ///
    /// Never returns an error: failures become a result with `success: false`
    /// that still lists the tool calls made before the failure.
    pub async fn run(&self, ticker: &str, detailed: bool) -> ResearchResult {
        let ticker = ticker.to_uppercase();
        let model = self.llm.model().to_string();
        let mut state = RunState::default();

        log::info!("Starting research for {} (detailed: {})", ticker, detailed);

        match self.drive(&ticker, detailed, &mut state).await {
            Ok(report) => {
                log::info!(
                    "Research for {} finished after {} tool calls ({} tokens)",
                    ticker,
                    state.records.len(),
                    state.usage.total()
                );
                ResearchResult::success(ticker, report, state.records, model, state.usage)
            }
            Err(e) => {
                log::error!("Research for {} failed: {}", ticker, e);
                ResearchResult::failure(ticker, e.to_string(), state.records, model, state.usage)
            }
        }
    }

    async fn drive(&self, ticker: &str, detailed: bool, state: &mut RunState) -> Result<String> {
        let mut conversation = Conversation::new(research_request(ticker, detailed));
        let mut response = self.send(&conversation, state).await?;
        let mut rounds: u32 = 0;

        while response.stop_reason.needs_continuation() {
            if rounds >= self.config.max_tool_rounds {
                return Err(ResearchError::IterationBudgetExceeded {
                    limit: self.config.max_tool_rounds,
                });
            }
            rounds += 1;

            let calls = response.tool_calls();
            if calls.is_empty() {
                return Err(LlmError::InvalidResponse("tool_use stop reason without tool_use blocks".to_string()).into());
            }

            log::debug!("Tool round {}: {} call(s)", rounds, calls.len());

            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                let output = self.dispatcher.dispatch(&call.name, &call.input).await?;
                state.records.push(ToolCallRecord::new(call.name.clone(), call.input.clone(), &output));
                results.push(ContentBlock::tool_result(call.id, output));
            }

            conversation.push_round(response.content, results);
            debug_assert!(conversation.is_well_formed());

            response = self.send(&conversation, state).await?;
        }

        if response.stop_reason != StopReason::EndTurn {
            log::warn!("Model stopped with {:?}, using the text it produced", response.stop_reason);
        }

        Ok(response.joined_text())
    }

    async fn send(&self, conversation: &Conversation, state: &mut RunState) -> Result<CompletionResponse> {
        let mut request = CompletionRequest::new(SYSTEM_PROMPT)
            .with_tools(self.catalog.definitions())
            .with_max_tokens(self.config.max_tokens);
        request.messages = conversation.messages().to_vec();

        let response = self.llm.complete(&request).await?;
        state.usage.add(&response.usage);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, Role, ToolCall};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Dispatcher that echoes the tool name, recording every call
    struct EchoDispatcher {
        calls: Mutex<Vec<(String, Value)>>,
        fail_on: Option<String>,
    }

    impl EchoDispatcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(tool: &str) -> Self {
            Self {
                fail_on: Some(tool.to_string()),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ToolDispatcher for EchoDispatcher {
        async fn dispatch(&self, name: &str, input: &Value) -> Result<String> {
            self.calls.lock().unwrap().push((name.to_string(), input.clone()));
            if self.fail_on.as_deref() == Some(name) {
                return Err(ResearchError::missing_argument(name, "ticker"));
            }
            Ok(format!("{{\"tool\": \"{}\"}}", name))
        }
    }

    fn price_call(id: &str) -> ToolCall {
        ToolCall::new(id, "get_crypto_price", json!({"ticker": "BTC"}))
    }

    fn agent(llm: MockLlmClient, dispatcher: EchoDispatcher) -> (ResearchAgent<MockLlmClient, EchoDispatcher>, Arc<MockLlmClient>, Arc<EchoDispatcher>) {
        let llm = Arc::new(llm);
        let dispatcher = Arc::new(dispatcher);
        (ResearchAgent::new(llm.clone(), dispatcher.clone()), llm, dispatcher)
    }

    #[tokio::test]
    async fn test_direct_answer_without_tools() {
        let (agent, llm, dispatcher) = agent(
            MockLlmClient::new(vec![CompletionResponse::text("Just text").with_usage(Usage::new(7, 3))]),
            EchoDispatcher::new(),
        );

        let result = agent.run("btc", false).await;

        assert!(result.success);
        assert_eq!(result.ticker, "BTC");
        assert_eq!(result.report.as_deref(), Some("Just text"));
        assert!(result.tool_calls.is_empty());
        assert_eq!(result.model, "mock-model");
        assert_eq!(result.usage, Usage::new(7, 3));
        assert_eq!(llm.call_count(), 1);
        assert!(dispatcher.calls.lock().unwrap().is_empty());

        let request = &llm.requests()[0];
        assert_eq!(request.system, SYSTEM_PROMPT);
        assert_eq!(request.tools.len(), 2);
        assert_eq!(request.max_tokens, Some(4096));
        assert_eq!(request.messages, vec![crate::llm::Message::user(research_request("BTC", false))]);
    }

    #[tokio::test]
    async fn test_tool_round_feeds_results_back() {
        let (agent, llm, _) = agent(
            MockLlmClient::new(vec![
                CompletionResponse::tool_use(vec![price_call("t1")]).with_usage(Usage::new(10, 2)),
                CompletionResponse::text("Part one. ").with_usage(Usage::new(20, 4)),
            ]),
            EchoDispatcher::new(),
        );

        let result = agent.run("BTC", true).await;

        assert!(result.success);
        assert_eq!(result.usage, Usage::new(30, 6));
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].tool, "get_crypto_price");
        assert_eq!(result.tool_calls[0].result_preview, "{\"tool\": \"get_crypto_price\"}");

        let requests = llm.requests();
        assert_eq!(requests[0].messages[0].content[0], ContentBlock::text(research_request("BTC", true)));
        let second = &requests[1].messages;
        assert_eq!(second.len(), 3);
        assert_eq!(second[1].role, Role::Assistant);
        assert_eq!(second[2].role, Role::User);
        assert_eq!(second[2].tool_result_ids(), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_report_concatenates_text_blocks() {
        let final_response = CompletionResponse {
            content: vec![ContentBlock::text("# Brief\n"), ContentBlock::text("Body")],
            ..Default::default()
        };
        let (agent, _, _) = agent(MockLlmClient::new(vec![final_response]), EchoDispatcher::new());

        let result = agent.run("ETH", false).await;
        assert_eq!(result.report.as_deref(), Some("# Brief\nBody"));
    }

    #[tokio::test]
    async fn test_llm_failure_keeps_records() {
        let llm = MockLlmClient::new(vec![CompletionResponse::tool_use(vec![price_call("t1")])])
            .then_fail(500, "overloaded");
        let (agent, _, _) = agent(llm, EchoDispatcher::new());

        let result = agent.run("BTC", false).await;

        assert!(!result.success);
        assert!(result.report.is_none());
        assert!(result.error.unwrap().contains("overloaded"));
        assert_eq!(result.tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_failure_aborts_loop() {
        let (agent, llm, dispatcher) = agent(
            MockLlmClient::new(vec![CompletionResponse::tool_use(vec![
                price_call("t1"),
                ToolCall::new("t2", "get_crypto_news", json!({})),
                price_call("t3"),
            ])]),
            EchoDispatcher::failing_on("get_crypto_news"),
        );

        let result = agent.run("BTC", false).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("missing required argument"));
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(dispatcher.calls.lock().unwrap().len(), 2);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_iteration_budget() {
        let llm = MockLlmClient::repeating(CompletionResponse::tool_use(vec![price_call("loop")]));
        let llm = Arc::new(llm);
        let dispatcher = Arc::new(EchoDispatcher::new());
        let agent = ResearchAgent::with_config(
            llm.clone(),
            dispatcher,
            AgentConfig {
                max_tokens: 1024,
                max_tool_rounds: 3,
            },
        );

        let result = agent.run("BTC", false).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Exceeded iteration budget of 3 tool rounds"));
        assert_eq!(result.tool_calls.len(), 3);
        assert_eq!(llm.call_count(), 4);
    }

    #[tokio::test]
    async fn test_tool_use_without_blocks_is_protocol_error() {
        let empty = CompletionResponse {
            content: vec![ContentBlock::text("thinking")],
            stop_reason: StopReason::ToolUse,
            usage: Usage::default(),
        };
        let (agent, llm, _) = agent(MockLlmClient::new(vec![empty]), EchoDispatcher::new());

        let result = agent.run("BTC", false).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("without tool_use blocks"));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_max_tokens_stop_returns_partial_text() {
        let truncated = CompletionResponse {
            content: vec![ContentBlock::text("cut off")],
            stop_reason: StopReason::MaxTokens,
            usage: Usage::default(),
        };
        let (agent, _, _) = agent(MockLlmClient::new(vec![truncated]), EchoDispatcher::new());

        let result = agent.run("BTC", false).await;
        assert!(result.success);
        assert_eq!(result.report.as_deref(), Some("cut off"));
    }
}
