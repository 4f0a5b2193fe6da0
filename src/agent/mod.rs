//! Tool-calling research agent.
//!
//! The agent hands the model a tool catalog and a system prompt that
//! mandates the [`ResearchResult`] shape, then loops: call the model, run
//! whatever tools it asks for, feed the outputs back, until the model
//! answers with plain text. That text goes through the output parser.
//!
//! ```text
//! Idle -> Reasoning -> (ToolCall -> Reasoning)* -> Terminal
//! ```
//!
//! The loop is bounded by [`AgentConfig::max_iterations`] model turns.

mod config;
mod events;

pub use config::{AgentConfig, DEFAULT_MODEL};
pub use events::{AgentCallbacks, AgentEvent, EventCallback, verbose_callbacks};

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::llm::{ChatModel, ChatRequest, Message, ToolCall};
use crate::parser::OutputParser;
use crate::prompt::research_system_prompt;
use crate::schema::ResearchResult;
use crate::tools::Toolbox;

/// A research agent bound to one model and one tool catalog.
pub struct ResearchAgent<M> {
    model: Arc<M>,
    tools: Toolbox,
    config: AgentConfig,
    parser: OutputParser<ResearchResult>,
    messages: Vec<Message>,
    /// Callbacks for observability
    callbacks: AgentCallbacks,
}

impl<M: ChatModel> ResearchAgent<M> {
    pub fn new(model: Arc<M>, tools: Toolbox, config: AgentConfig) -> Self {
        Self {
            model,
            tools,
            config,
            parser: OutputParser::new(),
            messages: Vec::new(),
            callbacks: AgentCallbacks::default(),
        }
    }

    // =========================================================================
    // Builder methods for callbacks
    // =========================================================================

    /// Enable verbose execution tracing.
    ///
    /// Logs iteration progress, model responses, tool calls and tool results.
    pub fn verbose(mut self, enabled: bool) -> Self {
        if enabled {
            let on_event = self.callbacks.on_event.take();
            self.callbacks = verbose_callbacks();
            self.callbacks.on_event = on_event;
        }
        self
    }

    /// Set a catch-all callback for any event.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_event = Some(Arc::new(f));
        self
    }

    fn emit(&self, event: AgentEvent) {
        self.callbacks.emit(&event);
    }

    /// Run one tool call. Failures become tool output so the model can react.
    async fn execute_tool(&self, call: &ToolCall) -> (String, bool) {
        let outcome = match self.tools.handler(&call.name) {
            Ok(handler) => {
                let args = call.arguments.clone();
                tokio::task::spawn_blocking(move || handler(&args))
                    .await
                    .unwrap_or_else(|e| Err(Error::Tool(format!("tool task failed: {}", e))))
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(output) => (output, true),
            Err(e) => (format!("Error: {}", e), false),
        }
    }

    // =========================================================================
    // Main run loop
    // =========================================================================

    /// Research `query` and return the parsed result.
    ///
    /// Each run starts from an empty history.
    pub async fn run(&mut self, query: &str) -> Result<ResearchResult> {
        self.messages.clear();
        self.messages.push(Message::system(research_system_prompt::<ResearchResult>(
            self.config.system.as_deref(),
        )));
        self.messages.push(Message::user(query));

        let tool_specs = self.tools.specs();

        for iteration in 1..=self.config.max_iterations {
            self.emit(AgentEvent::IterationStart {
                iteration,
                max_iterations: self.config.max_iterations,
            });
            self.emit(AgentEvent::LlmRequest {
                message_count: self.messages.len(),
            });

            let request = ChatRequest {
                model: self.config.model.clone(),
                messages: self.messages.clone(),
                tools: tool_specs.clone(),
                options: self.config.options(),
            };
            let response = match self.model.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    self.emit(AgentEvent::Error {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

            self.emit(AgentEvent::LlmResponse {
                content: response.text.clone(),
                tool_calls: response.tool_calls.len(),
            });

            // No tool calls: this is the final answer
            if response.tool_calls.is_empty() {
                self.messages.push(Message::assistant(response.text.clone()));
                return match self.parser.parse(&response.text) {
                    Ok(result) => {
                        self.emit(AgentEvent::Finish {
                            topic: result.topic.clone(),
                        });
                        Ok(result)
                    }
                    Err(e) => {
                        self.emit(AgentEvent::Error {
                            message: e.to_string(),
                        });
                        Err(e.into())
                    }
                };
            }

            self.messages.push(Message::assistant_with_tools(
                response.text,
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                self.emit(AgentEvent::ToolCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });

                let (output, success) = self.execute_tool(call).await;

                self.emit(AgentEvent::ToolResult {
                    name: call.name.clone(),
                    output: output.clone(),
                    success,
                });
                self.messages.push(Message::tool(call.id.clone(), output));
            }
        }

        self.emit(AgentEvent::Error {
            message: format!("Max iterations ({}) reached", self.config.max_iterations),
        });
        Err(Error::MaxIterations(self.config.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatResponse, Role, ScriptedModel};
    use crate::tools::ToolInfo;
    use serde_json::json;
    use std::sync::Mutex;

    const FINAL: &str = r#"{"topic": "Rust", "summary": "A systems language.", "sources": ["https://rust-lang.org"], "tools_used": ["search"]}"#;

    fn toolbox() -> Toolbox {
        let mut toolbox = Toolbox::new();
        toolbox.register(
            ToolInfo::new("search", "Search the web").arg("query", "string", "query"),
            |args| Ok(format!("results for {}", args["query"].as_str().unwrap_or(""))),
        );
        toolbox.register(ToolInfo::new("broken", "Always fails"), |_| {
            Err(Error::Tool("service unavailable".into()))
        });
        toolbox
    }

    fn agent(model: ScriptedModel) -> (Arc<ScriptedModel>, ResearchAgent<ScriptedModel>) {
        let model = Arc::new(model);
        let agent = ResearchAgent::new(model.clone(), toolbox(), AgentConfig::new("test"));
        (model, agent)
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let (model, mut agent) = agent(ScriptedModel::with_text(FINAL));
        let result = agent.run("what is rust").await.unwrap();
        assert_eq!(result.topic, "Rust");

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert!(requests[0].messages[0].content.contains("provide no other text"));
        assert_eq!(requests[0].tools.len(), 2);
    }

    #[tokio::test]
    async fn test_sampling_options_reach_model() {
        let model = Arc::new(ScriptedModel::with_text(FINAL));
        let config = AgentConfig::new("test").temperature(0.2).max_tokens(256);
        let mut agent = ResearchAgent::new(model.clone(), toolbox(), config);
        agent.run("what is rust").await.unwrap();

        let requests = model.requests();
        assert_eq!(requests[0].options.max_tokens, Some(256));
        assert_eq!(requests[0].options.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_tool_output_is_fed_back() {
        let (model, mut agent) = agent(ScriptedModel::new(vec![
            ChatResponse::tool_call("call_1", "search", json!({"query": "rust"})),
            ChatResponse::text(FINAL),
        ]));

        agent.run("what is rust").await.unwrap();

        let requests = model.requests();
        let second = &requests[1];
        let tool_turn = second.messages.last().unwrap();
        assert_eq!(tool_turn.role, Role::Tool);
        assert_eq!(tool_turn.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tool_turn.content, "results for rust");
        assert_eq!(second.messages[2].tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn test_tool_failures_become_tool_output() {
        let (model, mut agent) = agent(ScriptedModel::new(vec![
            ChatResponse {
                text: String::new(),
                tool_calls: vec![
                    ToolCall {
                        id: "a".into(),
                        name: "broken".into(),
                        arguments: json!({}),
                    },
                    ToolCall {
                        id: "b".into(),
                        name: "nonexistent".into(),
                        arguments: json!({}),
                    },
                ],
            },
            ChatResponse::text(FINAL),
        ]));

        assert!(agent.run("q").await.is_ok());

        let requests = model.requests();
        let messages = &requests[1].messages;
        let outputs: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::Tool)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].starts_with("Error: Tool error: service unavailable"));
        assert!(outputs[1].contains("Unknown tool: nonexistent"));
    }

    #[tokio::test]
    async fn test_malformed_final_text_is_parse_error() {
        let (_, mut agent) = agent(ScriptedModel::with_text("The telegraph was invented..."));
        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_iteration_bound() {
        let responses = (0..5)
            .map(|i| ChatResponse::tool_call(&format!("c{i}"), "search", json!({"query": "x"})))
            .collect();
        let model = Arc::new(ScriptedModel::new(responses));
        let mut agent = ResearchAgent::new(
            model.clone(),
            toolbox(),
            AgentConfig::new("test").max_iterations(3),
        );

        let err = agent.run("loop forever").await.unwrap_err();
        assert!(matches!(err, Error::MaxIterations(3)));
        assert_eq!(model.request_count(), 3);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let (_, mut agent) = agent(ScriptedModel::failing("unauthorized"));
        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }

    #[tokio::test]
    async fn test_events_trace_without_changing_result() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let (_, agent) = agent(ScriptedModel::new(vec![
            ChatResponse::tool_call("call_1", "search", json!({"query": "rust"})),
            ChatResponse::text(FINAL),
        ]));
        let mut agent = agent.verbose(true).on_event(move |e| {
            let name = match e {
                AgentEvent::IterationStart { .. } => "iteration",
                AgentEvent::LlmRequest { .. } => "request",
                AgentEvent::LlmResponse { .. } => "response",
                AgentEvent::ToolCall { .. } => "tool_call",
                AgentEvent::ToolResult { .. } => "tool_result",
                AgentEvent::Finish { .. } => "finish",
                AgentEvent::Error { .. } => "error",
            };
            sink.lock().unwrap().push(name);
        });

        let result = agent.run("q").await.unwrap();
        assert_eq!(result.tools_used, vec!["search"]);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "iteration",
                "request",
                "response",
                "tool_call",
                "tool_result",
                "iteration",
                "request",
                "response",
                "finish"
            ]
        );
    }

    #[tokio::test]
    async fn test_each_run_starts_fresh() {
        let (model, mut agent) = agent(ScriptedModel::new(vec![
            ChatResponse::text(FINAL),
            ChatResponse::text(FINAL),
        ]));
        agent.run("first").await.unwrap();
        agent.run("second").await.unwrap();

        let requests = model.requests();
        let second = &requests[1];
        assert_eq!(second.messages.len(), 2);
        assert_eq!(second.messages[1].content, "second");
    }
}
