//! Agent events and callbacks for observability.

use std::sync::Arc;

use serde_json::Value;

/// Events emitted during a research run. They trace execution and never
/// change the returned result.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Starting a new iteration
    IterationStart {
        iteration: usize,
        max_iterations: usize,
    },
    /// About to call the LLM
    LlmRequest { message_count: usize },
    /// LLM responded
    LlmResponse { content: String, tool_calls: usize },
    /// The model asked for a tool
    ToolCall { name: String, arguments: Value },
    /// A tool returned (or failed)
    ToolResult {
        name: String,
        output: String,
        success: bool,
    },
    /// Final text parsed into a result
    Finish { topic: String },
    /// An error occurred
    Error { message: String },
}

/// Type alias for event callbacks
pub type EventCallback = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

/// Storage for agent callbacks
#[derive(Default, Clone)]
pub struct AgentCallbacks {
    pub on_iteration_start: Option<EventCallback>,
    pub on_llm_request: Option<EventCallback>,
    pub on_llm_response: Option<EventCallback>,
    pub on_tool_call: Option<EventCallback>,
    pub on_tool_result: Option<EventCallback>,
    pub on_finish: Option<EventCallback>,
    pub on_error: Option<EventCallback>,
    /// Catch-all callback for any event
    pub on_event: Option<EventCallback>,
}

impl AgentCallbacks {
    /// Emit an event to the appropriate callback(s)
    pub fn emit(&self, event: &AgentEvent) {
        let specific = match event {
            AgentEvent::IterationStart { .. } => &self.on_iteration_start,
            AgentEvent::LlmRequest { .. } => &self.on_llm_request,
            AgentEvent::LlmResponse { .. } => &self.on_llm_response,
            AgentEvent::ToolCall { .. } => &self.on_tool_call,
            AgentEvent::ToolResult { .. } => &self.on_tool_result,
            AgentEvent::Finish { .. } => &self.on_finish,
            AgentEvent::Error { .. } => &self.on_error,
        };

        if let Some(cb) = specific {
            cb(event);
        }

        if let Some(cb) = &self.on_event {
            cb(event);
        }
    }
}

fn preview(text: &str, max: usize) -> String {
    let mut out: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        out.push_str("...");
    }
    out.replace('\n', "\\n")
}

/// Callbacks that trace every step through `tracing`.
pub fn verbose_callbacks() -> AgentCallbacks {
    AgentCallbacks {
        on_iteration_start: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::IterationStart {
                iteration,
                max_iterations,
            } = e
            {
                tracing::info!(iteration, max_iterations, "Agent iteration");
            }
        })),
        on_llm_request: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::LlmRequest { message_count } = e {
                tracing::debug!(message_count, "Calling LLM");
            }
        })),
        on_llm_response: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::LlmResponse {
                content,
                tool_calls,
            } = e
            {
                tracing::info!(tool_calls, content = %preview(content, 100), "LLM response");
            }
        })),
        on_tool_call: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::ToolCall { name, arguments } = e {
                tracing::info!(tool = %name, arguments = %arguments, "Invoking tool");
            }
        })),
        on_tool_result: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::ToolResult {
                name,
                output,
                success,
            } = e
            {
                tracing::info!(tool = %name, success, output = %preview(output, 200), "Tool returned");
            }
        })),
        on_finish: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::Finish { topic } = e {
                tracing::info!(topic = %topic, "Research finished");
            }
        })),
        on_error: Some(Arc::new(|e: &AgentEvent| {
            if let AgentEvent::Error { message } = e {
                tracing::warn!(error = %message, "Agent error");
            }
        })),
        ..Default::default()
    }
}
