//! Agent configuration.

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration shared by the research agent and the summarizer.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// The model to use (e.g., "gemini-1.5-flash", "gpt-4o")
    pub model: String,
    /// Maximum number of model turns in one research run
    pub max_iterations: usize,
    /// Temperature for LLM sampling
    pub temperature: Option<f32>,
    /// Maximum tokens for LLM response
    pub max_tokens: Option<u32>,
    /// Custom research persona (embedded in the system prompt template)
    pub system: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_iterations: 10,
            temperature: Some(0.7),
            max_tokens: Some(4096),
            system: None,
        }
    }
}

impl AgentConfig {
    /// Create a new config with the specified model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Set a custom research persona.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub(crate) fn options(&self) -> crate::llm::GenerateOptions {
        crate::llm::GenerateOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
