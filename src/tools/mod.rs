//! Tool catalog for the research agent.
//!
//! A tool is a [`ToolInfo`] (what the model sees) plus a handler closure
//! (what runs). Handlers are blocking; the agent runs them on tokio's
//! blocking pool.

mod save;
mod search;
mod wikipedia;

pub use save::{SAVE_TOOL, SaveConfig, save_text_to_file};
pub use search::{SEARCH_TOOL, SearchConfig, web_search};
pub use wikipedia::{WIKIPEDIA_TOOL, WikipediaConfig, wikipedia_lookup};

use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::llm::ToolSpec;

/// A tool handler: JSON arguments in, text out.
pub type ToolHandler = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
struct ToolArg {
    name: String,
    kind: String,
    description: String,
    required: bool,
}

/// Name, description and argument list of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    args: Vec<ToolArg>,
}

impl ToolInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args: Vec::new(),
        }
    }

    /// Add a required argument. `kind` is a JSON Schema type name.
    pub fn arg(mut self, name: &str, kind: &str, description: &str) -> Self {
        self.args.push(ToolArg {
            name: name.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            required: true,
        });
        self
    }

    /// Add an optional argument.
    pub fn arg_opt(mut self, name: &str, kind: &str, description: &str) -> Self {
        self.args.push(ToolArg {
            name: name.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            required: false,
        });
        self
    }

    /// JSON Schema of the arguments object.
    pub fn parameters(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for arg in &self.args {
            properties.insert(
                arg.name.clone(),
                json!({ "type": arg.kind, "description": arg.description }),
            );
        }
        let required: Vec<&str> = self
            .args
            .iter()
            .filter(|a| a.required)
            .map(|a| a.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters(),
        }
    }
}

/// Registered tools, in registration order.
#[derive(Clone, Default)]
pub struct Toolbox {
    tools: Vec<(ToolInfo, ToolHandler)>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register<F>(&mut self, info: ToolInfo, f: F)
    where
        F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
    {
        self.tools.retain(|(existing, _)| existing.name != info.name);
        self.tools.push((info, Arc::new(f)));
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|(info, _)| info.spec()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(info, _)| info.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up the handler for `name`.
    pub fn handler(&self, name: &str) -> Result<ToolHandler> {
        self.tools
            .iter()
            .find(|(info, _)| info.name == name)
            .map(|(_, handler)| handler.clone())
            .ok_or_else(|| Error::Tool(format!("Unknown tool: {}", name)))
    }

    /// Run the tool `name` with `args` on the current thread.
    pub fn call(&self, name: &str, args: &Value) -> Result<String> {
        let handler = self.handler(name)?;
        handler(args)
    }
}

/// Endpoints and keys for the standard tools.
#[derive(Debug, Clone, Default)]
pub struct ToolSettings {
    pub search: SearchConfig,
    pub wikipedia: WikipediaConfig,
    pub save: SaveConfig,
}

/// The standard catalog: web search, encyclopedia lookup and save-to-file.
pub fn standard_toolbox(settings: &ToolSettings) -> Toolbox {
    let http: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build()
        .into();

    let mut toolbox = Toolbox::new();

    let search = settings.search.clone();
    let agent = http.clone();
    toolbox.register(
        ToolInfo::new(SEARCH_TOOL, "Search the web for information")
            .arg("query", "string", "The search query"),
        move |args| web_search(&agent, &search, &string_arg(args, "query")?),
    );

    let wikipedia = settings.wikipedia.clone();
    let agent = http;
    toolbox.register(
        ToolInfo::new(WIKIPEDIA_TOOL, "Look up a topic on Wikipedia")
            .arg("query", "string", "The topic to look up"),
        move |args| wikipedia_lookup(&agent, &wikipedia, &string_arg(args, "query")?),
    );

    let save = settings.save.clone();
    toolbox.register(
        ToolInfo::new(SAVE_TOOL, "Saves structured research data to a text file")
            .arg("text", "string", "The text to save"),
        move |args| save_text_to_file(&save, &string_arg(args, "text")?),
    );

    toolbox
}

/// Read a string argument, accepting a bare string as the whole argument.
pub fn string_arg(args: &Value, name: &str) -> Result<String> {
    match args {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => match map.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(Error::Tool(format!("missing argument '{}'", name))),
        },
        other => Err(Error::Tool(format!(
            "expected an object with '{}', got {}",
            name, other
        ))),
    }
}
