//! Structured result schemas.
//!
//! Every shape the model is asked to produce implements [`Schema`], which
//! gives the parser a JSON Schema to validate against and the prompts a
//! shape description to embed in their format instructions.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// A named, typed shape that model output must conform to.
pub trait Schema: Serialize + DeserializeOwned {
    /// Name used in prompts and error messages.
    const NAME: &'static str;

    /// Machine-readable description of the expected shape.
    fn json_schema() -> Value;
}

/// Result of a research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub topic: String,
    pub summary: String,
    /// Identifiers or URLs cited, in the order the model emitted them
    pub sources: Vec<String>,
    /// Names of the tools the agent invoked
    pub tools_used: Vec<String>,
}

impl Schema for ResearchResult {
    const NAME: &'static str = "ResearchResult";

    fn json_schema() -> Value {
        object_schema(
            Self::NAME,
            &[
                ("topic", "string"),
                ("summary", "string"),
                ("sources", "array"),
                ("tools_used", "array"),
            ],
        )
    }
}

/// Structured summary of fetched, pasted or extracted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    /// URL, user-supplied label or file name
    pub source: String,
}

impl Schema for ContentSummary {
    const NAME: &'static str = "ContentSummary";

    fn json_schema() -> Value {
        object_schema(
            Self::NAME,
            &[
                ("title", "string"),
                ("summary", "string"),
                ("key_points", "array"),
                ("source", "string"),
            ],
        )
    }
}

impl ContentSummary {
    /// Replace the parsed source with a caller-supplied origin label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Build an object schema where every field is required. Arrays are arrays
/// of strings.
fn object_schema(title: &str, fields: &[(&str, &str)]) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, kind) in fields {
        let property = match *kind {
            "array" => json!({
                "title": title_case(name),
                "type": "array",
                "items": { "type": "string" }
            }),
            other => json!({ "title": title_case(name), "type": other }),
        };
        properties.insert(name.to_string(), property);
    }

    json!({
        "title": title,
        "type": "object",
        "properties": properties,
        "required": fields.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
    })
}

fn title_case(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
