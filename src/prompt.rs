//! Prompt templates.
//!
//! All model-facing text lives here, parameterized by the schema's shape so
//! that schema and prompt changes stay in step. Bump [`PROMPT_VERSION`] when
//! editing any template.

use crate::schema::Schema;

/// Version of the prompt set below.
pub const PROMPT_VERSION: u32 = 1;

/// Default research persona.
pub const DEFAULT_RESEARCH_SYSTEM: &str =
    "You are a research assistant that will help generate a research paper.";

/// System prompt for the research agent.
pub const RESEARCH_SYSTEM_TEMPLATE: &str = r#"{system}
Answer the user query and use necessary tools.
Wrap the output in this format and provide no other text
{format_instructions}"#;

/// System prompt for the summarization pipeline.
pub const SUMMARY_SYSTEM_TEMPLATE: &str = r#"You are a content summarization assistant.
Summarize the provided content clearly and concisely.
Wrap the output in this format and provide no other text
{format_instructions}"#;

/// Human turn for the summarization pipeline.
pub const SUMMARY_HUMAN_TEMPLATE: &str = "Please summarize the following content: {content}";

/// Format instructions wrapped around a schema description.
pub const FORMAT_INSTRUCTIONS_TEMPLATE: &str = r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {"properties": {"foo": {"title": "Foo", "description": "a list of strings", "type": "array", "items": {"type": "string"}}}, "required": ["foo"]}
the object {"foo": ["bar", "baz"]} is a well-formatted instance of the schema. The object {"properties": {"foo": ["bar", "baz"]}} is not well-formatted.

Here is the output schema:
```
{schema}
```"#;

/// Format instructions for schema `T`.
pub fn format_instructions<T: Schema>() -> String {
    FORMAT_INSTRUCTIONS_TEMPLATE.replace("{schema}", &T::json_schema().to_string())
}

/// Research system prompt with an optional custom persona.
pub fn research_system_prompt<T: Schema>(system: Option<&str>) -> String {
    RESEARCH_SYSTEM_TEMPLATE
        .replace("{system}", system.unwrap_or(DEFAULT_RESEARCH_SYSTEM))
        .replace("{format_instructions}", &format_instructions::<T>())
}

/// Summary system prompt.
pub fn summary_system_prompt<T: Schema>() -> String {
    SUMMARY_SYSTEM_TEMPLATE.replace("{format_instructions}", &format_instructions::<T>())
}

/// Summary human turn embedding the content.
pub fn summary_human_prompt(content: &str) -> String {
    SUMMARY_HUMAN_TEMPLATE.replace("{content}", content)
}
