//! Output parser: raw model text to a validated schema instance.

use std::marker::PhantomData;

use jsonschema::Validator;
use regex::Regex;
use serde_json::Value;

use crate::error::ParseError;
use crate::schema::Schema;

/// Parses model text into `T`, failing on anything that does not conform.
///
/// The text must be a single JSON object, or contain one inside a fenced
/// code block; the first fenced block wins and text around it is ignored. The object is checked against `T::json_schema()` before
/// deserialization, so a missing or mistyped field is always a
/// [`ParseError`] and never a partially populated value.
pub struct OutputParser<T> {
    validator: Validator,
    /// First ```json ... ``` (or bare ```) block anywhere in the text
    fence_regex: Regex,
    _schema: PhantomData<fn() -> T>,
}

impl<T: Schema> OutputParser<T> {
    pub fn new() -> Self {
        Self {
            validator: jsonschema::validator_for(&T::json_schema())
                .expect("schema definitions are valid JSON Schema"),
            fence_regex: Regex::new(r"(?s)```(?:json|JSON)?\s*\n?(.*?)\n?\s*```").unwrap(),
            _schema: PhantomData,
        }
    }

    /// Parse `raw_text` into a validated `T`.
    pub fn parse(&self, raw_text: &str) -> Result<T, ParseError> {
        let candidate = self.strip_fence(raw_text);

        let value: Value = serde_json::from_str(candidate).map_err(|e| {
            ParseError::new(T::NAME, format!("invalid JSON: {}", e), raw_text)
        })?;

        let violations: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{} at {}", e, path)
                }
            })
            .collect();
        if !violations.is_empty() {
            return Err(ParseError::new(T::NAME, violations.join("; "), raw_text));
        }

        serde_json::from_value(value)
            .map_err(|e| ParseError::new(T::NAME, e.to_string(), raw_text))
    }

    /// Contents of the first code fence, or the whole text if there is none.
    fn strip_fence<'a>(&self, text: &'a str) -> &'a str {
        let trimmed = text.trim();
        self.fence_regex
            .captures(trimmed)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(trimmed)
    }
}

impl<T: Schema> Default for OutputParser<T> {
    fn default() -> Self {
        Self::new()
    }
}
