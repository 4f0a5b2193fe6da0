//! Web search via the Exa API.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SEARCH_TOOL: &str = "search";

const DEFAULT_ENDPOINT: &str = "https://api.exa.ai/search";
const SNIPPET_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Exa API key; searching without one reports an error to the model
    pub api_key: Option<String>,
    pub endpoint: String,
    pub num_results: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            num_results: 5,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest<'a> {
    query: &'a str,
    num_results: u32,
    #[serde(rename = "type")]
    search_type: &'static str,
    contents: ExaContents,
}

#[derive(Serialize)]
struct ExaContents {
    text: bool,
}

#[derive(Deserialize)]
struct ExaSearchResponse {
    results: Vec<ExaResult>,
}

#[derive(Deserialize)]
struct ExaResult {
    title: Option<String>,
    url: String,
    text: Option<String>,
}

/// Search the web and render the hits as plain text.
pub fn web_search(agent: &ureq::Agent, config: &SearchConfig, query: &str) -> Result<String> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| Error::Tool("web search is not configured (EXA_API_KEY not set)".into()))?;

    let request = ExaSearchRequest {
        query,
        num_results: config.num_results.clamp(1, 10),
        search_type: "auto",
        contents: ExaContents { text: true },
    };

    tracing::debug!(query, "Web search");
    let response = agent
        .post(&config.endpoint)
        .header("x-api-key", api_key)
        .header("Content-Type", "application/json")
        .send_json(&request);

    match response {
        Ok(mut resp) => {
            let data: ExaSearchResponse = resp
                .body_mut()
                .read_json()
                .map_err(|e| Error::Tool(format!("Error parsing search response: {}", e)))?;
            Ok(render_results(&data.results))
        }
        Err(ureq::Error::StatusCode(code)) => Err(Error::Tool(format!("HTTP error {}", code))),
        Err(e) => Err(Error::Tool(format!("Request error: {}", e))),
    }
}

fn render_results(results: &[ExaResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .map(|r| {
            let snippet: String = r
                .text
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(SNIPPET_CHARS)
                .collect();
            format!(
                "Title: {}\nURL: {}\n{}",
                r.title.as_deref().unwrap_or("(untitled)"),
                r.url,
                snippet.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}
