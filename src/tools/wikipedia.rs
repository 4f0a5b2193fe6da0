//! Encyclopedia lookup via the MediaWiki API.

use serde::Deserialize;

use crate::error::{Error, Result};

pub const WIKIPEDIA_TOOL: &str = "wikipedia";

const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const NO_RESULT: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    pub endpoint: String,
    /// Number of articles to include
    pub top_k: u32,
    /// Cap on the returned text
    pub max_chars: usize,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            top_k: 1,
            max_chars: 2000,
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: Option<String>,
}

/// Search Wikipedia and return the intro of the best matching articles.
pub fn wikipedia_lookup(agent: &ureq::Agent, config: &WikipediaConfig, query: &str) -> Result<String> {
    tracing::debug!(query, "Wikipedia lookup");
    let limit = config.top_k.max(1).to_string();

    let response = agent
        .get(&config.endpoint)
        .query("action", "query")
        .query("format", "json")
        .query("formatversion", "2")
        .query("generator", "search")
        .query("gsrsearch", query)
        .query("gsrlimit", &limit)
        .query("prop", "extracts")
        .query("exintro", "1")
        .query("explaintext", "1")
        .header("User-Agent", concat!("scribe/", env!("CARGO_PKG_VERSION")))
        .call();

    let mut response = match response {
        Ok(resp) => resp,
        Err(ureq::Error::StatusCode(code)) => {
            return Err(Error::Tool(format!("HTTP error {}", code)));
        }
        Err(e) => return Err(Error::Tool(format!("Request error: {}", e))),
    };

    let data: QueryResponse = response
        .body_mut()
        .read_json()
        .map_err(|e| Error::Tool(format!("Error parsing Wikipedia response: {}", e)))?;

    let mut pages = data.query.map(|q| q.pages).unwrap_or_default();
    pages.sort_by_key(|p| p.index);
    Ok(render_pages(&pages, config.max_chars))
}

fn render_pages(pages: &[Page], max_chars: usize) -> String {
    let summaries: Vec<String> = pages
        .iter()
        .filter_map(|page| {
            let extract = page.extract.as_deref()?.trim();
            (!extract.is_empty()).then(|| format!("Page: {}\nSummary: {}", page.title, extract))
        })
        .collect();

    if summaries.is_empty() {
        return NO_RESULT.to_string();
    }

    summaries.join("\n\n").chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(title: &str, index: u32, extract: Option<&str>) -> Page {
        Page {
            title: title.into(),
            index,
            extract: extract.map(String::from),
        }
    }

    #[test]
    fn test_render_caps_length() {
        let pages = vec![page("Telegraphy", 1, Some("t".repeat(5000).as_str()))];
        let rendered = render_pages(&pages, 100);
        assert_eq!(rendered.chars().count(), 100);
        assert!(rendered.starts_with("Page: Telegraphy\nSummary: "));
    }

    #[test]
    fn test_render_no_result() {
        assert_eq!(render_pages(&[], 100), NO_RESULT);
        assert_eq!(render_pages(&[page("Empty", 1, Some("  "))], 100), NO_RESULT);
    }

    #[tokio::test]
    async fn test_lookup_orders_by_search_rank() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("generator", "search"))
            .and(query_param("gsrsearch", "telegraph"))
            .and(query_param("gsrlimit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"pages": [
                    {"title": "Semaphore line", "index": 2, "extract": "Optical telegraph."},
                    {"title": "Electrical telegraph", "index": 1, "extract": "Wired signalling."}
                ]}
            })))
            .mount(&server)
            .await;

        let config = WikipediaConfig {
            endpoint: server.uri(),
            top_k: 2,
            max_chars: 2000,
        };
        let output = tokio::task::spawn_blocking(move || {
            wikipedia_lookup(&ureq::Agent::new_with_defaults(), &config, "telegraph")
        })
        .await
        .unwrap()
        .unwrap();

        let electrical = output.find("Electrical telegraph").unwrap();
        let semaphore = output.find("Semaphore line").unwrap();
        assert!(electrical < semaphore);
    }

    #[tokio::test]
    async fn test_lookup_without_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"batchcomplete": true})))
            .mount(&server)
            .await;

        let config = WikipediaConfig {
            endpoint: server.uri(),
            ..WikipediaConfig::default()
        };
        let output = tokio::task::spawn_blocking(move || {
            wikipedia_lookup(&ureq::Agent::new_with_defaults(), &config, "zzzz")
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(output, NO_RESULT);
    }
}
