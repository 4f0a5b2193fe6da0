//! Content acquisition.
//!
//! Three independent ways to obtain raw text for the summarization pipeline:
//!
//! - [`Fetcher::fetch`]: HTTP GET with a browser-like header set
//! - [`AcquiredContent::from_text`]: text the caller already has (pasted)
//! - [`extract_document`]: page-by-page text extraction from a document
//!
//! Every path yields [`AcquiredContent`], which is capped at
//! [`MAX_CONTENT_CHARS`] characters before it can reach the model.

use std::io::{self, Read};
use std::time::Duration;

use crate::error::AcquisitionError;

/// Maximum number of characters handed to the model.
pub const MAX_CONTENT_CHARS: usize = 50_000;

/// Appended to content that was cut at [`MAX_CONTENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "... (content truncated)";

/// Bytes of a response body read by fetch-by-URL. Enough for
/// [`MAX_CONTENT_CHARS`] characters of any UTF-8 text plus one more.
const FETCH_BODY_LIMIT: u64 = (MAX_CONTENT_CHARS as u64 + 1) * 4;

/// Timeout for fetch-by-URL.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Headers sent with every fetch so the request looks like a desktop browser.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Referer", "https://www.google.com/"),
    ("DNT", "1"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Cache-Control", "max-age=0"),
];

/// Cut `text` to [`MAX_CONTENT_CHARS`] characters and append the marker.
///
/// Text at or under the bound is returned unchanged. Applying this twice
/// gives the same result as applying it once.
pub fn truncate_content(text: &str) -> String {
    match text.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
            truncated.push_str(&text[..cut]);
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text.to_string(),
    }
}

/// Raw text on its way to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredContent {
    text: String,
    origin: Option<String>,
    truncated: bool,
}

impl AcquiredContent {
    /// Wrap caller-supplied text, applying the length cap.
    pub fn from_text(text: impl AsRef<str>, origin: Option<String>) -> Self {
        let text = text.as_ref();
        let capped = truncate_content(text);
        let truncated = capped.len() != text.len();
        Self {
            text: capped,
            origin,
            truncated,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Label to attach as the summary's `source`, if any.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

/// Blocking HTTP fetcher for fetch-by-URL.
#[derive(Clone)]
pub struct Fetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher with the standard 15 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, timeout }
    }

    /// GET `url` and return the body unmodified apart from the length cap.
    ///
    /// Anything other than status 200 is an error carrying that status.
    /// Only a bounded prefix of the body is read.
    pub fn fetch(&self, url: &str) -> Result<AcquiredContent, AcquisitionError> {
        let mut request = self.agent.get(url);
        for (name, value) in BROWSER_HEADERS {
            request = request.header(*name, *value);
        }

        let mut response = request.call().map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status != 200 {
            tracing::warn!(url, status, "Fetch rejected");
            return Err(AcquisitionError::Status(status));
        }

        let mut bytes = Vec::new();
        response
            .body_mut()
            .as_reader()
            .take(FETCH_BODY_LIMIT)
            .read_to_end(&mut bytes)
            .map_err(|e| self.read_error(e))?;
        let body = String::from_utf8_lossy(&bytes);

        tracing::debug!(url, bytes = body.len(), "Fetched content");
        Ok(AcquiredContent::from_text(body, Some(url.to_string())))
    }

    fn transport_error(&self, error: ureq::Error) -> AcquisitionError {
        match error {
            ureq::Error::Timeout(_) => AcquisitionError::Timeout(self.timeout),
            ureq::Error::StatusCode(code) => AcquisitionError::Status(code),
            other => AcquisitionError::Transport(other.to_string()),
        }
    }

    fn read_error(&self, error: io::Error) -> AcquisitionError {
        match error.kind() {
            io::ErrorKind::TimedOut => AcquisitionError::Timeout(self.timeout),
            _ => AcquisitionError::Transport(error.to_string()),
        }
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A document whose text can be read page by page.
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    /// Text of page `index` (zero-based).
    fn page_text(&self, index: usize) -> Result<String, AcquisitionError>;
}

/// Concatenate every page's text in order, each followed by a newline.
///
/// A failure on any page aborts the whole extraction.
pub fn extract_document(
    document: &dyn PagedDocument,
    origin: Option<String>,
) -> Result<AcquiredContent, AcquisitionError> {
    let mut text = String::new();
    for index in 0..document.page_count() {
        text.push_str(&document.page_text(index)?);
        text.push('\n');
    }
    Ok(AcquiredContent::from_text(text, origin))
}

/// A PDF held in memory, with text already extracted per page.
pub struct PdfDocument {
    pages: Vec<String>,
}

impl PdfDocument {
    /// Parse `bytes` and extract the text of every page.
    ///
    /// pdf-extract panics on some malformed documents; callers on an async
    /// runtime run this on the blocking pool.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AcquisitionError> {
        let expected = lopdf::Document::load_mem(bytes)
            .map_err(|e| AcquisitionError::Document(e.to_string()))?
            .get_pages()
            .len();

        // Extraction stops at the first page it cannot read
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| AcquisitionError::Document(e.to_string()))?;
        if pages.len() != expected {
            return Err(AcquisitionError::Document(format!(
                "extracted {} of {} pages",
                pages.len(),
                expected
            )));
        }

        tracing::debug!(pages = pages.len(), "Extracted PDF text");
        Ok(Self { pages })
    }
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, AcquisitionError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| AcquisitionError::Document(format!("page {} out of range", index)))
    }
}


#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// A PDF with one page per entry of `pages`, each showing its text in
    /// Courier. `font_subtype: None` leaves the font dictionary incomplete.
    pub(crate) fn pdf(pages: &[&str], font_subtype: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font = dictionary! {
            "Type" => "Font",
            "BaseFont" => "Courier",
        };
        if let Some(subtype) = font_subtype {
            font.set("Subtype", Object::Name(subtype.as_bytes().to_vec()));
        }
        let font_id = doc.add_object(font);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
