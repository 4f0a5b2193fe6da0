//! Summarization pipeline.
//!
//! Acquired text is capped, embedded in the summary prompt, sent to the
//! model once, and parsed into a [`ContentSummary`]. The `summarize_*`
//! entry points never return [`Error`]: every failure is turned into a
//! [`Failure`] carrying displayable text.

use std::sync::Arc;

use crate::acquire::{self, AcquiredContent, Fetcher, PagedDocument};
use crate::agent::AgentConfig;
use crate::error::{AcquisitionError, Error, ErrorKind, Failure, Outcome, Result};
use crate::llm::{ChatModel, ChatRequest, Message};
use crate::parser::OutputParser;
use crate::prompt::{summary_human_prompt, summary_system_prompt};
use crate::schema::ContentSummary;

/// Single-shot summarizer over a chat model.
pub struct Summarizer<M> {
    model: Arc<M>,
    config: AgentConfig,
    parser: OutputParser<ContentSummary>,
}

impl<M: ChatModel> Summarizer<M> {
    pub fn new(model: Arc<M>, config: AgentConfig) -> Self {
        Self {
            model,
            config,
            parser: OutputParser::new(),
        }
    }

    /// Summarize acquired content.
    ///
    /// The length cap is applied again here regardless of how the content
    /// was acquired. If the content carries an origin label, it replaces
    /// the `source` the model produced.
    pub async fn summarize(&self, content: &AcquiredContent) -> Result<ContentSummary> {
        let text = acquire::truncate_content(content.as_str());

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message::system(summary_system_prompt::<ContentSummary>()),
                Message::user(summary_human_prompt(&text)),
            ],
            tools: Vec::new(),
            options: self.config.options(),
        };

        tracing::debug!(
            chars = text.chars().count(),
            truncated = content.was_truncated(),
            "Requesting summary"
        );
        let response = self.model.complete(request).await?;
        let summary = self.parser.parse(&response.text)?;

        Ok(match content.origin() {
            Some(origin) => summary.with_source(origin),
            None => summary,
        })
    }

    /// Fetch `url` and summarize the page; `source` becomes the URL.
    pub async fn summarize_url(&self, fetcher: &Fetcher, url: &str) -> Outcome<ContentSummary> {
        let result = async {
            let url = url.trim();
            if url.is_empty() {
                return Err(Error::EmptyInput("Please enter a URL."));
            }

            let fetcher = fetcher.clone();
            let target = url.to_string();
            let content = tokio::task::spawn_blocking(move || fetcher.fetch(&target))
                .await
                .map_err(|e| AcquisitionError::Transport(e.to_string()))??;
            self.summarize(&content).await
        }
        .await;

        result.map_err(|e| match e {
            // Rejections by the site are expected; keep the message short.
            Error::Acquisition(AcquisitionError::Status(code)) => {
                let failure = Failure::new(
                    ErrorKind::Acquisition,
                    format!("Error: Unable to fetch content (Status code: {})", code),
                );
                tracing::warn!(url, status = code, "URL summary failed");
                failure
            }
            other => fail("Error processing URL", other),
        })
    }

    /// Summarize text the caller already has, e.g. pasted after a failed fetch.
    pub async fn summarize_text(&self, text: &str, origin: Option<&str>) -> Outcome<ContentSummary> {
        let result = async {
            if text.trim().is_empty() {
                return Err(Error::EmptyInput("Please paste some content to summarize."));
            }
            let content = AcquiredContent::from_text(text, origin.map(String::from));
            self.summarize(&content).await
        }
        .await;

        result.map_err(|e| fail("Error processing text", e))
    }

    /// Extract a paged document and summarize it.
    pub async fn summarize_document(
        &self,
        document: &dyn PagedDocument,
        origin: Option<&str>,
    ) -> Outcome<ContentSummary> {
        let result = async {
            let content = acquire::extract_document(document, origin.map(String::from))?;
            self.summarize(&content).await
        }
        .await;

        result.map_err(|e| fail("Error processing PDF", e))
    }

    /// Parse PDF bytes and summarize them.
    ///
    /// Extraction runs on the blocking pool; a panic inside the PDF library
    /// is reported as a document error.
    pub async fn summarize_pdf(&self, bytes: &[u8], origin: Option<&str>) -> Outcome<ContentSummary> {
        let owned = bytes.to_vec();
        let document = tokio::task::spawn_blocking(move || acquire::PdfDocument::from_bytes(&owned))
            .await
            .unwrap_or_else(|e| {
                Err(AcquisitionError::Document(format!("PDF extraction aborted: {}", e)))
            });

        match document {
            Ok(document) => self.summarize_document(&document, origin).await,
            Err(e) => Err(fail("Error processing PDF", e.into())),
        }
    }
}

fn fail(context: &str, error: Error) -> Failure {
    let failure = Failure::from_error(context, &error);
    tracing::warn!(kind = ?failure.kind, error = %failure.message, "Summary failed");
    failure
}
