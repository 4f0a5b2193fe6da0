//! The facade the presentation layer drives.
//!
//! Each method runs one user-triggered action to completion, stores its
//! outcome in the caller's [`Session`] and returns it. None of them return
//! an [`Error`](crate::Error); failures arrive as [`Failure`] values.

use std::path::PathBuf;
use std::sync::Arc;

use crate::acquire::Fetcher;
use crate::agent::{AgentConfig, ResearchAgent};
use crate::error::{Error, Failure, Outcome, Result};
use crate::llm::ChatModel;
use crate::report::{self, SummaryKind};
use crate::schema::{ContentSummary, ResearchResult};
use crate::session::Session;
use crate::summarize::Summarizer;
use crate::tools::Toolbox;

/// Label used as `source` for pasted text without a URL.
pub const MANUAL_INPUT_LABEL: &str = "Manual input";

pub struct Assistant<M> {
    model: Arc<M>,
    config: AgentConfig,
    tools: Toolbox,
    fetcher: Fetcher,
    output_dir: PathBuf,
    verbose: bool,
}

impl<M: ChatModel> Assistant<M> {
    pub fn new(model: Arc<M>, config: AgentConfig, tools: Toolbox) -> Self {
        Self {
            model,
            config,
            tools,
            fetcher: Fetcher::new(),
            output_dir: PathBuf::from("."),
            verbose: false,
        }
    }

    /// Directory that research reports and saved summaries go to.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Trace agent execution through `tracing`.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    fn summarizer(&self) -> Summarizer<M> {
        Summarizer::new(self.model.clone(), self.config.clone())
    }

    /// Research `query`, write the report file and store both in `session`.
    pub async fn research(&self, session: &mut Session, query: &str) -> Outcome<ResearchResult> {
        let outcome = self.run_research(query).await;

        let stored = match outcome {
            Ok((result, path)) => {
                session.last_saved_file = Some(path);
                Ok(result)
            }
            Err(e) => {
                session.last_saved_file = None;
                let failure = Failure::from_error("Error processing research", &e);
                tracing::warn!(kind = ?failure.kind, error = %failure.message, "Research failed");
                Err(failure)
            }
        };

        session.research = Some(stored.clone());
        stored
    }

    async fn run_research(&self, query: &str) -> Result<(ResearchResult, PathBuf)> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyInput("Please enter a research topic."));
        }

        tracing::info!(query, "Starting research");
        let mut agent = ResearchAgent::new(self.model.clone(), self.tools.clone(), self.config.clone())
            .verbose(self.verbose);
        let result = agent.run(query).await?;
        let path = report::write_research(&self.output_dir, &result)?;
        Ok((result, path))
    }

    /// Fetch and summarize `url`.
    pub async fn summarize_url(&self, session: &mut Session, url: &str) -> Outcome<ContentSummary> {
        let outcome = self.summarizer().summarize_url(&self.fetcher, url).await;
        session.link_summary = Some(outcome.clone());
        outcome
    }

    /// Summarize pasted text; `url`, when given, becomes the source.
    pub async fn summarize_pasted(
        &self,
        session: &mut Session,
        text: &str,
        url: Option<&str>,
    ) -> Outcome<ContentSummary> {
        let label = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(MANUAL_INPUT_LABEL);
        let outcome = self.summarizer().summarize_text(text, Some(label)).await;
        session.link_summary = Some(outcome.clone());
        outcome
    }

    /// Summarize an uploaded PDF; the file name becomes the source.
    pub async fn summarize_pdf(
        &self,
        session: &mut Session,
        bytes: &[u8],
        file_name: &str,
    ) -> Outcome<ContentSummary> {
        let outcome = self.summarizer().summarize_pdf(bytes, Some(file_name)).await;
        session.document_summary = Some(outcome.clone());
        outcome
    }

    /// Write a summary report into the output directory (the download action).
    pub fn save_summary(&self, summary: &ContentSummary, kind: SummaryKind) -> Outcome<PathBuf> {
        report::write_summary(&self.output_dir, summary, kind)
            .map_err(|e| Failure::from_error("Error saving summary", &e))
    }
}
