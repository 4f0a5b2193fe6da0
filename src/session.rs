//! Per-session state held by the presentation layer.

use std::path::PathBuf;

use crate::error::Outcome;
use crate::schema::{ContentSummary, ResearchResult};

/// Last results of each mode. Replaced wholesale by each new run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub research: Option<Outcome<ResearchResult>>,
    /// Report written for the last successful research run
    pub last_saved_file: Option<PathBuf>,
    pub link_summary: Option<Outcome<ContentSummary>>,
    pub document_summary: Option<Outcome<ContentSummary>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every stored result.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
