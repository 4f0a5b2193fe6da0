//! Plain-text reports and their file names.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::schema::{ContentSummary, ResearchResult};

/// Number of characters of a topic or title used in file names.
pub const FILE_STEM_CHARS: usize = 20;

/// Where a content summary came from; decides the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// Fetched or pasted web content
    Content,
    /// Uploaded document
    Pdf,
}

impl SummaryKind {
    fn prefix(self) -> &'static str {
        match self {
            SummaryKind::Content => "content_summary_",
            SummaryKind::Pdf => "pdf_summary_",
        }
    }
}

/// First [`FILE_STEM_CHARS`] characters of `text` with spaces and path
/// separators replaced by underscores.
pub fn file_stem(text: &str) -> String {
    let stem: String = text
        .chars()
        .take(FILE_STEM_CHARS)
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();

    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}

pub fn research_file_name(result: &ResearchResult) -> String {
    format!("{}.txt", file_stem(&result.topic))
}

pub fn summary_file_name(summary: &ContentSummary, kind: SummaryKind) -> String {
    format!("{}{}.txt", kind.prefix(), file_stem(&summary.title))
}

pub fn render_research(result: &ResearchResult) -> String {
    let mut out = format!(
        "Research Topic: {}\n\nSummary:\n{}\n\nSources:\n",
        result.topic, result.summary
    );
    for source in &result.sources {
        out.push_str(&format!("- {}\n", source));
    }
    out.push_str("\nTools Used:\n");
    for tool in &result.tools_used {
        out.push_str(&format!("- {}\n", tool));
    }
    out
}

pub fn render_summary(summary: &ContentSummary) -> String {
    let mut out = format!(
        "Title: {}\n\nSummary:\n{}\n\nKey Points:\n",
        summary.title, summary.summary
    );
    for point in &summary.key_points {
        out.push_str(&format!("- {}\n", point));
    }
    out.push_str(&format!("\nSource: {}", summary.source));
    out
}

/// Write the research report into `dir`, overwriting any previous file.
pub fn write_research(dir: &Path, result: &ResearchResult) -> Result<PathBuf> {
    write(dir, &research_file_name(result), &render_research(result))
}

/// Write a content summary report into `dir`.
pub fn write_summary(dir: &Path, summary: &ContentSummary, kind: SummaryKind) -> Result<PathBuf> {
    write(dir, &summary_file_name(summary, kind), &render_summary(summary))
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Wrote report");
    Ok(path)
}
