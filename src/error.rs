//! Error types for Scribe.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while acquiring, summarizing or researching.
#[derive(Error, Debug)]
pub enum Error {
    /// Content could not be obtained
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Model output did not match the expected schema
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Network, quota or auth failure calling the model
    #[error("LLM error: {0}")]
    Model(String),

    /// A tool failed or does not exist
    #[error("Tool error: {0}")]
    Tool(String),

    /// Maximum iterations reached
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),

    /// The caller supplied nothing to work on
    #[error("{0}")]
    EmptyInput(&'static str),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error while writing reports or notes
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Scribe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Ways content acquisition can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// The server answered with something other than 200
    #[error("Unable to fetch content (Status code: {0})")]
    Status(u16),

    /// The request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, TLS, connection or body read failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Text extraction from a document failed
    #[error("Document extraction failed: {0}")]
    Document(String),
}

/// Raw model text that does not conform to a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse {schema} from model output: {reason}. Got: {excerpt}")]
pub struct ParseError {
    /// Name of the schema the text was parsed against
    pub schema: &'static str,
    /// What was wrong with the text
    pub reason: String,
    /// Leading part of the offending text
    pub excerpt: String,
}

impl ParseError {
    /// Maximum number of characters of raw text kept in the excerpt.
    pub const EXCERPT_CHARS: usize = 200;

    pub fn new(schema: &'static str, reason: impl Into<String>, raw_text: &str) -> Self {
        let mut excerpt: String = raw_text.chars().take(Self::EXCERPT_CHARS).collect();
        if raw_text.chars().count() > Self::EXCERPT_CHARS {
            excerpt.push_str("...");
        }
        Self {
            schema,
            reason: reason.into(),
            excerpt,
        }
    }
}

/// Coarse classification of an [`Error`], used at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Acquisition,
    Parse,
    Model,
    Tool,
    Input,
    Config,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Acquisition(_) => ErrorKind::Acquisition,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Model(_) | Error::MaxIterations(_) => ErrorKind::Model,
            Error::Tool(_) => ErrorKind::Tool,
            Error::EmptyInput(_) => ErrorKind::Input,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

/// A user-facing failure: the error class plus displayable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Convert an error into a failure, prefixing the message with `context`.
    ///
    /// Input errors are shown as-is; they are already phrased for the user.
    pub fn from_error(context: &str, error: &Error) -> Self {
        let message = match error {
            Error::EmptyInput(warning) => warning.to_string(),
            other => format!("{}: {}", context, other),
        };
        Self::new(error.kind(), message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}

/// Tagged result returned across the pipeline boundary.
pub type Outcome<T> = std::result::Result<T, Failure>;
