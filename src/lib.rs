//! Scribe - research assistant
//!
//! Scribe answers research queries with a tool-calling agent (web search,
//! Wikipedia, save-to-file) and produces structured summaries of web pages,
//! pasted text and PDF documents. Model output is parsed against typed
//! schemas; anything that does not conform is an error, never a guess.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use scribe::{AgentConfig, Assistant, ModelConfig, OpenAiClient, Session};
//! use scribe::tools::{standard_toolbox, ToolSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), std::env::VarError> {
//!     let model = Arc::new(OpenAiClient::new(ModelConfig::new(std::env::var("GOOGLE_API_KEY")?)));
//!     let tools = standard_toolbox(&ToolSettings::default());
//!     let assistant = Assistant::new(model, AgentConfig::default(), tools);
//!
//!     let mut session = Session::new();
//!     match assistant.research(&mut session, "history of the telegraph").await {
//!         Ok(result) => println!("{}", scribe::report::render_research(&result)),
//!         Err(failure) => eprintln!("{}", failure),
//!     }
//!     Ok(())
//! }
//! ```

pub mod acquire;
mod agent;
mod assistant;
mod error;
pub mod llm;
mod parser;
pub mod prompt;
pub mod report;
mod schema;
mod session;
mod summarize;
pub mod tools;

pub use acquire::{AcquiredContent, Fetcher, PagedDocument, PdfDocument};
pub use agent::{
    AgentCallbacks, AgentConfig, AgentEvent, DEFAULT_MODEL, EventCallback, ResearchAgent,
    verbose_callbacks,
};
pub use assistant::{Assistant, MANUAL_INPUT_LABEL};
pub use error::{AcquisitionError, Error, ErrorKind, Failure, Outcome, ParseError, Result};
pub use llm::{ChatModel, ModelConfig, OpenAiClient, ScriptedModel};
pub use parser::OutputParser;
pub use report::SummaryKind;
pub use schema::{ContentSummary, ResearchResult, Schema};
pub use session::Session;
pub use summarize::Summarizer;
