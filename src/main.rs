//! Command-line front end.
//!
//! ```bash
//! scribe research "history of the telegraph"
//! scribe url https://example.com/article --save
//! cat notes.txt | scribe text --url https://example.com/notes
//! scribe pdf paper.pdf --save
//! ```
//!
//! Every option can also be set through the environment; a `.env` file in
//! the working directory is loaded first.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use scribe::llm::{API_KEY_ENV, DEFAULT_BASE_URL};
use scribe::tools::{SaveConfig, SearchConfig, ToolSettings, standard_toolbox};
use scribe::{
    AgentConfig, Assistant, ContentSummary, DEFAULT_MODEL, Error, ModelConfig, OpenAiClient,
    Outcome, Result, Session, SummaryKind, report,
};

/// Research assistant: agent-driven research and structured summaries.
#[derive(Debug, Parser)]
#[command(name = "scribe")]
#[command(version)]
struct Cli {
    #[clap(flatten)]
    model: ModelArgs,

    /// Directory for research reports and saved summaries.
    #[arg(long, env = "SCRIBE_OUTPUT_DIR", default_value = ".", global = true)]
    output_dir: PathBuf,

    /// Trace agent iterations, model turns and tool calls.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Model endpoint and agent limits.
#[derive(Debug, Args)]
struct ModelArgs {
    /// API key of the chat-completion endpoint.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint.
    #[arg(long, env = "SCRIBE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Model name.
    #[arg(long, env = "SCRIBE_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Sampling temperature.
    #[arg(long, default_value_t = 0.7, global = true)]
    temperature: f32,

    /// Upper bound on model turns in one research run.
    #[arg(long, env = "SCRIBE_MAX_ITERATIONS", default_value_t = 10, global = true)]
    max_iterations: usize,

    /// Token limit of each model response.
    #[arg(long, env = "SCRIBE_MAX_TOKENS", default_value_t = 4096, global = true)]
    max_tokens: u32,

    /// Seconds to wait for one model response.
    #[arg(long, env = "SCRIBE_MODEL_TIMEOUT", default_value_t = 120, global = true)]
    model_timeout: u64,

    /// API key of the web search tool.
    #[arg(long, env = "EXA_API_KEY", hide_env_values = true, global = true)]
    exa_api_key: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Research a topic with the tool-calling agent and write a report.
    Research {
        /// The research query.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Fetch a web page and summarize it.
    ///
    /// The summary's source is set to the URL, replacing whatever source
    /// the model reported.
    Url {
        url: String,
        /// Also write the summary report to the output directory.
        #[arg(long)]
        save: bool,
    },
    /// Summarize pasted text read from a file or standard input.
    Text {
        /// Where the text came from; used as the summary source.
        #[arg(long)]
        url: Option<String>,
        /// Read the text from this file instead of standard input.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        save: bool,
    },
    /// Extract the text of a PDF document and summarize it.
    Pdf {
        path: PathBuf,
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %error, "scribe terminated with error");
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,scribe=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let assistant = build_assistant(&cli)?;
    let mut session = Session::new();

    let code = match cli.command {
        Command::Research { query } => {
            let query = query.join(" ");
            let outcome = assistant.research(&mut session, &query).await;
            match outcome {
                Ok(result) => {
                    println!("{}", report::render_research(&result));
                    if let Some(path) = &session.last_saved_file {
                        println!("Research saved to {}", path.display());
                    }
                    ExitCode::SUCCESS
                }
                Err(failure) => report_failure(&failure),
            }
        }
        Command::Url { url, save } => {
            let outcome = assistant.summarize_url(&mut session, &url).await;
            finish_summary(&assistant, outcome, SummaryKind::Content, save)
        }
        Command::Text { url, file, save } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let outcome = assistant
                .summarize_pasted(&mut session, &text, url.as_deref())
                .await;
            finish_summary(&assistant, outcome, SummaryKind::Content, save)
        }
        Command::Pdf { path, save } => {
            let bytes = std::fs::read(&path)?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let outcome = assistant.summarize_pdf(&mut session, &bytes, &file_name).await;
            finish_summary(&assistant, outcome, SummaryKind::Pdf, save)
        }
    };

    Ok(code)
}

fn build_assistant(cli: &Cli) -> Result<Assistant<OpenAiClient>> {
    let args = &cli.model;
    let api_key = args
        .api_key
        .clone()
        .ok_or_else(|| Error::Config(format!("{} environment variable not set", API_KEY_ENV)))?;

    let model = OpenAiClient::new(model_config(args, api_key));
    let config = agent_config(args);

    let settings = ToolSettings {
        search: SearchConfig {
            api_key: args.exa_api_key.clone(),
            ..SearchConfig::default()
        },
        save: SaveConfig {
            path: cli.output_dir.join("research_output.txt"),
        },
        ..ToolSettings::default()
    };

    tracing::debug!(model = %args.model, base_url = %args.base_url, "Configured model");

    Ok(Assistant::new(Arc::new(model), config, standard_toolbox(&settings))
        .output_dir(&cli.output_dir)
        .verbose(cli.verbose))
}

fn model_config(args: &ModelArgs, api_key: String) -> ModelConfig {
    ModelConfig::new(api_key)
        .with_base_url(&args.base_url)
        .with_timeout(Duration::from_secs(args.model_timeout))
}

fn agent_config(args: &ModelArgs) -> AgentConfig {
    AgentConfig::new(&args.model)
        .temperature(args.temperature)
        .max_iterations(args.max_iterations)
        .max_tokens(args.max_tokens)
}

fn finish_summary(
    assistant: &Assistant<OpenAiClient>,
    outcome: Outcome<ContentSummary>,
    kind: SummaryKind,
    save: bool,
) -> ExitCode {
    let summary = match outcome {
        Ok(summary) => summary,
        Err(failure) => return report_failure(&failure),
    };

    println!("{}", report::render_summary(&summary));
    if !save {
        return ExitCode::SUCCESS;
    }

    match assistant.save_summary(&summary, kind) {
        Ok(path) => {
            println!("\nSummary saved to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(failure) => report_failure(&failure),
    }
}

fn report_failure(failure: &scribe::Failure) -> ExitCode {
    eprintln!("{}", failure.message);
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_url_help_mentions_source_override() {
        let command = Cli::command();
        let url = command.find_subcommand("url").unwrap();
        let help = url.get_long_about().unwrap().to_string();
        assert!(help.contains("source is set to the URL"), "{}", help);
    }

    #[test]
    fn test_model_limits_reach_configs() {
        let cli = Cli::try_parse_from([
            "scribe",
            "--max-tokens",
            "512",
            "--model-timeout",
            "30",
            "--base-url",
            "http://localhost:8080/v1/",
            "url",
            "https://example.com",
        ])
        .unwrap();

        let agent = agent_config(&cli.model);
        assert_eq!(agent.max_tokens, Some(512));

        let model = model_config(&cli.model, "key".to_string());
        assert_eq!(model.timeout, Duration::from_secs(30));
        assert_eq!(model.base_url, "http://localhost:8080/v1");
    }
}
