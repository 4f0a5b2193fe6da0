//! Full user actions driven through the `Assistant` facade.

use std::sync::{Arc, Mutex};

use scribe::llm::ChatResponse;
use scribe::tools::{ToolInfo, Toolbox};
use scribe::{AgentConfig, Assistant, ErrorKind, Fetcher, ScriptedModel, Session, SummaryKind};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TELEGRAPH: &str = r#"{
    "topic": "History of the Telegraph",
    "summary": "The electrical telegraph carried coded signals over wires.",
    "sources": ["https://en.wikipedia.org/wiki/Electrical_telegraph"],
    "tools_used": ["wikipedia"]
}"#;

fn encyclopedia(queries: Arc<Mutex<Vec<String>>>) -> Toolbox {
    let mut toolbox = Toolbox::new();
    toolbox.register(
        ToolInfo::new("wikipedia", "Look up a topic on Wikipedia").arg(
            "query",
            "string",
            "The topic to look up",
        ),
        move |args| {
            let query = args["query"].as_str().unwrap_or_default().to_string();
            queries.lock().unwrap().push(query);
            Ok("Page: Electrical telegraph\nSummary: Signals over wires.".to_string())
        },
    );
    toolbox
}

#[tokio::test]
async fn research_writes_report_named_after_topic() {
    let dir = tempfile::tempdir().unwrap();
    let queries = Arc::new(Mutex::new(Vec::new()));
    let model = Arc::new(ScriptedModel::new(vec![
        ChatResponse::tool_call("call_1", "wikipedia", json!({"query": "telegraph"})),
        ChatResponse::text(format!("```json\n{}\n```", TELEGRAPH)),
    ]));
    let assistant = Assistant::new(
        model.clone(),
        AgentConfig::new("test"),
        encyclopedia(queries.clone()),
    )
    .output_dir(dir.path());

    let mut session = Session::new();
    let result = assistant
        .research(&mut session, "history of the telegraph")
        .await
        .unwrap();

    assert_eq!(result.topic, "History of the Telegraph");
    assert_eq!(result.tools_used, vec!["wikipedia"]);
    assert_eq!(*queries.lock().unwrap(), vec!["telegraph".to_string()]);
    assert_eq!(model.request_count(), 2);

    let saved = dir.path().join("History_of_the_Teleg.txt");
    assert_eq!(session.last_saved_file.as_deref(), Some(saved.as_path()));
    assert_eq!(session.research, Some(Ok(result)));

    let report = std::fs::read_to_string(saved).unwrap();
    assert!(report.starts_with("Research Topic: History of the Telegraph\n"));
    assert!(report.contains("\nSummary:\nThe electrical telegraph"));
    assert!(report.contains("\nSources:\n- https://en.wikipedia.org/wiki/Electrical_telegraph\n"));
    assert!(report.contains("\nTools Used:\n- wikipedia\n"));
}

#[tokio::test]
async fn research_failure_clears_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::new(vec![
        ChatResponse::text(TELEGRAPH),
        ChatResponse::text("I could not find anything."),
    ]));
    let assistant =
        Assistant::new(model, AgentConfig::new("test"), Toolbox::new()).output_dir(dir.path());

    let mut session = Session::new();
    assistant
        .research(&mut session, "history of the telegraph")
        .await
        .unwrap();
    assert!(session.last_saved_file.is_some());

    let failure = assistant
        .research(&mut session, "history of the semaphore")
        .await
        .unwrap_err();

    assert_eq!(failure.kind, ErrorKind::Parse);
    assert!(failure.message.starts_with("Error processing research"));
    assert!(matches!(session.research, Some(Err(_))));
    assert!(session.last_saved_file.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn forbidden_url_reports_status_without_model_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let model = Arc::new(ScriptedModel::new(vec![]));
    let assistant = Assistant::new(model.clone(), AgentConfig::new("test"), Toolbox::new())
        .fetcher(Fetcher::new());

    let mut session = Session::new();
    let url = format!("{}/private", server.uri());
    let failure = assistant.summarize_url(&mut session, &url).await.unwrap_err();

    assert_eq!(failure.kind, ErrorKind::Acquisition);
    assert!(failure.message.contains("403"));
    assert_eq!(model.request_count(), 0);
    assert!(matches!(session.link_summary, Some(Err(_))));
}

#[tokio::test]
async fn fetched_page_summary_can_be_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Morse code</p>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::with_text(
        r#"{"title": "Morse code", "summary": "Dots and dashes.", "key_points": ["Samuel Morse"], "source": "unknown"}"#,
    ));
    let assistant =
        Assistant::new(model.clone(), AgentConfig::new("test"), Toolbox::new()).output_dir(dir.path());

    let mut session = Session::new();
    let url = format!("{}/article", server.uri());
    let summary = assistant.summarize_url(&mut session, &url).await.unwrap();
    assert_eq!(summary.source, url);

    let requests = model.requests();
    assert!(requests[0].messages[1].content.contains("<p>Morse code</p>"));
    assert!(requests[0].tools.is_empty());

    let saved = assistant.save_summary(&summary, SummaryKind::Content).unwrap();
    assert_eq!(saved, dir.path().join("content_summary_Morse_code.txt"));
    let report = std::fs::read_to_string(saved).unwrap();
    assert!(report.ends_with(&format!("Source: {}", url)));
}
