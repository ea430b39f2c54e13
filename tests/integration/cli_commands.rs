//! CLI smoke tests: run the `skillplan` binary with an isolated environment.

use super::test_utils::gemini_reply;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREDENTIAL_VARS: [&str; 3] = ["GOOGLE_API_KEY", "OPENAI_API_KEY", "ANTHROPIC_API_KEY"];

fn skillplan(temp_dir: &TempDir) -> Command {
    let config_home = temp_dir.path().join("config");
    let home = temp_dir.path().join("home");
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&config_home).unwrap();
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&workspace).unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_skillplan"));
    command
        .env("XDG_CONFIG_HOME", config_home)
        .env("XDG_STATE_HOME", temp_dir.path().join("state"))
        .env("HOME", home)
        .env_remove("SKILLPLAN_ENV")
        .env_remove("SKILLPLAN_LOG")
        .env_remove("SKILLPLAN_LOG_OUTPUT")
        .arg("--workspace")
        .arg(workspace)
        .arg("--quiet");
    for var in CREDENTIAL_VARS {
        command.env_remove(var);
    }
    command
}

/// Config file binding `local-gemini` to the mock server with a 1 ms pause.
fn mock_config(temp_dir: &TempDir, server_uri: &str) -> PathBuf {
    let path = temp_dir.path().join("skillplan.toml");
    fs::write(
        &path,
        format!(
            r#"
default_model = "local-gemini"

[generation]
max_attempts = 3
backoff_ms = 1

[generation.fallback]
enabled = false

[models.local-gemini]
provider_type = "gemini"
model = "gemini-pro"
endpoint = "{}"
"#,
            server_uri
        ),
    )
    .unwrap();
    path
}

async fn run_blocking(mut command: Command) -> Output {
    tokio::task::spawn_blocking(move || command.output())
        .await
        .unwrap()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn generate_args(config: &Path) -> Vec<String> {
    vec![
        "--config".to_string(),
        config.display().to_string(),
        "generate".to_string(),
        "--skill".to_string(),
        "Python".to_string(),
        "--category".to_string(),
        "programming".to_string(),
    ]
}

#[test]
fn test_categories_lists_every_category() {
    let temp_dir = TempDir::new().unwrap();
    let output = skillplan(&temp_dir).arg("categories").output().unwrap();

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 8);
    assert!(text.contains("Cooking 🍳"));
}

#[test]
fn test_models_reports_credential_status() {
    let temp_dir = TempDir::new().unwrap();
    let output = skillplan(&temp_dir)
        .env("GOOGLE_API_KEY", "test-key")
        .args(["models", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let models = value["models"].as_array().unwrap();
    let gemini = models.iter().find(|m| m["model_id"] == "gemini-pro").unwrap();
    assert_eq!(gemini["credential"], "present");
    let claude = models.iter().find(|m| m["model_id"] == "claude-3-5-sonnet").unwrap();
    assert_eq!(claude["credential"], "missing");
    assert_eq!(claude["credential_env"], "ANTHROPIC_API_KEY");
}

#[test]
fn test_generate_without_credential_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let output = skillplan(&temp_dir)
        .args(["generate", "--skill", "Python", "--category", "Programming"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).starts_with("error[auth_missing]:"),
        "stderr={}",
        stderr(&output)
    );
    assert!(stderr(&output).contains("GOOGLE_API_KEY"));
}

#[test]
fn test_generate_rejects_out_of_range_days() {
    let temp_dir = TempDir::new().unwrap();
    let output = skillplan(&temp_dir)
        .env("GOOGLE_API_KEY", "test-key")
        .args([
            "generate",
            "--skill",
            "Python",
            "--category",
            "Programming",
            "--days",
            "366",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error[invalid_request]:"));
}

#[tokio::test]
async fn test_generate_one_section_per_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(body_string_contains("Spanish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Plan en español")))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Plan in English")))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = mock_config(&temp_dir, &server.uri());
    let mut command = skillplan(&temp_dir);
    command
        .env("GOOGLE_API_KEY", "test-key")
        .args(generate_args(&config))
        .args(["--language", "English", "--language", "Spanish"]);
    let output = run_blocking(command).await;

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let text = stdout(&output);
    let english = text.find("## Plan in English").unwrap();
    let spanish = text.find("## Plan in Spanish").unwrap();
    assert!(english < spanish);
    assert!(text.contains("Plan in English\n"));
    assert!(text.contains("Plan en español"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_generate_reports_exhausted_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = mock_config(&temp_dir, &server.uri());
    let mut command = skillplan(&temp_dir);
    command
        .env("GOOGLE_API_KEY", "test-key")
        .args(generate_args(&config))
        .args(["--format", "json"]);
    let output = run_blocking(command).await;

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["failed"], 1);
    let result = &value["plans"][0]["result"];
    assert_eq!(value["plans"][0]["language"], "English");
    assert_eq!(result["status"], "failure");
    assert_eq!(result["reason"], "transient");
    assert_eq!(result["attempts"], 3);
}

#[tokio::test]
async fn test_generate_falls_back_when_primary_endpoint_is_broken() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Flash plan")))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("skillplan.toml");
    fs::write(
        &config,
        format!(
            r#"
[models."gemini-1.5-pro"]
provider_type = "gemini"
model = "gemini-1.5-pro"
endpoint = "not-a-url"

[models."gemini-1.5-flash"]
provider_type = "gemini"
model = "gemini-1.5-flash"
endpoint = "{}"
"#,
            server.uri()
        ),
    )
    .unwrap();

    let mut command = skillplan(&temp_dir);
    command
        .env("GOOGLE_API_KEY", "test-key")
        .args(generate_args(&config))
        .args(["--model", "gemini-1.5-pro", "--format", "json"]);
    let output = run_blocking(command).await;

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let result = &value["plans"][0]["result"];
    assert_eq!(result["status"], "success");
    assert_eq!(result["model_id"], "gemini-1.5-flash");
    assert_eq!(result["text"], "Flash plan");
}

#[tokio::test]
async fn test_chat_reads_turns_from_stdin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Start with the basics.")))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = mock_config(&temp_dir, &server.uri());
    let mut command = skillplan(&temp_dir);
    command
        .env("GOOGLE_API_KEY", "test-key")
        .arg("--config")
        .arg(&config)
        .arg("chat")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = tokio::task::spawn_blocking(move || {
        let mut child = command.spawn().unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(b"How do I learn Rust?\n/reset\nAnd Python?\n/exit\n")
            .unwrap();
        child.wait_with_output().unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(text.matches("Start with the basics.").count(), 2);
    assert!(text.contains("(history cleared)"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
