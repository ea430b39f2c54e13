//! Orchestrator end to end over HTTP: retries, ceilings, and fallback with the
//! real provider clients pointed at a mock server.

use super::test_utils::{binding_at, gemini_reply, python_request, CountingBackoff};
use skillplan::conversation::ConversationContext;
use skillplan::generation::{FailureReason, FallbackRule, GenerationResult, Orchestrator, RetryPolicy};
use skillplan::prompt::PromptTemplate;
use skillplan::provider::{BindingRegistry, ModelBinding, ProviderFactory, ProviderType, StaticCredentials};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-pro:generateContent";

fn orchestrator(bindings: Vec<ModelBinding>, backoff: Arc<CountingBackoff>) -> Orchestrator {
    Orchestrator::new(
        Arc::new(BindingRegistry::new(bindings)),
        Arc::new(ProviderFactory),
        Arc::new(StaticCredentials::new().with("GOOGLE_API_KEY", "test-key")),
        PromptTemplate::builtin(),
        "gemini-pro",
    )
    .unwrap()
    .with_policy(RetryPolicy::new(3, Duration::from_millis(2000)))
    .with_backoff(backoff)
}

#[tokio::test]
async fn test_recovers_after_two_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("\n## Plan\n")))
        .mount(&server)
        .await;

    let backoff = Arc::new(CountingBackoff::default());
    let bindings = vec![binding_at("gemini-pro", ProviderType::Gemini, "gemini-pro", &server.uri())];
    let result = orchestrator(bindings, backoff.clone())
        .generate(&python_request("gemini-pro"))
        .await;

    assert_eq!(
        result,
        GenerationResult::Success {
            text: "## Plan".to_string(),
            attempts: 3,
            model_id: "gemini-pro".to_string(),
        }
    );
    assert_eq!(backoff.pauses(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_persistent_server_errors_hit_the_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let backoff = Arc::new(CountingBackoff::default());
    let bindings = vec![binding_at("gemini-pro", ProviderType::Gemini, "gemini-pro", &server.uri())];
    let result = orchestrator(bindings, backoff.clone())
        .generate(&python_request("gemini-pro"))
        .await;

    assert_eq!(result.failure_reason(), Some(FailureReason::Transient));
    assert_eq!(result.attempts(), 3);
    assert_eq!(backoff.delays(), vec![Duration::from_millis(2000); 2]);
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let backoff = Arc::new(CountingBackoff::default());
    let bindings = vec![binding_at("gemini-pro", ProviderType::Gemini, "gemini-pro", &server.uri())];
    let result = orchestrator(bindings, backoff.clone())
        .generate(&python_request("gemini-pro"))
        .await;

    match result {
        GenerationResult::Failure {
            reason,
            attempts,
            detail,
        } => {
            assert_eq!(reason, FailureReason::Fatal);
            assert_eq!(attempts, 1);
            assert!(detail.contains("API key not valid"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(backoff.pauses(), 0);
}

#[tokio::test]
async fn test_prompt_reaches_provider_with_substituted_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("ok")))
        .mount(&server)
        .await;

    let bindings = vec![binding_at("gemini-pro", ProviderType::Gemini, "gemini-pro", &server.uri())];
    orchestrator(bindings, Arc::new(CountingBackoff::default()))
        .generate(&python_request("gemini-pro"))
        .await;

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Python"));
    assert!(prompt.contains("Programming 💻"));
    assert!(!prompt.contains("{skill}"));
    assert!(!prompt.contains("{days_available}"));
}

#[tokio::test]
async fn test_invalid_primary_endpoint_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("flash answer")))
        .expect(1)
        .mount(&server)
        .await;

    let bindings = vec![
        ModelBinding::new("gemini-pro", ProviderType::Gemini, "gemini-pro"),
        binding_at("gemini-1.5-pro", ProviderType::Gemini, "gemini-1.5-pro", "not-a-url"),
        binding_at(
            "gemini-1.5-flash",
            ProviderType::Gemini,
            "gemini-1.5-flash",
            &server.uri(),
        ),
    ];
    let result = orchestrator(bindings, Arc::new(CountingBackoff::default()))
        .with_fallback(FallbackRule::new("gemini-1.5-pro", "gemini-1.5-flash"))
        .generate(&python_request("gemini-1.5-pro"))
        .await;

    match result {
        GenerationResult::Success { text, model_id, .. } => {
            assert_eq!(text, "flash answer");
            assert_eq!(model_id, "gemini-1.5-flash");
        }
        other => panic!("expected fallback success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_conversation_history_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("reply")))
        .mount(&server)
        .await;

    let bindings = vec![binding_at("gemini-pro", ProviderType::Gemini, "gemini-pro", &server.uri())];
    let orchestrator = orchestrator(bindings, Arc::new(CountingBackoff::default()));
    let mut context = ConversationContext::new(1).with_system_prompt("You are a study coach.");

    for message in ["first", "second", "third"] {
        let result = orchestrator
            .converse("gemini-pro", 0.5, &mut context, message)
            .await;
        assert!(result.is_success());
    }

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[2].body).unwrap();
    assert_eq!(last["systemInstruction"]["parts"][0]["text"], "You are a study coach.");
    // Window of one: only the previous exchange plus the new message.
    let contents = last["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["parts"][0]["text"], "second");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "third");
}
