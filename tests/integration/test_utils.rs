//! Shared test utilities for integration tests
//!
//! Environment isolation for config lookups, plus request and binding helpers
//! for tests that talk to a local mock server.

use async_trait::async_trait;
use skillplan::generation::Backoff;
use skillplan::prompt::{PlanFields, PlanRequest};
use skillplan::provider::{ModelBinding, ProviderType};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Global mutex to serialize HOME / XDG_CONFIG_HOME access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        match self.home {
            Some(orig) => std::env::set_var("HOME", orig),
            None => std::env::remove_var("HOME"),
        }
        match self.xdg_config_home {
            Some(orig) => std::env::set_var("XDG_CONFIG_HOME", orig),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

/// Run `f` with XDG_CONFIG_HOME pointed at `test_dir` and HOME at `test_dir/home`.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct CountingBackoff {
    delays: Mutex<Vec<Duration>>,
}

impl CountingBackoff {
    pub fn pauses(&self) -> usize {
        self.delays.lock().unwrap().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backoff for CountingBackoff {
    async fn pause(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

pub fn binding_at(model_id: &str, provider_type: ProviderType, model: &str, endpoint: &str) -> ModelBinding {
    let mut binding = ModelBinding::new(model_id, provider_type, model);
    binding.endpoint = Some(endpoint.to_string());
    binding
}

pub fn python_request(model_id: &str) -> PlanRequest {
    PlanRequest::new(PlanFields {
        skill: "Python".to_string(),
        category: "Programming".to_string(),
        days: 10,
        daily_hours: 2,
        language: "English".to_string(),
        temperature: 0.7,
        model_id: model_id.to_string(),
    })
    .unwrap()
}

/// Minimal successful Gemini response body.
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 120,
            "candidatesTokenCount": 40,
            "totalTokenCount": 160
        }
    })
}
