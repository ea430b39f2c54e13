use serde::Serialize;
use std::fmt;

/// Why a submission ended without text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The model's credential is not set; nothing was sent.
    AuthMissing,
    /// Every attempt hit an upstream server error.
    Transient,
    /// Configuration problem or a non-retryable provider error.
    Fatal,
}

impl FailureReason {
    pub fn tag(&self) -> &'static str {
        match self {
            FailureReason::AuthMissing => "auth_missing",
            FailureReason::Transient => "transient",
            FailureReason::Fatal => "fatal",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Outcome of one submission. Produced exactly once per `generate`/`converse` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success {
        text: String,
        attempts: u32,
        /// The binding that answered; differs from the request when the fallback was used.
        model_id: String,
    },
    Failure {
        reason: FailureReason,
        attempts: u32,
        detail: String,
    },
}

impl GenerationResult {
    pub fn failure(reason: FailureReason, attempts: u32, detail: impl Into<String>) -> Self {
        GenerationResult::Failure {
            reason,
            attempts,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            GenerationResult::Success { attempts, .. } | GenerationResult::Failure { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { text, .. } => Some(text.as_str()),
            GenerationResult::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            GenerationResult::Success { .. } => None,
            GenerationResult::Failure { reason, .. } => Some(*reason),
        }
    }
}
