//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;
use crate::generation::FailureReason;

/// Map domain/service errors to a tagged line for stderr.
///
/// A missing credential shares its tag with [`FailureReason::AuthMissing`] so
/// scripts can match one string whichever layer noticed it.
pub fn map_error(e: &ApiError) -> String {
    let tag = match e {
        ApiError::ProviderNotConfigured(_) => FailureReason::AuthMissing.tag(),
        ApiError::InvalidRequest(_) => "invalid_request",
        ApiError::UnknownModel(_)
        | ApiError::ProviderError(_)
        | ApiError::ConfigError(_)
        | ApiError::IoError(_) => FailureReason::Fatal.tag(),
    };
    format!("error[{}]: {}", tag, e)
}
