//! Plan generation: retry and fallback orchestration around the provider call.

pub mod backoff;
pub mod orchestrator;
pub mod policy;
pub mod result;

pub use backoff::{Backoff, TokioBackoff};
pub use orchestrator::Orchestrator;
pub use policy::{FallbackRule, RetryPolicy};
pub use result::{FailureReason, GenerationResult};
