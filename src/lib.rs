//! skillplan: personalized learning plans from hosted language models.
//!
//! A validated [`prompt::PlanRequest`] is rendered into the plan prompt and sent
//! through the [`generation::Orchestrator`], which resolves the model binding,
//! retries upstream server errors with a constant pause, optionally substitutes
//! a fallback model, and always answers with a [`generation::GenerationResult`].

pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod logging;
pub mod prompt;
pub mod provider;
