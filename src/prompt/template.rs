use super::request::PlanRequest;
use crate::error::ApiError;
use std::path::Path;

/// Placeholder names a plan template may reference.
pub const PLACEHOLDERS: [&str; 5] = ["skill", "category", "days_available", "daily_time", "language"];

const BUILTIN_TEMPLATE: &str = include_str!("plan_template.md");

enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal text and `{name}` placeholders.
///
/// A brace pair counts as a placeholder only when its content is a non-empty
/// run of lowercase ASCII letters, digits, and underscores. Anything else
/// (JSON snippets, stray braces) stays literal.
fn segments(source: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(after.len());

        if name_len > 0 && after[name_len..].starts_with('}') {
            if open > 0 {
                out.push(Segment::Text(&rest[..open]));
            }
            out.push(Segment::Placeholder(&after[..name_len]));
            rest = &after[name_len + 1..];
        } else {
            out.push(Segment::Text(&rest[..=open]));
            rest = after;
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

/// Prompt template with `{skill}`, `{category}`, `{days_available}`,
/// `{daily_time}` and `{language}` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    /// The plan template shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            source: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Accept a template, rejecting placeholders that [`render`](Self::render) cannot fill.
    pub fn parse(source: impl Into<String>) -> Result<Self, ApiError> {
        let source = source.into();
        let unknown: Vec<&str> = segments(&source)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) if !PLACEHOLDERS.contains(&name) => Some(name),
                _ => None,
            })
            .collect();

        if !unknown.is_empty() {
            return Err(ApiError::ConfigError(format!(
                "Prompt template uses unknown placeholder(s): {}. Allowed: {}",
                unknown.join(", "),
                PLACEHOLDERS.join(", ")
            )));
        }

        Ok(Self { source })
    }

    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read prompt template {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder occurrences in template order.
    pub fn placeholders(&self) -> Vec<&str> {
        segments(&self.source)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Substitute every placeholder in a single pass.
    ///
    /// Substituted values are never rescanned, so a skill containing `{language}`
    /// is emitted verbatim.
    pub fn render(&self, request: &PlanRequest) -> String {
        let days = request.days().to_string();
        let hours = request.daily_hours().to_string();
        let mut rendered = String::with_capacity(self.source.len() + 64);

        for segment in segments(&self.source) {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Placeholder("skill") => rendered.push_str(request.skill()),
                Segment::Placeholder("category") => rendered.push_str(request.category().label()),
                Segment::Placeholder("days_available") => rendered.push_str(&days),
                Segment::Placeholder("daily_time") => rendered.push_str(&hours),
                Segment::Placeholder("language") => rendered.push_str(request.language()),
                Segment::Placeholder(other) => {
                    // parse() rejects these; keep the token so the mistake is visible.
                    rendered.push('{');
                    rendered.push_str(other);
                    rendered.push('}');
                }
            }
        }

        rendered
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}
