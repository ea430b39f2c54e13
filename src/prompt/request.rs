use super::category::Category;
use crate::error::ApiError;
use serde::Serialize;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 365;
pub const MIN_DAILY_HOURS: u32 = 1;
pub const MAX_DAILY_HOURS: u32 = 24;

/// Raw, unvalidated form fields for one submission.
#[derive(Debug, Clone)]
pub struct PlanFields {
    pub skill: String,
    pub category: String,
    pub days: u32,
    pub daily_hours: u32,
    pub language: String,
    pub temperature: f32,
    pub model_id: String,
}

/// A validated plan submission.
///
/// Fields are private: once constructed a request cannot change. Derive a new
/// request with [`PlanRequest::for_language`] instead of mutating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRequest {
    skill: String,
    category: Category,
    days: u32,
    daily_hours: u32,
    language: String,
    temperature: f32,
    model_id: String,
}

impl PlanRequest {
    pub fn new(fields: PlanFields) -> Result<Self, ApiError> {
        let skill = fields.skill.trim();
        if skill.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Please enter a skill to master".to_string(),
            ));
        }

        let category = Category::parse(&fields.category)?;

        if !(MIN_DAYS..=MAX_DAYS).contains(&fields.days) {
            return Err(ApiError::InvalidRequest(format!(
                "Days available must be between {} and {} (got {})",
                MIN_DAYS, MAX_DAYS, fields.days
            )));
        }

        if !(MIN_DAILY_HOURS..=MAX_DAILY_HOURS).contains(&fields.daily_hours) {
            return Err(ApiError::InvalidRequest(format!(
                "Daily time commitment must be between {} and {} hours (got {})",
                MIN_DAILY_HOURS, MAX_DAILY_HOURS, fields.daily_hours
            )));
        }

        let language = fields.language.trim();
        if language.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Output language cannot be empty".to_string(),
            ));
        }

        if !fields.temperature.is_finite() || !(0.0..=1.0).contains(&fields.temperature) {
            return Err(ApiError::InvalidRequest(format!(
                "Temperature must be between 0.0 and 1.0 (got {})",
                fields.temperature
            )));
        }

        let model_id = fields.model_id.trim();
        if model_id.is_empty() {
            return Err(ApiError::InvalidRequest("Model id cannot be empty".to_string()));
        }

        Ok(Self {
            skill: skill.to_string(),
            category,
            days: fields.days,
            daily_hours: fields.daily_hours,
            language: language.to_string(),
            temperature: fields.temperature,
            model_id: model_id.to_string(),
        })
    }

    /// Same submission, different output language.
    pub fn for_language(&self, language: &str) -> Result<Self, ApiError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Output language cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            language: language.to_string(),
            ..self.clone()
        })
    }

    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn daily_hours(&self) -> u32 {
        self.daily_hours
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}
