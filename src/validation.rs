use thiserror::Error;

use crate::models::EvaluationResult;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your {0} grade before calculating.")]
    MissingScore(&'static str),

    #[error("Please enter a subject name")]
    EmptySubject,

    #[error("Nothing to save yet: calculate a non-zero average first")]
    NothingToSave,
}

pub const SCORE_FIELDS: [&str; 4] = ["Prelim", "Midterm", "Pre-Finals", "Finals"];

/// Every score field has to be filled in, in form order.
pub fn require_scores(raw: [&str; 4]) -> Result<(), ValidationError> {
    for (value, name) in raw.iter().zip(SCORE_FIELDS) {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingScore(name));
        }
    }
    Ok(())
}

pub fn validate_subject(raw: &str) -> Result<String, ValidationError> {
    let subject = raw.trim();
    if subject.is_empty() {
        return Err(ValidationError::EmptySubject);
    }
    Ok(subject.to_string())
}

pub fn require_saveable(evaluation: &EvaluationResult) -> Result<(), ValidationError> {
    if evaluation.is_saveable() {
        Ok(())
    } else {
        Err(ValidationError::NothingToSave)
    }
}
