use game_types::{GameError, ANSWERS_LOCKED_KEY};

/// Composes the deterministic prediction id for a (user, criteria) pair.
/// The pair also carries a unique constraint in the store, so the id is
/// stable across resubmissions.
pub fn prediction_id(user_id: &str, criteria_id: &str) -> String {
    format!("{}-{}", user_id, criteria_id)
}

pub fn validate_question(question: &str) -> Result<(), GameError> {
    if question.trim().is_empty() {
        return Err(GameError::invalid("question is required"));
    }
    Ok(())
}

pub fn validate_new_user(id: &str, name: &str) -> Result<(), GameError> {
    if id.trim().is_empty() || name.trim().is_empty() {
        return Err(GameError::invalid("id and name are required"));
    }
    Ok(())
}

pub fn validate_prediction(
    user_id: &str,
    criteria_id: &str,
    answer: &str,
) -> Result<(), GameError> {
    if user_id.is_empty() || criteria_id.is_empty() || answer.is_empty() {
        return Err(GameError::invalid(
            "userId, criteriaId, and answer are required",
        ));
    }
    Ok(())
}

pub fn validate_winner_toggle(criteria_id: &str, user_id: &str) -> Result<(), GameError> {
    if criteria_id.is_empty() || user_id.is_empty() {
        return Err(GameError::invalid("criteriaId and userId are required"));
    }
    Ok(())
}

/// Interprets the stored `answers_locked` value. Anything other than the
/// literal "true" (including a missing row) means unlocked.
pub fn answers_locked(value: Option<&str>) -> bool {
    value == Some("true")
}

pub fn answers_locked_key() -> &'static str {
    ANSWERS_LOCKED_KEY
}
