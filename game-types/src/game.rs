use serde::{Deserialize, Serialize};

use crate::UserId;

pub type CriteriaId = String;

/// A question players predict against. Immutable once created; the winner
/// set is derived from the winners table rather than stored on the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub id: CriteriaId,
    pub question: String,
    pub description: Option<String>,
    pub created_at: String, // ISO 8601 string
    pub winners: Vec<UserId>,
}

/// One user's answer to one question. Exactly one row per (user, criteria)
/// pair; resubmitting replaces `answer` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub user_id: UserId,
    pub criteria_id: CriteriaId,
    pub answer: String,
    pub timestamp: i64, // epoch milliseconds of last submit
    pub created_at: String,
}

/// Key/value game setting. `value` is `None` when the key has never been
/// set, mirroring the store's absent-row case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSetting {
    pub key: String,
    pub value: Option<String>,
}

/// Setting key gating prediction submission in the client UI.
pub const ANSWERS_LOCKED_KEY: &str = "answers_locked";
