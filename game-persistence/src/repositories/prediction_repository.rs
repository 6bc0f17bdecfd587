use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::{predictions, prelude::*};
use game_core::{prediction_id, validate_prediction};
use game_types::{GameError, Prediction};

/// Free-text guesses, one row per (user, criteria) pair. Submission is an
/// upsert: a second answer for the same pair replaces the first.
pub struct PredictionRepository {
    db: DatabaseConnection,
}

impl PredictionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_prediction(model: predictions::Model) -> Prediction {
        Prediction {
            id: model.id,
            user_id: model.user_id,
            criteria_id: model.criteria_id,
            answer: model.answer,
            timestamp: model.timestamp,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    /// All predictions ordered by last-submit time ascending.
    pub async fn list(&self) -> Result<Vec<Prediction>, GameError> {
        let models = Predictions::find()
            .order_by_asc(predictions::Column::Timestamp)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_prediction).collect())
    }

    /// Inserts or, on (user, criteria) conflict, replaces answer and
    /// timestamp. The answers_locked setting is not enforced here; the lock
    /// is a client-side gate.
    pub async fn upsert(
        &self,
        user_id: &str,
        criteria_id: &str,
        answer: &str,
    ) -> Result<Vec<Prediction>, GameError> {
        validate_prediction(user_id, criteria_id, answer)?;

        let row = predictions::ActiveModel {
            id: Set(prediction_id(user_id, criteria_id)),
            user_id: Set(user_id.to_string()),
            criteria_id: Set(criteria_id.to_string()),
            answer: Set(answer.to_string()),
            timestamp: Set(chrono::Utc::now().timestamp_millis()),
            created_at: Set(chrono::Utc::now().into()),
        };

        Predictions::insert(row)
            .on_conflict(
                OnConflict::columns([
                    predictions::Column::UserId,
                    predictions::Column::CriteriaId,
                ])
                .update_columns([
                    predictions::Column::Answer,
                    predictions::Column::Timestamp,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        self.list().await
    }
}
