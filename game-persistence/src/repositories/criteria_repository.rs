use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::{criteria, prelude::*, winners};
use game_core::validate_question;
use game_types::{Criteria as CriteriaRow, GameError};

/// Questions ("criteria") players predict against. Rows are immutable after
/// creation; the winner set on each returned row is looked up from the
/// winners table per question, which is fine at this cardinality.
pub struct CriteriaRepository {
    db: DatabaseConnection,
}

impl CriteriaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn winners_for(&self, criteria_id: &str) -> Result<Vec<String>, GameError> {
        let rows = Winners::find()
            .filter(winners::Column::CriteriaId.eq(criteria_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|w| w.user_id).collect())
    }

    async fn annotate(&self, model: criteria::Model) -> Result<CriteriaRow, GameError> {
        let winners = self.winners_for(&model.id).await?;
        Ok(CriteriaRow {
            id: model.id,
            question: model.question,
            description: model.description,
            created_at: model.created_at.to_rfc3339(),
            winners,
        })
    }

    /// All questions in creation order, each with its current winner set.
    pub async fn list(&self) -> Result<Vec<CriteriaRow>, GameError> {
        let models = Criteria::find()
            .order_by_asc(criteria::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            rows.push(self.annotate(model).await?);
        }
        Ok(rows)
    }

    /// Creates a question. The id is a random UUID rather than a creation
    /// timestamp; ordering comes from the stored created_at instead.
    pub async fn create(
        &self,
        question: &str,
        description: Option<&str>,
    ) -> Result<Vec<CriteriaRow>, GameError> {
        validate_question(question)?;

        let row = criteria::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            question: Set(question.to_string()),
            description: Set(description.map(|d| d.to_string())),
            created_at: Set(chrono::Utc::now().into()),
        };
        Criteria::insert(row).exec(&self.db).await?;

        self.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> CriteriaRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        CriteriaRepository::new(db)
    }

    #[tokio::test]
    async fn test_create_and_list_in_creation_order() {
        let repo = setup_test_db().await;

        repo.create("Who cries first?", None).await.unwrap();
        let rows = repo
            .create("First on the dance floor?", Some("Any guest counts"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].question, "Who cries first?");
        assert_eq!(rows[1].description.as_deref(), Some("Any guest counts"));
        assert!(rows.iter().all(|c| c.winners.is_empty()));
        // Collision-resistant ids
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let repo = setup_test_db().await;

        let err = repo.create("   ", None).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
        assert!(repo.list().await.unwrap().is_empty());
    }
}
