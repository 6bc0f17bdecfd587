use sea_orm::{
    ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder,
};

use crate::entities::{prelude::*, users};
use game_core::validate_new_user;
use game_types::{GameError, User};

/// Game state service operations over the users table. The leaderboard
/// ordering and the admin-protection rule both live here, not in the
/// transport layer.
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            name: model.name,
            is_admin: model.is_admin,
            score: model.score,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }

    /// All users in leaderboard order: score descending, name ascending on
    /// ties.
    pub async fn list(&self) -> Result<Vec<User>, GameError> {
        let models = Users::find()
            .order_by_desc(users::Column::Score)
            .order_by_asc(users::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_user).collect())
    }

    /// Creates a user with score 0. Duplicate ids are a conflict; the
    /// existing row is left untouched.
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<Vec<User>, GameError> {
        validate_new_user(id, name)?;

        if Users::find_by_id(id).one(&self.db).await?.is_some() {
            return Err(GameError::Conflict(format!("user '{}'", id)));
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            is_admin: Set(is_admin),
            score: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Users::insert(user).exec(&self.db).await?;

        self.list().await
    }

    /// Deletes a non-admin user. The schema cascades the deletion into the
    /// user's predictions and winner marks.
    pub async fn delete(&self, user_id: &str) -> Result<Vec<User>, GameError> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| GameError::NotFound(format!("user '{}'", user_id)))?;

        if user.is_admin {
            return Err(GameError::Forbidden(
                "Cannot delete admin user".to_string(),
            ));
        }

        Users::delete_by_id(user_id).exec(&self.db).await?;

        self.list().await
    }

    /// Unconditional score overwrite. Primitive behind winner toggling;
    /// also reachable through PUT /users.
    pub async fn update_score(&self, user_id: &str, new_score: i32) -> Result<Vec<User>, GameError> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| GameError::NotFound(format!("user '{}'", user_id)))?;

        let updated = users::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user.id),
            score: Set(new_score),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        Users::update(updated).exec(&self.db).await?;

        self.list().await
    }
}
