use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionError,
    TransactionTrait,
};

use crate::entities::{prelude::*, users, winners};
use crate::repositories::UserRepository;
use game_core::validate_winner_toggle;
use game_types::{GameError, User};

/// Winner marks. A mark either exists for a (criteria, user) pair or it
/// does not; toggling flips the pair and adjusts the user's stored score by
/// one in the same direction.
pub struct WinnerRepository {
    db: DatabaseConnection,
}

impl WinnerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Flips the winner mark for the pair and applies the matching score
    /// delta. The whole read-toggle-adjust sequence runs in one transaction
    /// so concurrent toggles cannot leave the score out of step with the
    /// mark's existence.
    pub async fn toggle(&self, criteria_id: &str, user_id: &str) -> Result<Vec<User>, GameError> {
        validate_winner_toggle(criteria_id, user_id)?;

        let criteria_id = criteria_id.to_string();
        let user_id = user_id.to_string();

        self.db
            .transaction::<_, (), GameError>(move |txn| {
                Box::pin(async move {
                    let user = Users::find_by_id(user_id.as_str())
                        .one(txn)
                        .await?
                        .ok_or_else(|| GameError::NotFound(format!("user '{}'", user_id)))?;

                    let existing = Winners::find()
                        .filter(winners::Column::CriteriaId.eq(criteria_id.as_str()))
                        .filter(winners::Column::UserId.eq(user_id.as_str()))
                        .one(txn)
                        .await?;

                    let delta = match existing {
                        Some(mark) => {
                            Winners::delete_by_id(mark.id).exec(txn).await?;
                            -1
                        }
                        None => {
                            let mark = winners::ActiveModel {
                                criteria_id: Set(criteria_id.clone()),
                                user_id: Set(user_id.clone()),
                                created_at: Set(chrono::Utc::now().into()),
                                ..Default::default()
                            };
                            Winners::insert(mark).exec(txn).await?;
                            1
                        }
                    };

                    let updated = users::ActiveModel {
                        id: sea_orm::ActiveValue::Unchanged(user.id.clone()),
                        score: Set(user.score + delta),
                        updated_at: Set(chrono::Utc::now().into()),
                        ..Default::default()
                    };
                    Users::update(updated).exec(txn).await?;

                    Ok(())
                })
            })
            .await
            .map_err(|err| match err {
                TransactionError::Connection(db_err) => db_err.into(),
                TransactionError::Transaction(game_err) => game_err,
            })?;

        UserRepository::new(self.db.clone()).list().await
    }
}
