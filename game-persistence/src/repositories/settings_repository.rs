use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use crate::entities::{game_settings, prelude::*};
use game_types::{GameError, GameSetting};

/// Key/value game settings. One key matters today (`answers_locked`) but
/// the table is generic.
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads a setting. An unset key yields a `None` value, not an error.
    pub async fn get(&self, key: &str) -> Result<GameSetting, GameError> {
        if key.is_empty() {
            return Err(GameError::invalid("key parameter is required"));
        }

        let row = GameSettings::find()
            .filter(game_settings::Column::SettingKey.eq(key))
            .one(&self.db)
            .await?;

        Ok(GameSetting {
            key: key.to_string(),
            value: row.map(|r| r.setting_value),
        })
    }

    /// Upserts a setting. The value's content is not validated.
    pub async fn set(&self, key: &str, value: &str) -> Result<GameSetting, GameError> {
        if key.is_empty() {
            return Err(GameError::invalid("key and value are required"));
        }

        let existing = GameSettings::find()
            .filter(game_settings::Column::SettingKey.eq(key))
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let updated = game_settings::ActiveModel {
                    id: sea_orm::ActiveValue::Unchanged(row.id),
                    setting_value: Set(value.to_string()),
                    updated_at: Set(chrono::Utc::now().into()),
                    ..Default::default()
                };
                GameSettings::update(updated).exec(&self.db).await?;
            }
            None => {
                let row = game_settings::ActiveModel {
                    setting_key: Set(key.to_string()),
                    setting_value: Set(value.to_string()),
                    updated_at: Set(chrono::Utc::now().into()),
                    ..Default::default()
                };
                GameSettings::insert(row).exec(&self.db).await?;
            }
        }

        Ok(GameSetting {
            key: key.to_string(),
            value: Some(value.to_string()),
        })
    }
}
