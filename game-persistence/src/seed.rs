use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};
use tracing::info;

use crate::entities::{game_settings, prelude::*, users};
use game_types::ANSWERS_LOCKED_KEY;

/// The fixed roster inserted at first boot. Exactly one admin.
const ROSTER: &[(&str, &str, bool)] = &[
    ("pete", "Pete", true),
    ("penny", "Penny", false),
    ("hannah", "Hannah", false),
    ("charlotte", "Charlotte", false),
    ("jack", "Jack", false),
    ("jess", "Jess", false),
    ("bromley", "Bromley", false),
    ("lucy", "Lucy", false),
    ("eddie", "Eddie", false),
    ("ben", "Ben", false),
    ("sophie", "Sophie", false),
];

/// Inserts the predefined roster and default settings if absent. Idempotent;
/// safe to call on every boot.
pub async fn ensure_seed_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

    let mut seeded = 0;
    for (id, name, is_admin) in ROSTER {
        if Users::find_by_id(id.to_string()).one(db).await?.is_some() {
            continue;
        }
        let user = users::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            is_admin: Set(*is_admin),
            score: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Users::insert(user).exec(db).await?;
        seeded += 1;
    }

    let existing = GameSettings::find()
        .all(db)
        .await?
        .into_iter()
        .any(|s| s.setting_key == ANSWERS_LOCKED_KEY);
    if !existing {
        let setting = game_settings::ActiveModel {
            setting_key: Set(ANSWERS_LOCKED_KEY.to_string()),
            setting_value: Set("false".to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        GameSettings::insert(setting).exec(db).await?;
    }

    if seeded > 0 {
        info!("Seeded {} roster users", seeded);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        ensure_seed_data(&db).await.unwrap();
        ensure_seed_data(&db).await.unwrap();

        let users = Users::find().all(&db).await.unwrap();
        assert_eq!(users.len(), ROSTER.len());
        assert_eq!(users.iter().filter(|u| u.is_admin).count(), 1);

        let settings = GameSettings::find().all(&db).await.unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].setting_value, "false");
    }
}
