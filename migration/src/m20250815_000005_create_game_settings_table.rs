use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GameSettings::SettingKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(GameSettings::SettingValue).text().not_null())
                    .col(
                        ColumnDef::new(GameSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GameSettings {
    Table,
    Id,
    SettingKey,
    SettingValue,
    UpdatedAt,
}
