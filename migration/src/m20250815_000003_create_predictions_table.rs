use sea_orm_migration::prelude::*;

use crate::m20250815_000001_create_users_table::Users;
use crate::m20250815_000002_create_criteria_table::Criteria;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Predictions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Predictions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Predictions::UserId).string().not_null())
                    .col(ColumnDef::new(Predictions::CriteriaId).string().not_null())
                    .col(ColumnDef::new(Predictions::Answer).text().not_null())
                    .col(
                        ColumnDef::new(Predictions::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Predictions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_predictions_user_id")
                            .from(Predictions::Table, Predictions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_predictions_criteria_id")
                            .from(Predictions::Table, Predictions::CriteriaId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One prediction per (user, criteria) pair; resubmission upserts
        manager
            .create_index(
                Index::create()
                    .name("idx_predictions_user_criteria")
                    .table(Predictions::Table)
                    .col(Predictions::UserId)
                    .col(Predictions::CriteriaId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Predictions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Predictions {
    Table,
    Id,
    UserId,
    CriteriaId,
    Answer,
    Timestamp,
    CreatedAt,
}
