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
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Winners::CriteriaId).string().not_null())
                    .col(ColumnDef::new(Winners::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Winners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_criteria_id")
                            .from(Winners::Table, Winners::CriteriaId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_user_id")
                            .from(Winners::Table, Winners::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Winner marks toggle; the pair is the whole state
        manager
            .create_index(
                Index::create()
                    .name("idx_winners_criteria_user")
                    .table(Winners::Table)
                    .col(Winners::CriteriaId)
                    .col(Winners::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Winners::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Winners {
    Table,
    Id,
    CriteriaId,
    UserId,
    CreatedAt,
}
