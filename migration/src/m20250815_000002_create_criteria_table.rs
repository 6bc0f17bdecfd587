use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Criteria::Question).text().not_null())
                    .col(ColumnDef::new(Criteria::Description).text())
                    .col(
                        ColumnDef::new(Criteria::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Questions are listed in creation order
        manager
            .create_index(
                Index::create()
                    .name("idx_criteria_created_at")
                    .table(Criteria::Table)
                    .col(Criteria::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Criteria {
    Table,
    Id,
    Question,
    Description,
    CreatedAt,
}
