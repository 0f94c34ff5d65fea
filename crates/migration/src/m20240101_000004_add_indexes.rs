use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ValueRow: index on set_id for child lookup by parent
        manager
            .create_index(
                Index::create()
                    .name("idx_value_row_set")
                    .table(ValueRow::Table)
                    .col(ValueRow::SetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_value_row_set").table(ValueRow::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ValueRow { Table, SetId }
