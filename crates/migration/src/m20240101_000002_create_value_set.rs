use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ValueSet::Table)
                    .if_not_exists()
                    .col(pk_auto(ValueSet::Id))
                    .col(timestamp_with_time_zone(ValueSet::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ValueSet::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ValueSet {
    Table,
    Id,
    CreatedAt,
}
