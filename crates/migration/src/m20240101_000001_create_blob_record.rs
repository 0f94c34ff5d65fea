use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlobRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(BlobRecord::Id))
                    .col(timestamp_with_time_zone(BlobRecord::CreatedAt).not_null())
                    // Whole key/value map serialized by the codec; opaque to the schema
                    .col(text(BlobRecord::Values).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BlobRecord::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BlobRecord {
    Table,
    Id,
    CreatedAt,
    Values,
}
