use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Note: no unique index on (set_id, name). Name uniqueness per set is an
        // application-level obligation, matched case-insensitively in memory.
        manager
            .create_table(
                Table::create()
                    .table(ValueRow::Table)
                    .if_not_exists()
                    .col(pk_auto(ValueRow::Id))
                    .col(integer(ValueRow::SetId).not_null())
                    .col(string_len(ValueRow::Name, 256).not_null())
                    .col(text(ValueRow::Value).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_value_row_set")
                            .from(ValueRow::Table, ValueRow::SetId)
                            .to(ValueSet::Table, ValueSet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ValueRow::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ValueRow {
    Table,
    Id,
    SetId,
    Name,
    Value,
}

#[derive(DeriveIden)]
enum ValueSet { Table, Id }
