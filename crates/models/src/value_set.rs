use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parent of the inverted-table layout: one row per logical key/value set,
/// with the pairs themselves living in `value_row`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "value_set")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::value_row::Entity")]
    ValueRow,
}

impl Related<super::value_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ValueRow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
