use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One key/value pair of a `value_set`, stored as its own row.
/// `name` has no unique index; per-set uniqueness is application-enforced.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "value_row")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub set_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::value_set::Entity",
        from = "Column::SetId",
        to = "super::value_set::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ValueSet,
}

impl Related<super::value_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ValueSet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
