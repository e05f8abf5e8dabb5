//! 收费项目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_structure_id: i64,
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub is_optional: bool,
    pub due_day: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_structures::Entity",
        from = "Column::FeeStructureId",
        to = "super::fee_structures::Column::Id",
        on_delete = "Cascade"
    )]
    FeeStructure,
}

impl Related<super::fee_structures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_item(self) -> crate::models::fees::entities::FeeItem {
        use crate::models::fees::entities::FeeItem;
        use chrono::{DateTime, Utc};

        FeeItem {
            id: self.id,
            fee_structure_id: self.fee_structure_id,
            name: self.name,
            amount: self.amount,
            frequency: self.frequency,
            is_optional: self.is_optional,
            due_day: self.due_day,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
