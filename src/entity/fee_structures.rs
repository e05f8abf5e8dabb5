//! 收费方案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// JSON 数组
    pub applicable_grades: Option<String>,
    pub academic_year: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_items::Entity")]
    Items,
}

impl Related<super::fee_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_structure(
        self,
        items: Vec<super::fee_items::Model>,
    ) -> crate::models::fees::entities::FeeStructure {
        use crate::models::fees::entities::FeeStructure;
        use chrono::{DateTime, Utc};

        FeeStructure {
            id: self.id,
            name: self.name,
            description: self.description,
            applicable_grades: self
                .applicable_grades
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            academic_year: self.academic_year,
            is_active: self.is_active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            items: items.into_iter().map(|i| i.into_fee_item()).collect(),
        }
    }
}
