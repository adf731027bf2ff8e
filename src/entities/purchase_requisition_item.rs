use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_requisition_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub req_id: i32,
    pub item_no: i32,
    pub raw_code: String,
    pub quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub estimated_rate: Option<Decimal>,
    pub estimated_amount: Option<Decimal>,
    pub required_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub specification: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_requisition::Entity",
        from = "Column::ReqId",
        to = "super::purchase_requisition::Column::Id",
        on_delete = "Cascade"
    )]
    Requisition,
}

impl Related<super::purchase_requisition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requisition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
