use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "letters_of_credit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub lc_no: String,
    pub lc_date: Date,
    pub sup_code: String,
    pub bank_code: Option<String>,
    pub lc_amount: Decimal,
    pub currency: String,
    pub expiry_date: Option<Date>,
    pub latest_shipment_date: Option<Date>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    pub partial_shipment: bool,
    pub transhipment: bool,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::letter_of_credit_item::Entity")]
    Items,
}

impl Related<super::letter_of_credit_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
