use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub plan_no: String,
    pub plan_date: Date,
    pub product_code: String,
    pub planned_quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub planned_start_date: Option<Date>,
    pub planned_end_date: Option<Date>,
    pub priority: String,
    pub status: String,
    pub batch_size: Option<Decimal>,
    pub number_of_batches: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
