use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "raw_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub raw_code: String,
    pub raw_name: String,
    pub raw_desc: Option<String>,
    pub raw_type: Option<String>,
    pub raw_grade: Option<String>,
    pub form_type: Option<String>,
    pub spec_group: Option<String>,
    pub unit_of_measure: Option<String>,
    pub shelf_life_months: Option<i32>,
    pub storage_condition: Option<String>,
    pub cas_number: Option<String>,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<Decimal>,
    pub hs_code: Option<String>,
    /// C = current, I = inactive, N = new
    pub raw_stat: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
