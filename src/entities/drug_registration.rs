use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drug_registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub drug_letter_ref_no: String,
    pub drug_letter_date: Option<Date>,
    pub product_code: String,
    /// New, Renewal or Amendment
    pub registration_type: Option<String>,
    pub application_date: Option<Date>,
    pub approval_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub registration_number: Option<String>,
    pub status: String,
    pub regulatory_authority: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
