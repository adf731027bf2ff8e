use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub product_code: String,
    pub product_name: String,
    pub product_desc: Option<String>,
    pub pcat_code: String,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub pack_size: Option<String>,
    pub pack_size1: Option<String>,
    pub pack_size2: Option<String>,
    pub ptype_desc: Option<String>,
    pub generic_name: Option<String>,
    pub therapeutic_class: Option<String>,
    pub drug_category: Option<String>,
    pub shelf_life_months: Option<i32>,
    pub storage_condition: Option<String>,
    pub pack_type: Option<String>,
    pub mrp: Option<Decimal>,
    pub trade_price: Option<Decimal>,
    /// C = current, I = inactive, N = new
    pub prod_stat: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_category::Entity",
        from = "Column::PcatCode",
        to = "super::product_category::Column::PcatCode"
    )]
    Category,
    #[sea_orm(has_many = "super::bom::Entity")]
    Boms,
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::bom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
