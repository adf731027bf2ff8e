use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "letter_of_credit_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lc_id: i32,
    pub raw_code: String,
    pub quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub tolerance_percentage: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::letter_of_credit::Entity",
        from = "Column::LcId",
        to = "super::letter_of_credit::Column::Id",
        on_delete = "Cascade"
    )]
    LetterOfCredit,
}

impl Related<super::letter_of_credit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LetterOfCredit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
