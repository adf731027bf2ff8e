use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "bom_history_details")]
#[schema(as = BomHistoryDetail)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub hist_master_id: i32,
    pub sl_no: i32,
    pub pcat_code: String,
    pub product_code: String,
    pub raw_code: String,
    pub raw_type: Option<String>,
    pub declared_qnty: Option<Decimal>,
    pub declared_unit: Option<String>,
    pub ratio_type: Option<String>,
    pub ratio_ra: Option<Decimal>,
    pub unit_unit: Option<String>,
    pub unit_qnty: Option<Decimal>,
    pub qty_per_batch: Decimal,
    pub overage: Option<Decimal>,
    pub qty_per_batch_issue: Option<Decimal>,
    pub batch_size: Option<Decimal>,
    pub batch_unit: Option<String>,
    pub annex_cont: Option<Decimal>,
    pub dec_volm_per_unit: Option<Decimal>,
    pub each_unit_qnty: Option<Decimal>,
    pub qty_per_batch_unit: Option<String>,
    pub qty_per_batch_cont: Option<Decimal>,
    pub qty_per_batch_unit_cont: Option<String>,
    pub filler_flag: Option<String>,
    pub annex: Option<String>,
    pub not_apper_flag: Option<String>,
    pub batch_size_qnty: Option<Decimal>,
    pub batch_size_qnty_unit: Option<String>,
    pub qs_to_make: Option<String>,
    pub each_unit_ratio: Option<Decimal>,
    pub raw_group: Option<String>,
    pub raw_cat: Option<String>,
    pub potency_ratio: Option<Decimal>,
    pub da_gen_code: Option<String>,
    pub each_unit_qnty_annex: Option<Decimal>,
    pub each_unit_qnty_unit_annex: Option<String>,
    pub seq: Option<i32>,
    pub stat: Option<String>,
    pub prod_qty: Option<Decimal>,
    pub prod_qty_unit: Option<String>,
    pub version_no: Option<String>,
    pub raw_qnty: Option<Decimal>,
    pub raw_unit: Option<String>,
    pub raw_mole_wt: Option<Decimal>,
    pub gen_mole_wt: Option<Decimal>,
    pub raw_by_gen: Option<Decimal>,
    pub ref_book: Option<String>,
    pub ref_book_ver: Option<String>,
    pub ref_book_page: Option<String>,
    pub is_annex_raw: Option<String>,
    pub opl_p_code: Option<String>,
    pub opl_raw_code: Option<String>,
    pub raw_version_no: Option<String>,
    pub user_id: Option<String>,
    pub enter_dt: Option<DateTime>,
    pub hist_by: Option<String>,
    pub hist_dt: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bom_history_master::Entity",
        from = "Column::HistMasterId",
        to = "super::bom_history_master::Column::Id",
        on_delete = "Cascade"
    )]
    Master,
}

impl Related<super::bom_history_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Master.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
