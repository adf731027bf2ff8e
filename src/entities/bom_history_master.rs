use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Immutable copy of a BOM master, numbered per product by `sl_no`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "bom_history_masters")]
#[schema(as = BomHistoryMaster)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Live master the snapshot was taken from
    pub bom_id: i32,
    pub sl_no: i32,
    pub pcat_code: String,
    pub product_code: String,
    pub batch_size: Decimal,
    pub batch_unit: Option<String>,
    pub bom_ratio: Option<Decimal>,
    pub annex_ratio: Option<Decimal>,
    pub batch_qnty: Option<Decimal>,
    pub batch_qnty_unit: Option<String>,
    pub pack1: Option<String>,
    pub pack2: Option<String>,
    pub pack3: Option<String>,
    pub per_unit_wt: Option<Decimal>,
    pub per_unit_wt_unit: Option<String>,
    pub std_avg_wt: Option<Decimal>,
    pub bmr_no: Option<String>,
    pub version_no: String,
    pub eff_dt: Option<Date>,
    pub prod_ld_time: Option<i32>,
    pub prod_dosage_form: Option<String>,
    pub bom_code: Option<String>,
    pub label_ratio: Option<Decimal>,
    pub per_unit_solid_unit: Option<String>,
    pub dml_valid_upto: Option<Date>,
    pub granul_method: Option<String>,
    pub max_bt_per_day: Option<i32>,
    pub mon_sfty_stock: Option<Decimal>,
    pub bpr_version_no: Option<String>,
    pub bpr_eff_dt: Option<Date>,
    pub bcr_version_no: Option<String>,
    pub bcr_eff_dt: Option<Date>,
    pub opl_p_code: Option<String>,
    pub batch_per_large_unit: Option<Decimal>,
    pub batch_per_large_qnty: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub user_id: Option<String>,
    pub enter_dt: Option<DateTime>,
    pub initiator: Option<String>,
    pub aprv_by: Option<String>,
    pub aprv_dt: Option<DateTime>,
    pub edit_by: Option<String>,
    pub edit_dt: Option<DateTime>,
    pub auth_by: Option<String>,
    pub auth_dt: Option<DateTime>,
    pub hist_by: Option<String>,
    pub hist_dt: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bom_history_detail::Entity")]
    Details,
}

impl Related<super::bom_history_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
