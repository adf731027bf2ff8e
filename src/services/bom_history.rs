//! Append-only snapshots of a BOM master and its active lines.

use chrono::Utc;
use metrics::counter;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{bom, bom_detail, bom_history_detail, bom_history_master, bom_history_sequence},
    errors::ServiceError,
};

/// One history snapshot with its copied lines
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistorySnapshot {
    #[serde(flatten)]
    pub master: bom_history_master::Model,
    pub details: Vec<bom_history_detail::Model>,
}

/// Reserves the next history serial for `product_code`.
///
/// The counter row is bumped with a single `UPDATE ... SET last_serial = last_serial + 1`
/// so two snapshots of the same product cannot receive the same number. A missing
/// counter is seeded from the number of snapshots already stored for the product.
pub async fn next_serial<C: ConnectionTrait>(
    conn: &C,
    product_code: &str,
) -> Result<i32, ServiceError> {
    let bumped = bom_history_sequence::Entity::update_many()
        .col_expr(
            bom_history_sequence::Column::LastSerial,
            Expr::col(bom_history_sequence::Column::LastSerial).add(1),
        )
        .filter(bom_history_sequence::Column::ProductCode.eq(product_code))
        .exec(conn)
        .await
        .map_err(ServiceError::db_error)?;

    if bumped.rows_affected == 0 {
        let existing = bom_history_master::Entity::find()
            .filter(bom_history_master::Column::ProductCode.eq(product_code))
            .count(conn)
            .await
            .map_err(ServiceError::db_error)?;
        let serial = i32::try_from(existing + 1)
            .map_err(|_| ServiceError::InternalError("history serial overflow".to_string()))?;

        bom_history_sequence::ActiveModel {
            product_code: Set(product_code.to_string()),
            last_serial: Set(serial),
        }
        .insert(conn)
        .await
        .map_err(ServiceError::db_error)?;

        return Ok(serial);
    }

    bom_history_sequence::Entity::find_by_id(product_code.to_string())
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .map(|row| row.last_serial)
        .ok_or_else(|| ServiceError::InternalError("history counter vanished".to_string()))
}

/// Copies `master` and its active lines into the history tables.
/// Runs on the caller's connection so it can share a transaction.
pub async fn snapshot<C: ConnectionTrait>(
    conn: &C,
    master: &bom::Model,
    actor: &str,
) -> Result<bom_history_master::Model, ServiceError> {
    let serial = next_serial(conn, &master.product_code).await?;
    let now = Utc::now().naive_utc();

    let mut row = bom_history_master::ActiveModel {
        bom_id: Set(master.id),
        sl_no: Set(serial),
        hist_by: Set(Some(actor.to_string())),
        hist_dt: Set(now),
        ..Default::default()
    };
    copy_fields!(row <- master;
        pcat_code, product_code, batch_size, batch_unit, bom_ratio, annex_ratio,
        batch_qnty, batch_qnty_unit, pack1, pack2, pack3, per_unit_wt, per_unit_wt_unit,
        std_avg_wt, bmr_no, version_no, eff_dt, prod_ld_time, prod_dosage_form, bom_code,
        label_ratio, per_unit_solid_unit, dml_valid_upto, granul_method, max_bt_per_day,
        mon_sfty_stock, bpr_version_no, bpr_eff_dt, bcr_version_no, bcr_eff_dt, opl_p_code,
        batch_per_large_unit, batch_per_large_qnty, note, user_id, enter_dt, initiator,
        aprv_by, aprv_dt, edit_by, edit_dt, auth_by, auth_dt,
    );
    let history = row.insert(conn).await.map_err(ServiceError::db_error)?;

    let lines = bom_detail::Entity::find()
        .filter(bom_detail::Column::BomId.eq(master.id))
        .filter(bom_detail::Column::IsActive.eq(true))
        .order_by_asc(bom_detail::Column::Id)
        .all(conn)
        .await
        .map_err(ServiceError::db_error)?;

    for line in &lines {
        let mut copy = bom_history_detail::ActiveModel {
            hist_master_id: Set(history.id),
            sl_no: Set(serial),
            hist_by: Set(Some(actor.to_string())),
            hist_dt: Set(now),
            ..Default::default()
        };
        copy_fields!(copy <- line;
            pcat_code, product_code, raw_code, raw_type, declared_qnty, declared_unit,
            ratio_type, ratio_ra, unit_unit, unit_qnty, qty_per_batch, overage,
            qty_per_batch_issue, batch_size, batch_unit, annex_cont, dec_volm_per_unit,
            each_unit_qnty, qty_per_batch_unit, qty_per_batch_cont, qty_per_batch_unit_cont,
            filler_flag, annex, not_apper_flag, batch_size_qnty, batch_size_qnty_unit,
            qs_to_make, each_unit_ratio, raw_group, raw_cat, potency_ratio, da_gen_code,
            each_unit_qnty_annex, each_unit_qnty_unit_annex, seq, stat, prod_qty,
            prod_qty_unit, version_no, raw_qnty, raw_unit, raw_mole_wt, gen_mole_wt,
            raw_by_gen, ref_book, ref_book_ver, ref_book_page, is_annex_raw, opl_p_code,
            opl_raw_code, raw_version_no, user_id, enter_dt,
        );
        copy.insert(conn).await.map_err(ServiceError::db_error)?;
    }

    counter!("pharma_erp.bom.history_snapshots", 1);
    info!(
        bom_id = master.id,
        product_code = %master.product_code,
        sl_no = serial,
        lines = lines.len(),
        "BOM history snapshot stored"
    );

    Ok(history)
}

/// Service for BOM history snapshots
#[derive(Clone)]
pub struct BomHistoryService {
    db: Arc<DbPool>,
}

impl BomHistoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Snapshots the BOM in its own transaction.
    #[instrument(skip(self))]
    pub async fn create_history(
        &self,
        bom_id: i32,
        actor: &str,
    ) -> Result<bom_history_master::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let master = bom::Entity::find_by_id(bom_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("BOM"))?;

        let history = snapshot(&txn, &master, actor).await?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(history)
    }

    /// Snapshots of the BOM's product, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_bom(
        &self,
        bom_id: i32,
    ) -> Result<Vec<bom_history_master::Model>, ServiceError> {
        let db = &*self.db;
        let master = bom::Entity::find_by_id(bom_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("BOM"))?;

        bom_history_master::Entity::find()
            .filter(bom_history_master::Column::ProductCode.eq(master.product_code))
            .order_by_desc(bom_history_master::Column::SlNo)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, history_id: i32) -> Result<HistorySnapshot, ServiceError> {
        let db = &*self.db;
        let master = bom_history_master::Entity::find_by_id(history_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("BOM history"))?;

        let details = bom_history_detail::Entity::find()
            .filter(bom_history_detail::Column::HistMasterId.eq(master.id))
            .order_by_asc(bom_history_detail::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(HistorySnapshot { master, details })
    }
}
