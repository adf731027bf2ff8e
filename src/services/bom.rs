//! Bills of materials: master/detail CRUD, the approve/authorize workflow,
//! version bumps and material requirements.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{bom, bom_detail, raw_material},
    errors::ServiceError,
    services::{
        bom_history,
        references::{ensure_active_raw_material, ensure_category, ensure_employee, ensure_product},
        requirements::{self, MaterialRequirements},
    },
};

const DUPLICATE_VERSION: &str = "BOM with this product and version already exists";

/// Where a BOM master stands in the approval workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display, strum::EnumString,
)]
pub enum WorkflowState {
    Draft,
    Approved,
    Authorized,
}

impl WorkflowState {
    /// Derived from the workflow stamps. An authorization only counts when it
    /// is not older than the current approval, so stamps left over from an
    /// earlier version never authorize a later one.
    pub fn of(master: &bom::Model) -> Self {
        let approved_at = match (&master.aprv_by, master.aprv_dt) {
            (Some(_), Some(at)) => at,
            _ => return WorkflowState::Draft,
        };
        match (&master.auth_by, master.auth_dt) {
            (Some(_), Some(at)) if at >= approved_at => WorkflowState::Authorized,
            _ => WorkflowState::Approved,
        }
    }
}

/// BOM master as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BomView {
    #[serde(flatten)]
    pub master: bom::Model,
    pub workflow_state: WorkflowState,
    /// Active lines; present on single-record reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<bom_detail::Model>>,
}

impl BomView {
    fn summary(master: bom::Model) -> Self {
        Self {
            workflow_state: WorkflowState::of(&master),
            master,
            details: None,
        }
    }

    fn with_details(master: bom::Model, details: Vec<bom_detail::Model>) -> Self {
        Self {
            workflow_state: WorkflowState::of(&master),
            master,
            details: Some(details),
        }
    }
}

/// Descriptive master fields shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BomAttributes {
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
    pub eff_dt: Option<NaiveDate>,
    pub prod_ld_time: Option<i32>,
    pub prod_dosage_form: Option<String>,
    pub bom_code: Option<String>,
    pub label_ratio: Option<Decimal>,
    pub per_unit_solid_unit: Option<String>,
    pub dml_valid_upto: Option<NaiveDate>,
    pub granul_method: Option<String>,
    pub max_bt_per_day: Option<i32>,
    pub mon_sfty_stock: Option<Decimal>,
    pub bpr_version_no: Option<String>,
    pub bpr_eff_dt: Option<NaiveDate>,
    pub bcr_version_no: Option<String>,
    pub bcr_eff_dt: Option<NaiveDate>,
    pub opl_p_code: Option<String>,
    pub batch_per_large_unit: Option<Decimal>,
    pub batch_per_large_qnty: Option<Decimal>,
    pub note: Option<String>,
}

impl BomAttributes {
    fn apply(self, active: &mut bom::ActiveModel) {
        let attrs = self;
        patch_optional!(active <- attrs;
            batch_unit, bom_ratio, annex_ratio, batch_qnty, batch_qnty_unit, pack1, pack2,
            pack3, per_unit_wt, per_unit_wt_unit, std_avg_wt, bmr_no, eff_dt, prod_ld_time,
            prod_dosage_form, bom_code, label_ratio, per_unit_solid_unit, dml_valid_upto,
            granul_method, max_bt_per_day, mon_sfty_stock, bpr_version_no, bpr_eff_dt,
            bcr_version_no, bcr_eff_dt, opl_p_code, batch_per_large_unit,
            batch_per_large_qnty, note,
        );
    }

    fn quantities(&self) -> [Option<Decimal>; 4] {
        [self.batch_qnty, self.per_unit_wt, self.std_avg_wt, self.mon_sfty_stock]
    }
}

/// One raw-material line submitted with a new BOM
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BomDetailInput {
    #[validate(length(min = 1, max = 10))]
    pub raw_code: String,
    pub qty_per_batch: Decimal,
    pub raw_type: Option<String>,
    pub declared_qnty: Option<Decimal>,
    pub declared_unit: Option<String>,
    pub ratio_type: Option<String>,
    pub ratio_ra: Option<Decimal>,
    pub unit_unit: Option<String>,
    pub unit_qnty: Option<Decimal>,
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
    pub is_active: Option<bool>,
}

impl BomDetailInput {
    fn check_quantities(&self) -> Result<(), ServiceError> {
        let quantities = [
            Some(self.qty_per_batch),
            self.declared_qnty,
            self.overage,
            self.unit_qnty,
            self.raw_qnty,
        ];
        if quantities.iter().flatten().any(|q| q.is_sign_negative()) {
            return Err(ServiceError::ValidationError(format!(
                "Quantities for raw material {} must not be negative",
                self.raw_code
            )));
        }
        Ok(())
    }

    fn into_active_model(
        self,
        master: &bom::Model,
        actor: &str,
        now: NaiveDateTime,
    ) -> bom_detail::ActiveModel {
        let mut line = bom_detail::ActiveModel {
            bom_id: Set(master.id),
            pcat_code: Set(master.pcat_code.clone()),
            product_code: Set(master.product_code.clone()),
            raw_code: Set(self.raw_code.clone()),
            qty_per_batch: Set(self.qty_per_batch),
            version_no: Set(Some(master.version_no.clone())),
            user_id: Set(Some(actor.to_string())),
            enter_dt: Set(Some(now)),
            is_active: Set(self.is_active.unwrap_or(true)),
            ..Default::default()
        };
        let input = self;
        patch_optional!(line <- input;
            raw_type, declared_qnty, declared_unit, ratio_type, ratio_ra, unit_unit, unit_qnty,
            overage, qty_per_batch_issue, batch_size, batch_unit, annex_cont, dec_volm_per_unit,
            each_unit_qnty, qty_per_batch_unit, qty_per_batch_cont, qty_per_batch_unit_cont,
            filler_flag, annex, not_apper_flag, batch_size_qnty, batch_size_qnty_unit,
            qs_to_make, each_unit_ratio, raw_group, raw_cat, potency_ratio, da_gen_code,
            each_unit_qnty_annex, each_unit_qnty_unit_annex, seq, stat, prod_qty,
            prod_qty_unit, raw_qnty, raw_unit, raw_mole_wt, gen_mole_wt, raw_by_gen, ref_book,
            ref_book_ver, ref_book_page, is_annex_raw, opl_p_code, opl_raw_code,
            raw_version_no,
        );
        line
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBomRequest {
    #[validate(length(min = 1, max = 10))]
    pub pcat_code: String,
    #[validate(length(min = 1, max = 5))]
    pub product_code: String,
    pub batch_size: Decimal,
    #[validate(length(min = 1, max = 6))]
    pub version_no: String,
    pub initiator: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub attributes: BomAttributes,
    #[serde(default)]
    #[validate]
    pub details: Vec<BomDetailInput>,
}

/// Partial update: absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBomRequest {
    #[validate(length(min = 1, max = 10))]
    pub pcat_code: Option<String>,
    #[validate(length(min = 1, max = 5))]
    pub product_code: Option<String>,
    pub batch_size: Option<Decimal>,
    #[validate(length(min = 1, max = 6))]
    pub version_no: Option<String>,
    pub initiator: Option<String>,
    pub edit_by: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub attributes: BomAttributes,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalOutcome {
    pub approved_by: String,
    pub approved_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorizationOutcome {
    pub authorized_by: String,
    pub authorized_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VersionOutcome {
    pub new_version: String,
    /// Snapshot taken before the bump
    pub history_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewVersion {
    #[validate(length(min = 1, max = 6))]
    pub new_version_no: String,
    #[validate(length(min = 1, max = 10))]
    pub new_initiator: String,
    pub new_note: Option<String>,
}

fn check_batch_size(batch_size: Decimal) -> Result<(), ServiceError> {
    if batch_size <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Batch size must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn check_master_quantities(attributes: &BomAttributes) -> Result<(), ServiceError> {
    if attributes
        .quantities()
        .iter()
        .flatten()
        .any(|q| q.is_sign_negative())
    {
        return Err(ServiceError::ValidationError(
            "BOM quantities must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// True when some master other than `except` already uses (product, version).
async fn version_taken<C: ConnectionTrait>(
    conn: &C,
    product_code: &str,
    version_no: &str,
    except: Option<i32>,
) -> Result<bool, ServiceError> {
    let mut query = bom::Entity::find()
        .filter(bom::Column::ProductCode.eq(product_code))
        .filter(bom::Column::VersionNo.eq(version_no));
    if let Some(id) = except {
        query = query.filter(bom::Column::Id.ne(id));
    }
    Ok(query
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .is_some())
}

async fn load_master<C: ConnectionTrait>(conn: &C, bom_id: i32) -> Result<bom::Model, ServiceError> {
    bom::Entity::find_by_id(bom_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("BOM"))
}

async fn active_details<C: ConnectionTrait>(
    conn: &C,
    bom_id: i32,
) -> Result<Vec<bom_detail::Model>, ServiceError> {
    bom_detail::Entity::find()
        .filter(bom_detail::Column::BomId.eq(bom_id))
        .filter(bom_detail::Column::IsActive.eq(true))
        .order_by_asc(bom_detail::Column::Seq)
        .order_by_asc(bom_detail::Column::Id)
        .all(conn)
        .await
        .map_err(ServiceError::db_error)
}

/// Service for bills of materials
#[derive(Clone)]
pub struct BomService {
    db: Arc<DbPool>,
}

impl BomService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists masters by id. `active_only` hides soft-deleted records.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        active_only: bool,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<BomView>, u64), ServiceError> {
        let db = &*self.db;
        let mut query = bom::Entity::find();
        if active_only {
            query = query.filter(bom::Column::IsActive.eq(true));
        }

        let total = query
            .clone()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        let masters = query
            .order_by_asc(bom::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((masters.into_iter().map(BomView::summary).collect(), total))
    }

    /// Fetches a master, active or not, with its active lines.
    #[instrument(skip(self))]
    pub async fn get(&self, bom_id: i32) -> Result<BomView, ServiceError> {
        let db = &*self.db;
        let master = load_master(db, bom_id).await?;
        let details = active_details(db, bom_id).await?;
        Ok(BomView::with_details(master, details))
    }

    #[instrument(skip(self))]
    pub async fn by_product(&self, product_code: &str) -> Result<Vec<BomView>, ServiceError> {
        let masters = bom::Entity::find()
            .filter(bom::Column::ProductCode.eq(product_code))
            .order_by_asc(bom::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(masters.into_iter().map(BomView::summary).collect())
    }

    /// Creates a master and its lines in one transaction.
    #[instrument(skip(self, request), fields(product_code = %request.product_code, version_no = %request.version_no))]
    pub async fn create(
        &self,
        request: CreateBomRequest,
        actor: &str,
    ) -> Result<BomView, ServiceError> {
        check_batch_size(request.batch_size)?;
        check_master_quantities(&request.attributes)?;
        for line in &request.details {
            line.check_quantities()?;
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        ensure_product(&txn, &request.product_code).await?;
        ensure_category(&txn, &request.pcat_code).await?;
        if version_taken(&txn, &request.product_code, &request.version_no, None).await? {
            return Err(ServiceError::Conflict(DUPLICATE_VERSION.to_string()));
        }
        if let Some(initiator) = &request.initiator {
            ensure_employee(&txn, initiator, "Initiator").await?;
        }
        for line in &request.details {
            ensure_active_raw_material(&txn, &line.raw_code).await?;
        }

        let now = Utc::now().naive_utc();
        let mut active = bom::ActiveModel {
            pcat_code: Set(request.pcat_code),
            product_code: Set(request.product_code),
            batch_size: Set(request.batch_size),
            version_no: Set(request.version_no),
            initiator: Set(request.initiator),
            user_id: Set(Some(actor.to_string())),
            enter_dt: Set(Some(now)),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        request.attributes.apply(&mut active);
        let master = active.insert(&txn).await.map_err(ServiceError::db_error)?;

        for line in request.details {
            line.into_active_model(&master, actor, now)
                .insert(&txn)
                .await
                .map_err(ServiceError::db_error)?;
        }

        let details = active_details(&txn, master.id).await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("pharma_erp.bom.created", 1);
        info!(
            bom_id = master.id,
            lines = details.len(),
            "BOM created"
        );
        Ok(BomView::with_details(master, details))
    }

    /// Applies a partial update to the master. Changed references are
    /// re-validated and a changed product or category is carried to the lines.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        bom_id: i32,
        mut request: UpdateBomRequest,
        actor: &str,
    ) -> Result<BomView, ServiceError> {
        if let Some(batch_size) = request.batch_size {
            check_batch_size(batch_size)?;
        }
        check_master_quantities(&request.attributes)?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let current = load_master(&txn, bom_id).await?;

        if let Some(product_code) = &request.product_code {
            ensure_product(&txn, product_code).await?;
        }
        if let Some(pcat_code) = &request.pcat_code {
            ensure_category(&txn, pcat_code).await?;
        }
        if request.product_code.is_some() || request.version_no.is_some() {
            let product_code = request
                .product_code
                .as_deref()
                .unwrap_or(&current.product_code);
            let version_no = request.version_no.as_deref().unwrap_or(&current.version_no);
            if version_taken(&txn, product_code, version_no, Some(bom_id)).await? {
                return Err(ServiceError::Conflict(DUPLICATE_VERSION.to_string()));
            }
        }
        if let Some(initiator) = &request.initiator {
            ensure_employee(&txn, initiator, "Initiator").await?;
        }
        if let Some(editor) = &request.edit_by {
            ensure_employee(&txn, editor, "Editor").await?;
        }

        let cascade_pcat = request.pcat_code.clone();
        let cascade_product = request.product_code.clone();
        let cascade_version = request.version_no.clone();
        let attributes = std::mem::take(&mut request.attributes);

        let now = Utc::now().naive_utc();
        let mut active = current.into_active_model();
        patch_required!(active <- request;
            pcat_code, product_code, batch_size, version_no, is_active,
        );
        patch_optional!(active <- request; initiator, edit_by);
        attributes.apply(&mut active);
        active.edit_dt = Set(Some(now));
        active.updated_at = Set(now);
        let master = active.update(&txn).await.map_err(ServiceError::db_error)?;

        if cascade_pcat.is_some() || cascade_product.is_some() || cascade_version.is_some() {
            let mut cascade =
                bom_detail::Entity::update_many().filter(bom_detail::Column::BomId.eq(bom_id));
            if let Some(pcat_code) = cascade_pcat {
                cascade = cascade.col_expr(bom_detail::Column::PcatCode, Expr::value(pcat_code));
            }
            if let Some(product_code) = cascade_product {
                cascade =
                    cascade.col_expr(bom_detail::Column::ProductCode, Expr::value(product_code));
            }
            if let Some(version_no) = cascade_version {
                cascade =
                    cascade.col_expr(bom_detail::Column::VersionNo, Expr::value(Some(version_no)));
            }
            cascade.exec(&txn).await.map_err(ServiceError::db_error)?;
        }

        let details = active_details(&txn, bom_id).await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(bom_id, actor, "BOM updated");
        Ok(BomView::with_details(master, details))
    }

    /// Soft delete; the workflow stamps are left alone.
    #[instrument(skip(self))]
    pub async fn delete(&self, bom_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db;
        let master = load_master(db, bom_id).await?;

        let mut active = master.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await.map_err(ServiceError::db_error)?;

        counter!("pharma_erp.bom.deleted", 1);
        info!(bom_id, "BOM soft-deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn material_requirements(
        &self,
        bom_id: i32,
        production_quantity: Decimal,
    ) -> Result<MaterialRequirements, ServiceError> {
        let db = &*self.db;
        let master = load_master(db, bom_id).await?;
        let details = active_details(db, bom_id).await?;

        let codes: Vec<String> = details.iter().map(|d| d.raw_code.clone()).collect();
        let raw_names: HashMap<String, String> = if codes.is_empty() {
            HashMap::new()
        } else {
            raw_material::Entity::find()
                .filter(raw_material::Column::RawCode.is_in(codes))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(|raw| (raw.raw_code, raw.raw_name))
                .collect()
        };

        requirements::compute(&master, &details, &raw_names, production_quantity)
    }

    /// Stamps the approver. Permitted from any state; re-approving an
    /// authorized master keeps its authorization and is logged.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        bom_id: i32,
        approver_emp_code: &str,
    ) -> Result<ApprovalOutcome, ServiceError> {
        let db = &*self.db;
        let master = load_master(db, bom_id).await?;
        ensure_employee(db, approver_emp_code, "Approver").await?;

        if WorkflowState::of(&master) == WorkflowState::Authorized {
            warn!(
                bom_id,
                approver = approver_emp_code,
                "re-approving an authorized BOM"
            );
        }

        let now = Utc::now().naive_utc();
        let mut active = master.into_active_model();
        active.aprv_by = Set(Some(approver_emp_code.to_string()));
        active.aprv_dt = Set(Some(now));
        active.updated_at = Set(now);
        active.update(db).await.map_err(ServiceError::db_error)?;

        counter!("pharma_erp.bom.approved", 1);
        info!(bom_id, approver = approver_emp_code, "BOM approved");
        Ok(ApprovalOutcome {
            approved_by: approver_emp_code.to_string(),
            approved_at: now,
        })
    }

    /// Stamps the authorizer; the master must carry an approval.
    #[instrument(skip(self))]
    pub async fn authorize(
        &self,
        bom_id: i32,
        authorizer_emp_code: &str,
    ) -> Result<AuthorizationOutcome, ServiceError> {
        let db = &*self.db;
        let master = load_master(db, bom_id).await?;

        if master.aprv_by.is_none() || master.aprv_dt.is_none() {
            return Err(ServiceError::Precondition(
                "BOM must be approved before authorization".to_string(),
            ));
        }
        ensure_employee(db, authorizer_emp_code, "Authorizer").await?;

        let now = Utc::now().naive_utc();
        let mut active = master.into_active_model();
        active.auth_by = Set(Some(authorizer_emp_code.to_string()));
        active.auth_dt = Set(Some(now));
        active.updated_at = Set(now);
        active.update(db).await.map_err(ServiceError::db_error)?;

        counter!("pharma_erp.bom.authorized", 1);
        info!(bom_id, authorizer = authorizer_emp_code, "BOM authorized");
        Ok(AuthorizationOutcome {
            authorized_by: authorizer_emp_code.to_string(),
            authorized_at: now,
        })
    }

    /// Snapshots the current state, then assigns a new version, clears the
    /// approval and carries the version to every line. One transaction.
    #[instrument(skip(self, request), fields(new_version_no = %request.new_version_no))]
    pub async fn update_version(
        &self,
        bom_id: i32,
        request: NewVersion,
        actor: &str,
    ) -> Result<VersionOutcome, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let master = load_master(&txn, bom_id).await?;

        if version_taken(&txn, &master.product_code, &request.new_version_no, None).await? {
            return Err(ServiceError::Conflict("BOM version already exists".to_string()));
        }
        ensure_employee(&txn, &request.new_initiator, "Initiator").await?;

        let history = bom_history::snapshot(&txn, &master, actor).await?;

        let now = Utc::now().naive_utc();
        let mut active = master.into_active_model();
        active.version_no = Set(request.new_version_no.clone());
        active.initiator = Set(Some(request.new_initiator.clone()));
        if let Some(note) = request.new_note.filter(|n| !n.is_empty()) {
            active.note = Set(Some(note));
        }
        active.user_id = Set(Some(actor.to_string()));
        active.enter_dt = Set(Some(now));
        active.aprv_by = Set(None);
        active.aprv_dt = Set(None);
        active.updated_at = Set(now);
        active.update(&txn).await.map_err(ServiceError::db_error)?;

        bom_detail::Entity::update_many()
            .col_expr(
                bom_detail::Column::VersionNo,
                Expr::value(Some(request.new_version_no.clone())),
            )
            .col_expr(bom_detail::Column::UserId, Expr::value(Some(actor.to_string())))
            .col_expr(bom_detail::Column::EnterDt, Expr::value(Some(now)))
            .filter(bom_detail::Column::BomId.eq(bom_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("pharma_erp.bom.versioned", 1);
        info!(
            bom_id,
            new_version = %request.new_version_no,
            history_id = history.id,
            "BOM version updated"
        );
        Ok(VersionOutcome {
            new_version: request.new_version_no,
            history_id: history.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn master() -> bom::Model {
        let now = Utc::now().naive_utc();
        bom::Model {
            id: 7,
            pcat_code: "TAB".into(),
            product_code: "P0001".into(),
            batch_size: dec!(100),
            batch_unit: None,
            bom_ratio: None,
            annex_ratio: None,
            batch_qnty: None,
            batch_qnty_unit: None,
            pack1: None,
            pack2: None,
            pack3: None,
            per_unit_wt: None,
            per_unit_wt_unit: None,
            std_avg_wt: None,
            bmr_no: None,
            version_no: "001".into(),
            eff_dt: None,
            prod_ld_time: None,
            prod_dosage_form: None,
            bom_code: None,
            label_ratio: None,
            per_unit_solid_unit: None,
            dml_valid_upto: None,
            granul_method: None,
            max_bt_per_day: None,
            mon_sfty_stock: None,
            bpr_version_no: None,
            bpr_eff_dt: None,
            bcr_version_no: None,
            bcr_eff_dt: None,
            opl_p_code: None,
            batch_per_large_unit: None,
            batch_per_large_qnty: None,
            note: None,
            user_id: Some("tester".into()),
            enter_dt: Some(now),
            initiator: None,
            aprv_by: None,
            aprv_dt: None,
            edit_by: None,
            edit_dt: None,
            auth_by: None,
            auth_dt: None,
            is_active: true,
            created_by: Some("tester".into()),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(db: MockDatabase) -> BomService {
        BomService::new(Arc::new(db.into_connection()))
    }

    #[test]
    fn workflow_state_follows_stamps() {
        let now = Utc::now().naive_utc();
        let mut m = master();
        assert_eq!(WorkflowState::of(&m), WorkflowState::Draft);

        m.aprv_by = Some("E001".into());
        m.aprv_dt = Some(now);
        assert_eq!(WorkflowState::of(&m), WorkflowState::Approved);

        m.auth_by = Some("E002".into());
        m.auth_dt = Some(now);
        assert_eq!(WorkflowState::of(&m), WorkflowState::Authorized);

        // Version bump clears approval only
        m.aprv_by = None;
        m.aprv_dt = None;
        assert_eq!(WorkflowState::of(&m), WorkflowState::Draft);

        // Approving the new version does not inherit the old authorization
        m.aprv_by = Some("E001".into());
        m.aprv_dt = Some(now + chrono::Duration::seconds(5));
        assert_eq!(WorkflowState::of(&m), WorkflowState::Approved);
    }

    #[test]
    fn workflow_state_display_round_trips() {
        assert_eq!(WorkflowState::Approved.to_string(), "Approved");
        assert_eq!(
            "Authorized".parse::<WorkflowState>().unwrap(),
            WorkflowState::Authorized
        );
    }

    #[tokio::test]
    async fn authorize_requires_approval() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![master()]]);

        let result = service(db).authorize(7, "E002").await;
        assert_matches!(
            result,
            Err(ServiceError::Precondition(msg)) if msg == "BOM must be approved before authorization"
        );
    }

    #[tokio::test]
    async fn authorize_requires_half_stamped_approval_to_be_complete() {
        let mut m = master();
        m.aprv_by = Some("E001".into());
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![m]]);

        assert_matches!(
            service(db).authorize(7, "E002").await,
            Err(ServiceError::Precondition(_))
        );
    }

    #[tokio::test]
    async fn approve_rejects_unknown_employee() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![master()]])
            .append_query_results([Vec::<crate::entities::employee::Model>::new()]);

        assert_matches!(
            service(db).approve(7, "NOPE").await,
            Err(ServiceError::ValidationError(msg)) if msg == "Approver employee not found"
        );
    }

    #[tokio::test]
    async fn missing_bom_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<bom::Model>::new()]);

        assert_matches!(
            service(db).approve(99, "E001").await,
            Err(ServiceError::NotFound(msg)) if msg == "BOM not found"
        );
    }

    #[tokio::test]
    async fn create_rejects_non_positive_batch_size_before_touching_the_database() {
        let request = CreateBomRequest {
            pcat_code: "TAB".into(),
            product_code: "P0001".into(),
            batch_size: dec!(0),
            version_no: "001".into(),
            initiator: None,
            is_active: None,
            attributes: BomAttributes::default(),
            details: vec![],
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        assert_matches!(
            service(db).create(request, "tester").await,
            Err(ServiceError::ValidationError(_))
        );
    }
}
