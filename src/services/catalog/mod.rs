//! Uniform CRUD over the catalog tables.
//!
//! Each table implements [`CatalogResource`], which describes its natural
//! key, reference checks, status vocabulary and delete policy. [`CatalogService`]
//! runs the shared list/get/create/update/status/delete flows against it.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use metrics::counter;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    FromQueryResult, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, Value,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{db::DbPool, errors::ServiceError};

pub mod operations;
pub mod procurement;
pub mod reference;

pub use operations::{DrugRegistrations, ProductionPlans};
pub use procurement::{LettersOfCredit, PurchaseOrders, PurchaseRequisitions};
pub use reference::{
    Departments, Employees, ProductCategories, Products, QcTests, RawMaterials, Suppliers,
};

/// What `DELETE` does to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Clears the active flag and keeps the row.
    Soft,
    /// Removes the row and, through the foreign keys, its items.
    Hard,
    /// Removes the row only while its status is one of these.
    HardWhen(&'static [&'static str]),
}

#[async_trait]
pub trait CatalogResource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Serialize
        + Clone
        + Send
        + Sync
        + 'static;
    type Column: ColumnTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + 'static;
    type Create: DeserializeOwned + Validate + Send + Sync + 'static;
    type Update: DeserializeOwned + Validate + Send + Sync + 'static;
    /// Single-record representation; headers embed their items here.
    type View: Serialize + Send + 'static;

    /// Subject of messages, e.g. "Purchase requisition"
    const LABEL: &'static str;
    /// Conflict message for a natural code already in use
    const DUPLICATE: &'static str;
    const DELETE: DeletePolicy;
    /// Precondition message when `DeletePolicy::HardWhen` refuses
    const DELETE_REFUSED: &'static str = "Record cannot be deleted in its current status";
    /// Accepted status values; empty when the table has no status
    const STATUSES: &'static [&'static str] = &[];

    fn id_column() -> Self::Column;
    fn code_column() -> Self::Column;

    fn active_column() -> Option<Self::Column> {
        None
    }

    fn status_column() -> Option<Self::Column> {
        None
    }

    fn updated_at_column() -> Option<Self::Column> {
        None
    }

    fn code(create: &Self::Create) -> &str;

    fn requested_status(_create: &Self::Create) -> Option<&str> {
        None
    }

    /// Reference checks run before the insert, inside the transaction.
    async fn validate_create<C: ConnectionTrait>(
        _conn: &C,
        _create: &Self::Create,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Reference checks for the fields present in a patch.
    async fn validate_update<C: ConnectionTrait>(
        _conn: &C,
        _update: &Self::Update,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    fn new_record(create: &Self::Create, actor: &str, now: NaiveDateTime) -> Self::ActiveModel;

    fn apply_update(active: &mut Self::ActiveModel, update: Self::Update);

    /// Inserts child rows after the header; same transaction.
    async fn insert_items<C: ConnectionTrait>(
        _conn: &C,
        _header: &Self::Model,
        _create: Self::Create,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn view<C: ConnectionTrait>(conn: &C, model: Self::Model)
        -> Result<Self::View, ServiceError>;
}

/// Error for a status outside the resource's vocabulary.
pub fn invalid_status(allowed: &[&str]) -> ServiceError {
    ServiceError::ValidationError(format!(
        "Invalid status. Must be one of: {}",
        allowed.join(", ")
    ))
}

fn check_status<R: CatalogResource>(status: &str) -> Result<(), ServiceError> {
    if R::STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(invalid_status(R::STATUSES))
    }
}

fn string_value(value: Value) -> Option<String> {
    match value {
        Value::String(Some(s)) => Some(*s),
        _ => None,
    }
}

/// Generic CRUD service over any [`CatalogResource`]
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    async fn load<R: CatalogResource, C: ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> Result<R::Model, ServiceError> {
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found(R::LABEL))
    }

    /// Records ordered by id. `active_only` applies to soft-deleting tables.
    #[instrument(skip(self), fields(resource = R::LABEL))]
    pub async fn list<R: CatalogResource>(
        &self,
        active_only: bool,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<R::Model>, u64), ServiceError> {
        let db = &*self.db;
        let mut query = R::Entity::find();
        if let (true, Some(active)) = (active_only, R::active_column()) {
            query = query.filter(active.eq(true));
        }

        let total = query
            .clone()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        let rows = query
            .order_by_asc(R::id_column())
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Records whose `column` equals `value`, ordered by id.
    #[instrument(skip(self, column), fields(resource = R::LABEL))]
    pub async fn list_where<R: CatalogResource>(
        &self,
        column: R::Column,
        value: &str,
    ) -> Result<Vec<R::Model>, ServiceError> {
        R::Entity::find()
            .filter(column.eq(value))
            .order_by_asc(R::id_column())
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self), fields(resource = R::LABEL))]
    pub async fn get<R: CatalogResource>(&self, id: i32) -> Result<R::View, ServiceError> {
        let db = &*self.db;
        let model = Self::load::<R, _>(db, id).await?;
        R::view(db, model).await
    }

    #[instrument(skip(self), fields(resource = R::LABEL))]
    pub async fn get_by_code<R: CatalogResource>(
        &self,
        code: &str,
    ) -> Result<R::View, ServiceError> {
        let db = &*self.db;
        let model = R::Entity::find()
            .filter(R::code_column().eq(code))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found(R::LABEL))?;
        R::view(db, model).await
    }

    /// Inserts the record and its items in one transaction.
    #[instrument(skip(self, create), fields(resource = R::LABEL))]
    pub async fn create<R: CatalogResource>(
        &self,
        create: R::Create,
        actor: &str,
    ) -> Result<R::View, ServiceError> {
        if let Some(status) = R::requested_status(&create) {
            check_status::<R>(status)?;
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let taken = R::Entity::find()
            .filter(R::code_column().eq(R::code(&create)))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if taken.is_some() {
            return Err(ServiceError::Conflict(R::DUPLICATE.to_string()));
        }
        R::validate_create(&txn, &create).await?;

        let now = Utc::now().naive_utc();
        let header = R::new_record(&create, actor, now)
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        R::insert_items(&txn, &header, create).await?;

        let view = R::view(&txn, header).await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("pharma_erp.catalog.created", 1, "resource" => R::LABEL);
        info!(resource = R::LABEL, actor, "catalog record created");
        Ok(view)
    }

    /// Partial update: fields absent from the patch are left untouched.
    #[instrument(skip(self, update), fields(resource = R::LABEL))]
    pub async fn update<R: CatalogResource>(
        &self,
        id: i32,
        update: R::Update,
    ) -> Result<R::View, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let model = Self::load::<R, _>(&txn, id).await?;
        R::validate_update(&txn, &update).await?;

        let mut active = model.into_active_model();
        R::apply_update(&mut active, update);
        if let Some(column) = R::updated_at_column() {
            active.set(column, Utc::now().naive_utc().into());
        }
        let model = active.update(&txn).await.map_err(ServiceError::db_error)?;

        let view = R::view(&txn, model).await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(resource = R::LABEL, id, "catalog record updated");
        Ok(view)
    }

    /// Sets the status column to one of the resource's accepted values.
    #[instrument(skip(self), fields(resource = R::LABEL))]
    pub async fn set_status<R: CatalogResource>(
        &self,
        id: i32,
        status: &str,
    ) -> Result<(), ServiceError> {
        let Some(column) = R::status_column() else {
            return Err(ServiceError::ValidationError(format!(
                "{} has no status",
                R::LABEL
            )));
        };

        let db = &*self.db;
        let model = Self::load::<R, _>(db, id).await?;
        check_status::<R>(status)?;

        let mut active = model.into_active_model();
        active.set(column, status.into());
        if let Some(updated_at) = R::updated_at_column() {
            active.set(updated_at, Utc::now().naive_utc().into());
        }
        active.update(db).await.map_err(ServiceError::db_error)?;

        info!(resource = R::LABEL, id, status, "catalog status changed");
        Ok(())
    }

    /// Soft or hard delete according to the resource's policy.
    #[instrument(skip(self), fields(resource = R::LABEL))]
    pub async fn delete<R: CatalogResource>(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db;
        let model = Self::load::<R, _>(db, id).await?;

        match R::DELETE {
            DeletePolicy::Soft => {
                let column = R::active_column().ok_or_else(|| {
                    ServiceError::InternalError(format!("{} has no active flag", R::LABEL))
                })?;
                let mut active = model.into_active_model();
                active.set(column, false.into());
                if let Some(updated_at) = R::updated_at_column() {
                    active.set(updated_at, Utc::now().naive_utc().into());
                }
                active.update(db).await.map_err(ServiceError::db_error)?;
            }
            DeletePolicy::Hard => {
                model
                    .into_active_model()
                    .delete(db)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
            DeletePolicy::HardWhen(allowed) => {
                let status = R::status_column()
                    .and_then(|column| string_value(model.get(column)))
                    .unwrap_or_default();
                if !allowed.contains(&status.as_str()) {
                    return Err(ServiceError::Precondition(R::DELETE_REFUSED.to_string()));
                }
                model
                    .into_active_model()
                    .delete(db)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
        }

        counter!("pharma_erp.catalog.deleted", 1, "resource" => R::LABEL);
        info!(resource = R::LABEL, id, policy = ?R::DELETE, "catalog record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_status_lists_allowed_values() {
        let err = invalid_status(&["Draft", "Sent"]);
        assert_eq!(err.to_string(), "Invalid status. Must be one of: Draft, Sent");
    }

    #[test]
    fn status_check_uses_resource_vocabulary() {
        assert!(check_status::<PurchaseRequisitions>("Submitted").is_ok());
        assert!(check_status::<PurchaseRequisitions>("Sent").is_err());
        assert!(check_status::<ProductionPlans>("In Progress").is_ok());
    }

    #[test]
    fn string_value_reads_only_strings() {
        assert_eq!(string_value(Value::from("Draft")), Some("Draft".to_string()));
        assert_eq!(string_value(Value::Int(Some(3))), None);
    }
}
