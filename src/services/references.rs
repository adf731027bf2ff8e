//! Existence checks for cross-entity references by natural code.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{department, employee, product, product_category, raw_material, supplier};
use crate::errors::ServiceError;

/// Looks up a row by a natural-code column.
pub async fn find_by_code<E, C>(
    conn: &C,
    column: E::Column,
    code: &str,
) -> Result<Option<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find()
        .filter(column.eq(code))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)
}

/// Fails with `ValidationError(message)` when no row carries `code`.
pub async fn ensure_exists<E, C>(
    conn: &C,
    column: E::Column,
    code: &str,
    message: &str,
) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    find_by_code::<E, C>(conn, column, code)
        .await?
        .ok_or_else(|| ServiceError::ValidationError(message.to_string()))
}

pub async fn ensure_product<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<product::Model, ServiceError> {
    ensure_exists::<product::Entity, C>(conn, product::Column::ProductCode, code, "Product not found")
        .await
}

pub async fn ensure_category<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<product_category::Model, ServiceError> {
    ensure_exists::<product_category::Entity, C>(
        conn,
        product_category::Column::PcatCode,
        code,
        "Product category not found",
    )
    .await
}

pub async fn ensure_department<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<department::Model, ServiceError> {
    ensure_exists::<department::Entity, C>(
        conn,
        department::Column::DeptCode,
        code,
        "Department not found",
    )
    .await
}

pub async fn ensure_supplier<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<supplier::Model, ServiceError> {
    ensure_exists::<supplier::Entity, C>(conn, supplier::Column::SupCode, code, "Supplier not found")
        .await
}

/// `role` names the workflow slot in the message, e.g. "Approver".
pub async fn ensure_employee<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    role: &str,
) -> Result<employee::Model, ServiceError> {
    ensure_exists::<employee::Entity, C>(
        conn,
        employee::Column::EmpCode,
        code,
        &format!("{} employee not found", role),
    )
    .await
}

/// Raw materials referenced by new lines must also be active.
pub async fn ensure_active_raw_material<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<raw_material::Model, ServiceError> {
    raw_material::Entity::find()
        .filter(raw_material::Column::RawCode.eq(code))
        .filter(raw_material::Column::IsActive.eq(true))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::ValidationError(format!("Raw material {} not found", code)))
}
