//! Procurement documents: requisitions, purchase orders and letters of
//! credit. Each is a header with item lines inserted alongside it.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{invalid_status, CatalogResource, DeletePolicy};
use crate::{
    entities::{
        letter_of_credit, letter_of_credit_item, purchase_order, purchase_order_item,
        purchase_requisition, purchase_requisition_item, raw_material,
    },
    errors::ServiceError,
    services::references::{ensure_supplier, find_by_code},
};

/// Every item must name a known raw material.
async fn ensure_raw_materials<C: ConnectionTrait>(
    conn: &C,
    codes: Vec<String>,
) -> Result<(), ServiceError> {
    for code in codes {
        if find_by_code::<raw_material::Entity, C>(conn, raw_material::Column::RawCode, &code)
            .await?
            .is_none()
        {
            return Err(ServiceError::ValidationError(format!(
                "Raw material {} not found",
                code
            )));
        }
    }
    Ok(())
}

fn check_optional_status(status: Option<&str>, allowed: &[&str]) -> Result<(), ServiceError> {
    match status {
        Some(s) if !allowed.contains(&s) => Err(invalid_status(allowed)),
        _ => Ok(()),
    }
}

pub struct PurchaseRequisitions;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequisitionItemInput {
    pub item_no: i32,
    #[validate(length(min = 1, max = 10))]
    pub raw_code: String,
    pub quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub estimated_rate: Option<Decimal>,
    pub estimated_amount: Option<Decimal>,
    pub required_date: Option<NaiveDate>,
    pub specification: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequisition {
    #[validate(length(min = 1, max = 20))]
    pub req_no: String,
    pub req_date: NaiveDate,
    pub department: Option<String>,
    pub requested_by: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub total_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub required_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub items: Vec<RequisitionItemInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRequisition {
    pub req_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub requested_by: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub total_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub required_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequisitionView {
    #[serde(flatten)]
    pub header: purchase_requisition::Model,
    pub items: Vec<purchase_requisition_item::Model>,
}

#[async_trait]
impl CatalogResource for PurchaseRequisitions {
    type Entity = purchase_requisition::Entity;
    type Model = purchase_requisition::Model;
    type Column = purchase_requisition::Column;
    type ActiveModel = purchase_requisition::ActiveModel;
    type Create = CreateRequisition;
    type Update = UpdateRequisition;
    type View = RequisitionView;

    const LABEL: &'static str = "Purchase requisition";
    const DUPLICATE: &'static str = "Purchase requisition number already exists";
    const DELETE: DeletePolicy = DeletePolicy::HardWhen(&["Draft"]);
    const DELETE_REFUSED: &'static str = "Only draft requisitions can be deleted";
    const STATUSES: &'static [&'static str] =
        &["Draft", "Submitted", "Approved", "Rejected", "Cancelled"];

    fn id_column() -> purchase_requisition::Column {
        purchase_requisition::Column::Id
    }

    fn code_column() -> purchase_requisition::Column {
        purchase_requisition::Column::ReqNo
    }

    fn status_column() -> Option<purchase_requisition::Column> {
        Some(purchase_requisition::Column::Status)
    }

    fn updated_at_column() -> Option<purchase_requisition::Column> {
        Some(purchase_requisition::Column::UpdatedAt)
    }

    fn code(create: &CreateRequisition) -> &str {
        &create.req_no
    }

    fn requested_status(create: &CreateRequisition) -> Option<&str> {
        create.status.as_deref()
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateRequisition,
    ) -> Result<(), ServiceError> {
        let codes: Vec<String> = create.items.iter().map(|i| i.raw_code.clone()).collect();
        ensure_raw_materials(conn, codes).await
    }

    async fn validate_update<C: ConnectionTrait>(
        _conn: &C,
        update: &UpdateRequisition,
    ) -> Result<(), ServiceError> {
        check_optional_status(update.status.as_deref(), Self::STATUSES)
    }

    fn new_record(
        create: &CreateRequisition,
        actor: &str,
        now: NaiveDateTime,
    ) -> purchase_requisition::ActiveModel {
        let mut active = purchase_requisition::ActiveModel {
            priority: Set(create.priority.clone().unwrap_or_else(|| "Normal".to_string())),
            status: Set(create.status.clone().unwrap_or_else(|| "Draft".to_string())),
            currency: Set(create.currency.clone().unwrap_or_else(|| "USD".to_string())),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            req_no, req_date, department, requested_by, total_amount, required_date, remarks,
        );
        active
    }

    fn apply_update(active: &mut purchase_requisition::ActiveModel, update: UpdateRequisition) {
        patch_required!(active <- update; req_date, priority, status, currency);
        patch_optional!(active <- update;
            department, requested_by, total_amount, required_date, remarks,
        );
    }

    async fn insert_items<C: ConnectionTrait>(
        conn: &C,
        header: &purchase_requisition::Model,
        create: CreateRequisition,
    ) -> Result<(), ServiceError> {
        for item in create.items {
            let mut line = purchase_requisition_item::ActiveModel {
                req_id: Set(header.id),
                ..Default::default()
            };
            copy_fields!(line <- item;
                item_no, raw_code, quantity, unit_of_measure, estimated_rate, estimated_amount,
                required_date, specification, remarks,
            );
            line.insert(conn).await.map_err(ServiceError::db_error)?;
        }
        Ok(())
    }

    async fn view<C: ConnectionTrait>(
        conn: &C,
        header: purchase_requisition::Model,
    ) -> Result<RequisitionView, ServiceError> {
        let items = purchase_requisition_item::Entity::find()
            .filter(purchase_requisition_item::Column::ReqId.eq(header.id))
            .order_by_asc(purchase_requisition_item::Column::ItemNo)
            .all(conn)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(RequisitionView { header, items })
    }
}

pub struct PurchaseOrders;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderItemInput {
    pub item_no: i32,
    #[validate(length(min = 1, max = 10))]
    pub raw_code: String,
    pub quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub unit_rate: Decimal,
    /// Defaults to quantity times unit rate
    pub amount: Option<Decimal>,
    pub delivery_date: Option<NaiveDate>,
    pub specification: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    #[validate(length(min = 1, max = 20))]
    pub po_no: String,
    pub po_date: NaiveDate,
    #[validate(length(min = 1, max = 10))]
    pub sup_code: String,
    pub currency: Option<String>,
    pub exchange_rate: Option<Decimal>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub total_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub net_amount: Option<Decimal>,
    pub status: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrder {
    pub po_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 10))]
    pub sup_code: Option<String>,
    pub currency: Option<String>,
    pub exchange_rate: Option<Decimal>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub total_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub net_amount: Option<Decimal>,
    pub status: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub header: purchase_order::Model,
    pub items: Vec<purchase_order_item::Model>,
}

#[async_trait]
impl CatalogResource for PurchaseOrders {
    type Entity = purchase_order::Entity;
    type Model = purchase_order::Model;
    type Column = purchase_order::Column;
    type ActiveModel = purchase_order::ActiveModel;
    type Create = CreateOrder;
    type Update = UpdateOrder;
    type View = OrderView;

    const LABEL: &'static str = "Purchase order";
    const DUPLICATE: &'static str = "Purchase order number already exists";
    const DELETE: DeletePolicy = DeletePolicy::HardWhen(&["Draft"]);
    const DELETE_REFUSED: &'static str = "Only draft purchase orders can be deleted";
    const STATUSES: &'static [&'static str] =
        &["Draft", "Sent", "Acknowledged", "Closed", "Cancelled"];

    fn id_column() -> purchase_order::Column {
        purchase_order::Column::Id
    }

    fn code_column() -> purchase_order::Column {
        purchase_order::Column::PoNo
    }

    fn status_column() -> Option<purchase_order::Column> {
        Some(purchase_order::Column::Status)
    }

    fn updated_at_column() -> Option<purchase_order::Column> {
        Some(purchase_order::Column::UpdatedAt)
    }

    fn code(create: &CreateOrder) -> &str {
        &create.po_no
    }

    fn requested_status(create: &CreateOrder) -> Option<&str> {
        create.status.as_deref()
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateOrder,
    ) -> Result<(), ServiceError> {
        ensure_supplier(conn, &create.sup_code).await?;
        let codes: Vec<String> = create.items.iter().map(|i| i.raw_code.clone()).collect();
        ensure_raw_materials(conn, codes).await
    }

    async fn validate_update<C: ConnectionTrait>(
        conn: &C,
        update: &UpdateOrder,
    ) -> Result<(), ServiceError> {
        if let Some(sup_code) = &update.sup_code {
            ensure_supplier(conn, sup_code).await?;
        }
        check_optional_status(update.status.as_deref(), Self::STATUSES)
    }

    fn new_record(create: &CreateOrder, actor: &str, now: NaiveDateTime) -> purchase_order::ActiveModel {
        let mut active = purchase_order::ActiveModel {
            currency: Set(create.currency.clone().unwrap_or_else(|| "USD".to_string())),
            exchange_rate: Set(create.exchange_rate.unwrap_or(Decimal::ONE)),
            discount_amount: Set(create.discount_amount.unwrap_or_default()),
            tax_amount: Set(create.tax_amount.unwrap_or_default()),
            status: Set(create.status.clone().unwrap_or_else(|| "Draft".to_string())),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            po_no, po_date, sup_code, payment_terms, delivery_terms, delivery_address,
            total_amount, net_amount, delivery_date, remarks,
        );
        active
    }

    fn apply_update(active: &mut purchase_order::ActiveModel, update: UpdateOrder) {
        patch_required!(active <- update;
            po_date, sup_code, currency, exchange_rate, discount_amount, tax_amount, status,
        );
        patch_optional!(active <- update;
            payment_terms, delivery_terms, delivery_address, total_amount, net_amount,
            delivery_date, remarks,
        );
    }

    async fn insert_items<C: ConnectionTrait>(
        conn: &C,
        header: &purchase_order::Model,
        create: CreateOrder,
    ) -> Result<(), ServiceError> {
        for item in create.items {
            let mut line = purchase_order_item::ActiveModel {
                po_id: Set(header.id),
                amount: Set(item.amount.unwrap_or(item.quantity * item.unit_rate)),
                ..Default::default()
            };
            copy_fields!(line <- item;
                item_no, raw_code, quantity, unit_of_measure, unit_rate, delivery_date,
                specification, remarks,
            );
            line.insert(conn).await.map_err(ServiceError::db_error)?;
        }
        Ok(())
    }

    async fn view<C: ConnectionTrait>(
        conn: &C,
        header: purchase_order::Model,
    ) -> Result<OrderView, ServiceError> {
        let items = purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::PoId.eq(header.id))
            .order_by_asc(purchase_order_item::Column::ItemNo)
            .all(conn)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(OrderView { header, items })
    }
}

pub struct LettersOfCredit;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreditItemInput {
    #[validate(length(min = 1, max = 10))]
    pub raw_code: String,
    pub quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub tolerance_percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLetterOfCredit {
    #[validate(length(min = 1, max = 20))]
    pub lc_no: String,
    pub lc_date: NaiveDate,
    #[validate(length(min = 1, max = 10))]
    pub sup_code: String,
    pub bank_code: Option<String>,
    pub lc_amount: Decimal,
    pub currency: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub latest_shipment_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    pub partial_shipment: Option<bool>,
    pub transhipment: Option<bool>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub items: Vec<CreditItemInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLetterOfCredit {
    pub lc_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 10))]
    pub sup_code: Option<String>,
    pub bank_code: Option<String>,
    pub lc_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub latest_shipment_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    pub partial_shipment: Option<bool>,
    pub transhipment: Option<bool>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LetterOfCreditView {
    #[serde(flatten)]
    pub header: letter_of_credit::Model,
    pub items: Vec<letter_of_credit_item::Model>,
}

#[async_trait]
impl CatalogResource for LettersOfCredit {
    type Entity = letter_of_credit::Entity;
    type Model = letter_of_credit::Model;
    type Column = letter_of_credit::Column;
    type ActiveModel = letter_of_credit::ActiveModel;
    type Create = CreateLetterOfCredit;
    type Update = UpdateLetterOfCredit;
    type View = LetterOfCreditView;

    const LABEL: &'static str = "Letter of Credit";
    const DUPLICATE: &'static str = "Letter of Credit number already exists";
    const DELETE: DeletePolicy = DeletePolicy::HardWhen(&["Open", "Draft"]);
    const DELETE_REFUSED: &'static str = "Only open or draft LCs can be deleted";
    const STATUSES: &'static [&'static str] =
        &["Open", "Amended", "Closed", "Expired", "Cancelled"];

    fn id_column() -> letter_of_credit::Column {
        letter_of_credit::Column::Id
    }

    fn code_column() -> letter_of_credit::Column {
        letter_of_credit::Column::LcNo
    }

    fn status_column() -> Option<letter_of_credit::Column> {
        Some(letter_of_credit::Column::Status)
    }

    fn updated_at_column() -> Option<letter_of_credit::Column> {
        Some(letter_of_credit::Column::UpdatedAt)
    }

    fn code(create: &CreateLetterOfCredit) -> &str {
        &create.lc_no
    }

    fn requested_status(create: &CreateLetterOfCredit) -> Option<&str> {
        create.status.as_deref()
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateLetterOfCredit,
    ) -> Result<(), ServiceError> {
        ensure_supplier(conn, &create.sup_code).await?;
        let codes: Vec<String> = create.items.iter().map(|i| i.raw_code.clone()).collect();
        ensure_raw_materials(conn, codes).await
    }

    async fn validate_update<C: ConnectionTrait>(
        conn: &C,
        update: &UpdateLetterOfCredit,
    ) -> Result<(), ServiceError> {
        if let Some(sup_code) = &update.sup_code {
            ensure_supplier(conn, sup_code).await?;
        }
        check_optional_status(update.status.as_deref(), Self::STATUSES)
    }

    fn new_record(
        create: &CreateLetterOfCredit,
        actor: &str,
        now: NaiveDateTime,
    ) -> letter_of_credit::ActiveModel {
        let mut active = letter_of_credit::ActiveModel {
            currency: Set(create.currency.clone().unwrap_or_else(|| "USD".to_string())),
            partial_shipment: Set(create.partial_shipment.unwrap_or(true)),
            transhipment: Set(create.transhipment.unwrap_or(true)),
            status: Set(create.status.clone().unwrap_or_else(|| "Open".to_string())),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            lc_no, lc_date, sup_code, bank_code, lc_amount, expiry_date, latest_shipment_date,
            payment_terms, delivery_terms, port_of_loading, port_of_discharge, remarks,
        );
        active
    }

    fn apply_update(active: &mut letter_of_credit::ActiveModel, update: UpdateLetterOfCredit) {
        patch_required!(active <- update;
            lc_date, sup_code, lc_amount, currency, partial_shipment, transhipment, status,
        );
        patch_optional!(active <- update;
            bank_code, expiry_date, latest_shipment_date, payment_terms, delivery_terms,
            port_of_loading, port_of_discharge, remarks,
        );
    }

    async fn insert_items<C: ConnectionTrait>(
        conn: &C,
        header: &letter_of_credit::Model,
        create: CreateLetterOfCredit,
    ) -> Result<(), ServiceError> {
        for item in create.items {
            let mut line = letter_of_credit_item::ActiveModel {
                lc_id: Set(header.id),
                tolerance_percentage: Set(item.tolerance_percentage.unwrap_or_default()),
                ..Default::default()
            };
            copy_fields!(line <- item; raw_code, quantity, unit_of_measure, unit_price, amount);
            line.insert(conn).await.map_err(ServiceError::db_error)?;
        }
        Ok(())
    }

    async fn view<C: ConnectionTrait>(
        conn: &C,
        header: letter_of_credit::Model,
    ) -> Result<LetterOfCreditView, ServiceError> {
        let items = letter_of_credit_item::Entity::find()
            .filter(letter_of_credit_item::Column::LcId.eq(header.id))
            .order_by_asc(letter_of_credit_item::Column::Id)
            .all(conn)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(LetterOfCreditView { header, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn unknown_item_material_is_rejected_by_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<raw_material::Model>::new()])
            .into_connection();

        let result = ensure_raw_materials(&db, vec!["R404".to_string()]).await;
        assert_matches!(
            result,
            Err(ServiceError::ValidationError(msg)) if msg == "Raw material R404 not found"
        );
    }

    #[tokio::test]
    async fn document_without_items_needs_no_lookup() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        assert!(ensure_raw_materials(&db, Vec::new()).await.is_ok());
    }

    #[test]
    fn optional_status_accepts_absent_or_known_values() {
        let allowed = PurchaseOrders::STATUSES;
        assert!(check_optional_status(None, allowed).is_ok());
        assert!(check_optional_status(Some("Acknowledged"), allowed).is_ok());
        assert_matches!(
            check_optional_status(Some("Shipped"), allowed),
            Err(ServiceError::ValidationError(msg)) if msg.starts_with("Invalid status")
        );
    }

    #[test]
    fn delete_policies_match_document_lifecycles() {
        assert_eq!(PurchaseRequisitions::DELETE, DeletePolicy::HardWhen(&["Draft"]));
        assert_eq!(LettersOfCredit::DELETE, DeletePolicy::HardWhen(&["Open", "Draft"]));
    }
}
