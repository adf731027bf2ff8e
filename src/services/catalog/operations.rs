//! Production plans and drug registrations; both reference a product.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::Deserialize;
use validator::Validate;

use super::{invalid_status, CatalogResource, DeletePolicy};
use crate::{
    entities::{drug_registration, production_plan},
    errors::ServiceError,
    services::references::ensure_product,
};

pub struct ProductionPlans;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductionPlan {
    #[validate(length(min = 1, max = 20))]
    pub plan_no: String,
    pub plan_date: NaiveDate,
    #[validate(length(min = 1, max = 5))]
    pub product_code: String,
    pub planned_quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub planned_start_date: Option<NaiveDate>,
    pub planned_end_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub batch_size: Option<Decimal>,
    #[validate(range(min = 0))]
    pub number_of_batches: Option<i32>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductionPlan {
    pub plan_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 5))]
    pub product_code: Option<String>,
    pub planned_quantity: Option<Decimal>,
    pub unit_of_measure: Option<String>,
    pub planned_start_date: Option<NaiveDate>,
    pub planned_end_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub batch_size: Option<Decimal>,
    #[validate(range(min = 0))]
    pub number_of_batches: Option<i32>,
    pub remarks: Option<String>,
}

#[async_trait]
impl CatalogResource for ProductionPlans {
    type Entity = production_plan::Entity;
    type Model = production_plan::Model;
    type Column = production_plan::Column;
    type ActiveModel = production_plan::ActiveModel;
    type Create = CreateProductionPlan;
    type Update = UpdateProductionPlan;
    type View = production_plan::Model;

    const LABEL: &'static str = "Production plan";
    const DUPLICATE: &'static str = "Production plan number already exists";
    const DELETE: DeletePolicy = DeletePolicy::HardWhen(&["Planned", "Cancelled"]);
    const DELETE_REFUSED: &'static str =
        "Only planned or cancelled production plans can be deleted";
    const STATUSES: &'static [&'static str] =
        &["Planned", "In Progress", "Completed", "Cancelled", "On Hold"];

    fn id_column() -> production_plan::Column {
        production_plan::Column::Id
    }

    fn code_column() -> production_plan::Column {
        production_plan::Column::PlanNo
    }

    fn status_column() -> Option<production_plan::Column> {
        Some(production_plan::Column::Status)
    }

    fn updated_at_column() -> Option<production_plan::Column> {
        Some(production_plan::Column::UpdatedAt)
    }

    fn code(create: &CreateProductionPlan) -> &str {
        &create.plan_no
    }

    fn requested_status(create: &CreateProductionPlan) -> Option<&str> {
        create.status.as_deref()
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateProductionPlan,
    ) -> Result<(), ServiceError> {
        ensure_product(conn, &create.product_code).await.map(|_| ())
    }

    async fn validate_update<C: ConnectionTrait>(
        conn: &C,
        update: &UpdateProductionPlan,
    ) -> Result<(), ServiceError> {
        if let Some(product_code) = &update.product_code {
            ensure_product(conn, product_code).await?;
        }
        match update.status.as_deref() {
            Some(status) if !Self::STATUSES.contains(&status) => {
                Err(invalid_status(Self::STATUSES))
            }
            _ => Ok(()),
        }
    }

    fn new_record(
        create: &CreateProductionPlan,
        actor: &str,
        now: NaiveDateTime,
    ) -> production_plan::ActiveModel {
        let mut active = production_plan::ActiveModel {
            priority: Set(create.priority.clone().unwrap_or_else(|| "Normal".to_string())),
            status: Set(create.status.clone().unwrap_or_else(|| "Planned".to_string())),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            plan_no, plan_date, product_code, planned_quantity, unit_of_measure,
            planned_start_date, planned_end_date, batch_size, number_of_batches, remarks,
        );
        active
    }

    fn apply_update(active: &mut production_plan::ActiveModel, update: UpdateProductionPlan) {
        patch_required!(active <- update;
            plan_date, product_code, planned_quantity, priority, status,
        );
        patch_optional!(active <- update;
            unit_of_measure, planned_start_date, planned_end_date, batch_size,
            number_of_batches, remarks,
        );
    }

    async fn view<C: ConnectionTrait>(
        _conn: &C,
        model: production_plan::Model,
    ) -> Result<production_plan::Model, ServiceError> {
        Ok(model)
    }
}

pub struct DrugRegistrations;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDrugRegistration {
    #[validate(length(min = 1, max = 50))]
    pub drug_letter_ref_no: String,
    pub drug_letter_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 5))]
    pub product_code: String,
    pub registration_type: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub approval_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub status: Option<String>,
    pub regulatory_authority: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDrugRegistration {
    pub drug_letter_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 5))]
    pub product_code: Option<String>,
    pub registration_type: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub approval_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub status: Option<String>,
    pub regulatory_authority: Option<String>,
    pub remarks: Option<String>,
}

#[async_trait]
impl CatalogResource for DrugRegistrations {
    type Entity = drug_registration::Entity;
    type Model = drug_registration::Model;
    type Column = drug_registration::Column;
    type ActiveModel = drug_registration::ActiveModel;
    type Create = CreateDrugRegistration;
    type Update = UpdateDrugRegistration;
    type View = drug_registration::Model;

    const LABEL: &'static str = "Drug registration";
    const DUPLICATE: &'static str = "Drug letter reference number already exists";
    const DELETE: DeletePolicy = DeletePolicy::Hard;
    const STATUSES: &'static [&'static str] = &[
        "Applied",
        "Under Review",
        "Approved",
        "Rejected",
        "Expired",
        "Cancelled",
    ];

    fn id_column() -> drug_registration::Column {
        drug_registration::Column::Id
    }

    fn code_column() -> drug_registration::Column {
        drug_registration::Column::DrugLetterRefNo
    }

    fn status_column() -> Option<drug_registration::Column> {
        Some(drug_registration::Column::Status)
    }

    fn updated_at_column() -> Option<drug_registration::Column> {
        Some(drug_registration::Column::UpdatedAt)
    }

    fn code(create: &CreateDrugRegistration) -> &str {
        &create.drug_letter_ref_no
    }

    fn requested_status(create: &CreateDrugRegistration) -> Option<&str> {
        create.status.as_deref()
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateDrugRegistration,
    ) -> Result<(), ServiceError> {
        ensure_product(conn, &create.product_code).await.map(|_| ())
    }

    async fn validate_update<C: ConnectionTrait>(
        conn: &C,
        update: &UpdateDrugRegistration,
    ) -> Result<(), ServiceError> {
        if let Some(product_code) = &update.product_code {
            ensure_product(conn, product_code).await?;
        }
        match update.status.as_deref() {
            Some(status) if !Self::STATUSES.contains(&status) => {
                Err(invalid_status(Self::STATUSES))
            }
            _ => Ok(()),
        }
    }

    fn new_record(
        create: &CreateDrugRegistration,
        actor: &str,
        now: NaiveDateTime,
    ) -> drug_registration::ActiveModel {
        let mut active = drug_registration::ActiveModel {
            status: Set(create.status.clone().unwrap_or_else(|| "Applied".to_string())),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            drug_letter_ref_no, drug_letter_date, product_code, registration_type,
            application_date, approval_date, expiry_date, registration_number,
            regulatory_authority, remarks,
        );
        active
    }

    fn apply_update(active: &mut drug_registration::ActiveModel, update: UpdateDrugRegistration) {
        patch_required!(active <- update; product_code, status);
        patch_optional!(active <- update;
            drug_letter_date, registration_type, application_date, approval_date,
            expiry_date, registration_number, regulatory_authority, remarks,
        );
    }

    async fn view<C: ConnectionTrait>(
        _conn: &C,
        model: drug_registration::Model,
    ) -> Result<drug_registration::Model, ServiceError> {
        Ok(model)
    }
}
