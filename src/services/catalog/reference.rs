//! Reference data: suppliers, raw materials, products, categories,
//! departments, employees and QC tests. All of them soft delete.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::Deserialize;
use validator::Validate;

use super::{CatalogResource, DeletePolicy};
use crate::{
    entities::{
        department, employee, product, product_category, quality_control_test, raw_material,
        supplier,
    },
    errors::ServiceError,
    services::references::{ensure_category, ensure_department},
};

pub struct Suppliers;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplier {
    #[validate(length(min = 1, max = 10))]
    pub sup_code: String,
    #[validate(length(min = 1, max = 200))]
    pub sup_name: String,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub address_3: Option<String>,
    pub address_4: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub mobile: Option<String>,
    pub country_code: Option<String>,
    pub currency: Option<String>,
    pub payment_terms: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 200))]
    pub sup_name: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub address_3: Option<String>,
    pub address_4: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub mobile: Option<String>,
    pub country_code: Option<String>,
    pub currency: Option<String>,
    pub payment_terms: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for Suppliers {
    type Entity = supplier::Entity;
    type Model = supplier::Model;
    type Column = supplier::Column;
    type ActiveModel = supplier::ActiveModel;
    type Create = CreateSupplier;
    type Update = UpdateSupplier;
    type View = supplier::Model;

    const LABEL: &'static str = "Supplier";
    const DUPLICATE: &'static str = "Supplier code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> supplier::Column {
        supplier::Column::Id
    }

    fn code_column() -> supplier::Column {
        supplier::Column::SupCode
    }

    fn active_column() -> Option<supplier::Column> {
        Some(supplier::Column::IsActive)
    }

    fn updated_at_column() -> Option<supplier::Column> {
        Some(supplier::Column::UpdatedAt)
    }

    fn code(create: &CreateSupplier) -> &str {
        &create.sup_code
    }

    fn new_record(create: &CreateSupplier, actor: &str, now: NaiveDateTime) -> supplier::ActiveModel {
        let mut active = supplier::ActiveModel {
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            sup_code, sup_name, address_1, address_2, address_3, address_4, phone, fax, email,
            website, contact_person, mobile, country_code, currency, payment_terms, credit_limit,
        );
        active
    }

    fn apply_update(active: &mut supplier::ActiveModel, update: UpdateSupplier) {
        patch_required!(active <- update; sup_name, is_active);
        patch_optional!(active <- update;
            address_1, address_2, address_3, address_4, phone, fax, email, website,
            contact_person, mobile, country_code, currency, payment_terms, credit_limit,
        );
    }

    async fn view<C: ConnectionTrait>(_conn: &C, model: supplier::Model) -> Result<supplier::Model, ServiceError> {
        Ok(model)
    }
}

pub struct RawMaterials;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRawMaterial {
    #[validate(length(min = 1, max = 10))]
    pub raw_code: String,
    #[validate(length(min = 1, max = 200))]
    pub raw_name: String,
    pub raw_desc: Option<String>,
    pub raw_type: Option<String>,
    pub raw_grade: Option<String>,
    pub form_type: Option<String>,
    pub spec_group: Option<String>,
    pub unit_of_measure: Option<String>,
    pub shelf_life_months: Option<i32>,
    pub storage_condition: Option<String>,
    pub cas_number: Option<String>,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<Decimal>,
    pub hs_code: Option<String>,
    /// C current, I inactive, N new
    #[validate(length(equal = 1))]
    pub raw_stat: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRawMaterial {
    #[validate(length(min = 1, max = 200))]
    pub raw_name: Option<String>,
    pub raw_desc: Option<String>,
    pub raw_type: Option<String>,
    pub raw_grade: Option<String>,
    pub form_type: Option<String>,
    pub spec_group: Option<String>,
    pub unit_of_measure: Option<String>,
    pub shelf_life_months: Option<i32>,
    pub storage_condition: Option<String>,
    pub cas_number: Option<String>,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<Decimal>,
    pub hs_code: Option<String>,
    #[validate(length(equal = 1))]
    pub raw_stat: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for RawMaterials {
    type Entity = raw_material::Entity;
    type Model = raw_material::Model;
    type Column = raw_material::Column;
    type ActiveModel = raw_material::ActiveModel;
    type Create = CreateRawMaterial;
    type Update = UpdateRawMaterial;
    type View = raw_material::Model;

    const LABEL: &'static str = "Raw material";
    const DUPLICATE: &'static str = "Raw material code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> raw_material::Column {
        raw_material::Column::Id
    }

    fn code_column() -> raw_material::Column {
        raw_material::Column::RawCode
    }

    fn active_column() -> Option<raw_material::Column> {
        Some(raw_material::Column::IsActive)
    }

    fn updated_at_column() -> Option<raw_material::Column> {
        Some(raw_material::Column::UpdatedAt)
    }

    fn code(create: &CreateRawMaterial) -> &str {
        &create.raw_code
    }

    fn new_record(
        create: &CreateRawMaterial,
        actor: &str,
        now: NaiveDateTime,
    ) -> raw_material::ActiveModel {
        let mut active = raw_material::ActiveModel {
            raw_stat: Set(create.raw_stat.clone().unwrap_or_else(|| "C".to_string())),
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            raw_code, raw_name, raw_desc, raw_type, raw_grade, form_type, spec_group,
            unit_of_measure, shelf_life_months, storage_condition, cas_number,
            molecular_formula, molecular_weight, hs_code,
        );
        active
    }

    fn apply_update(active: &mut raw_material::ActiveModel, update: UpdateRawMaterial) {
        patch_required!(active <- update; raw_name, raw_stat, is_active);
        patch_optional!(active <- update;
            raw_desc, raw_type, raw_grade, form_type, spec_group, unit_of_measure,
            shelf_life_months, storage_condition, cas_number, molecular_formula,
            molecular_weight, hs_code,
        );
    }

    async fn view<C: ConnectionTrait>(
        _conn: &C,
        model: raw_material::Model,
    ) -> Result<raw_material::Model, ServiceError> {
        Ok(model)
    }
}

pub struct Products;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 5))]
    pub product_code: String,
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    pub product_desc: Option<String>,
    #[validate(length(min = 1, max = 10))]
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
    #[validate(length(equal = 1))]
    pub prod_stat: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub product_name: Option<String>,
    pub product_desc: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub pcat_code: Option<String>,
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
    #[validate(length(equal = 1))]
    pub prod_stat: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for Products {
    type Entity = product::Entity;
    type Model = product::Model;
    type Column = product::Column;
    type ActiveModel = product::ActiveModel;
    type Create = CreateProduct;
    type Update = UpdateProduct;
    type View = product::Model;

    const LABEL: &'static str = "Product";
    const DUPLICATE: &'static str = "Product code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> product::Column {
        product::Column::Id
    }

    fn code_column() -> product::Column {
        product::Column::ProductCode
    }

    fn active_column() -> Option<product::Column> {
        Some(product::Column::IsActive)
    }

    fn updated_at_column() -> Option<product::Column> {
        Some(product::Column::UpdatedAt)
    }

    fn code(create: &CreateProduct) -> &str {
        &create.product_code
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateProduct,
    ) -> Result<(), ServiceError> {
        ensure_category(conn, &create.pcat_code).await.map(|_| ())
    }

    async fn validate_update<C: ConnectionTrait>(
        conn: &C,
        update: &UpdateProduct,
    ) -> Result<(), ServiceError> {
        if let Some(pcat_code) = &update.pcat_code {
            ensure_category(conn, pcat_code).await?;
        }
        Ok(())
    }

    fn new_record(create: &CreateProduct, actor: &str, now: NaiveDateTime) -> product::ActiveModel {
        let mut active = product::ActiveModel {
            prod_stat: Set(create.prod_stat.clone().unwrap_or_else(|| "C".to_string())),
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            product_code, product_name, product_desc, pcat_code, dosage_form, strength,
            pack_size, pack_size1, pack_size2, ptype_desc, generic_name, therapeutic_class,
            drug_category, shelf_life_months, storage_condition, pack_type, mrp, trade_price,
        );
        active
    }

    fn apply_update(active: &mut product::ActiveModel, update: UpdateProduct) {
        patch_required!(active <- update; product_name, pcat_code, prod_stat, is_active);
        patch_optional!(active <- update;
            product_desc, dosage_form, strength, pack_size, pack_size1, pack_size2, ptype_desc,
            generic_name, therapeutic_class, drug_category, shelf_life_months,
            storage_condition, pack_type, mrp, trade_price,
        );
    }

    async fn view<C: ConnectionTrait>(_conn: &C, model: product::Model) -> Result<product::Model, ServiceError> {
        Ok(model)
    }
}

pub struct ProductCategories;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductCategory {
    #[validate(length(min = 1, max = 10))]
    pub pcat_code: String,
    #[validate(length(min = 1, max = 100))]
    pub pcat_name: String,
    pub pcat_desc: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductCategory {
    #[validate(length(min = 1, max = 100))]
    pub pcat_name: Option<String>,
    pub pcat_desc: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for ProductCategories {
    type Entity = product_category::Entity;
    type Model = product_category::Model;
    type Column = product_category::Column;
    type ActiveModel = product_category::ActiveModel;
    type Create = CreateProductCategory;
    type Update = UpdateProductCategory;
    type View = product_category::Model;

    const LABEL: &'static str = "Product category";
    const DUPLICATE: &'static str = "Product category with this code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> product_category::Column {
        product_category::Column::Id
    }

    fn code_column() -> product_category::Column {
        product_category::Column::PcatCode
    }

    fn active_column() -> Option<product_category::Column> {
        Some(product_category::Column::IsActive)
    }

    fn updated_at_column() -> Option<product_category::Column> {
        Some(product_category::Column::UpdatedAt)
    }

    fn code(create: &CreateProductCategory) -> &str {
        &create.pcat_code
    }

    fn new_record(
        create: &CreateProductCategory,
        actor: &str,
        now: NaiveDateTime,
    ) -> product_category::ActiveModel {
        let mut active = product_category::ActiveModel {
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create; pcat_code, pcat_name, pcat_desc);
        active
    }

    fn apply_update(active: &mut product_category::ActiveModel, update: UpdateProductCategory) {
        patch_required!(active <- update; pcat_name, is_active);
        patch_optional!(active <- update; pcat_desc);
    }

    async fn view<C: ConnectionTrait>(
        _conn: &C,
        model: product_category::Model,
    ) -> Result<product_category::Model, ServiceError> {
        Ok(model)
    }
}

pub struct Departments;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 10))]
    pub dept_code: String,
    #[validate(length(min = 1, max = 100))]
    pub dept_name: String,
    pub dept_desc: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDepartment {
    #[validate(length(min = 1, max = 100))]
    pub dept_name: Option<String>,
    pub dept_desc: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for Departments {
    type Entity = department::Entity;
    type Model = department::Model;
    type Column = department::Column;
    type ActiveModel = department::ActiveModel;
    type Create = CreateDepartment;
    type Update = UpdateDepartment;
    type View = department::Model;

    const LABEL: &'static str = "Department";
    const DUPLICATE: &'static str = "Department with this code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> department::Column {
        department::Column::Id
    }

    fn code_column() -> department::Column {
        department::Column::DeptCode
    }

    fn active_column() -> Option<department::Column> {
        Some(department::Column::IsActive)
    }

    fn code(create: &CreateDepartment) -> &str {
        &create.dept_code
    }

    fn new_record(
        create: &CreateDepartment,
        actor: &str,
        now: NaiveDateTime,
    ) -> department::ActiveModel {
        let mut active = department::ActiveModel {
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create; dept_code, dept_name, dept_desc);
        active
    }

    fn apply_update(active: &mut department::ActiveModel, update: UpdateDepartment) {
        patch_required!(active <- update; dept_name, is_active);
        patch_optional!(active <- update; dept_desc);
    }

    async fn view<C: ConnectionTrait>(
        _conn: &C,
        model: department::Model,
    ) -> Result<department::Model, ServiceError> {
        Ok(model)
    }
}

pub struct Employees;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 10))]
    pub emp_code: String,
    #[validate(length(min = 1, max = 100))]
    pub emp_office_name: String,
    #[validate(length(min = 1, max = 10))]
    pub dept_code: String,
    pub job_category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 100))]
    pub emp_office_name: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub dept_code: Option<String>,
    pub job_category: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for Employees {
    type Entity = employee::Entity;
    type Model = employee::Model;
    type Column = employee::Column;
    type ActiveModel = employee::ActiveModel;
    type Create = CreateEmployee;
    type Update = UpdateEmployee;
    type View = employee::Model;

    const LABEL: &'static str = "Employee";
    const DUPLICATE: &'static str = "Employee with this code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> employee::Column {
        employee::Column::Id
    }

    fn code_column() -> employee::Column {
        employee::Column::EmpCode
    }

    fn active_column() -> Option<employee::Column> {
        Some(employee::Column::IsActive)
    }

    fn code(create: &CreateEmployee) -> &str {
        &create.emp_code
    }

    async fn validate_create<C: ConnectionTrait>(
        conn: &C,
        create: &CreateEmployee,
    ) -> Result<(), ServiceError> {
        ensure_department(conn, &create.dept_code).await.map(|_| ())
    }

    async fn validate_update<C: ConnectionTrait>(
        conn: &C,
        update: &UpdateEmployee,
    ) -> Result<(), ServiceError> {
        if let Some(dept_code) = &update.dept_code {
            ensure_department(conn, dept_code).await?;
        }
        Ok(())
    }

    fn new_record(create: &CreateEmployee, actor: &str, now: NaiveDateTime) -> employee::ActiveModel {
        let mut active = employee::ActiveModel {
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create; emp_code, emp_office_name, dept_code, job_category);
        active
    }

    fn apply_update(active: &mut employee::ActiveModel, update: UpdateEmployee) {
        patch_required!(active <- update; emp_office_name, dept_code, is_active);
        patch_optional!(active <- update; job_category);
    }

    async fn view<C: ConnectionTrait>(_conn: &C, model: employee::Model) -> Result<employee::Model, ServiceError> {
        Ok(model)
    }
}

pub struct QcTests;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQcTest {
    #[validate(length(min = 1, max = 20))]
    pub test_code: String,
    #[validate(length(min = 1, max = 200))]
    pub test_name: String,
    pub test_category: Option<String>,
    pub test_method: Option<String>,
    pub specification: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQcTest {
    #[validate(length(min = 1, max = 200))]
    pub test_name: Option<String>,
    pub test_category: Option<String>,
    pub test_method: Option<String>,
    pub specification: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl CatalogResource for QcTests {
    type Entity = quality_control_test::Entity;
    type Model = quality_control_test::Model;
    type Column = quality_control_test::Column;
    type ActiveModel = quality_control_test::ActiveModel;
    type Create = CreateQcTest;
    type Update = UpdateQcTest;
    type View = quality_control_test::Model;

    const LABEL: &'static str = "QC test";
    const DUPLICATE: &'static str = "QC test code already exists";
    const DELETE: DeletePolicy = DeletePolicy::Soft;

    fn id_column() -> quality_control_test::Column {
        quality_control_test::Column::Id
    }

    fn code_column() -> quality_control_test::Column {
        quality_control_test::Column::TestCode
    }

    fn active_column() -> Option<quality_control_test::Column> {
        Some(quality_control_test::Column::IsActive)
    }

    fn updated_at_column() -> Option<quality_control_test::Column> {
        Some(quality_control_test::Column::UpdatedAt)
    }

    fn code(create: &CreateQcTest) -> &str {
        &create.test_code
    }

    fn new_record(
        create: &CreateQcTest,
        actor: &str,
        now: NaiveDateTime,
    ) -> quality_control_test::ActiveModel {
        let mut active = quality_control_test::ActiveModel {
            is_active: Set(create.is_active.unwrap_or(true)),
            created_by: Set(Some(actor.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copy_fields!(active <- create;
            test_code, test_name, test_category, test_method, specification, acceptance_criteria,
        );
        active
    }

    fn apply_update(active: &mut quality_control_test::ActiveModel, update: UpdateQcTest) {
        patch_required!(active <- update; test_name, is_active);
        patch_optional!(active <- update;
            test_category, test_method, specification, acceptance_criteria,
        );
    }

    async fn view<C: ConnectionTrait>(
        _conn: &C,
        model: quality_control_test::Model,
    ) -> Result<quality_control_test::Model, ServiceError> {
        Ok(model)
    }
}
