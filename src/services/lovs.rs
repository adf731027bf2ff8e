//! Lists of values feeding the BOM entry screens.

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    config::AppConfig,
    db::DbPool,
    entities::{bom, department, employee, product, product_category, raw_material},
    errors::ServiceError,
};

/// Product statuses offered in LOVs: current and inactive.
const LISTED_PRODUCT_STATUSES: [&str; 2] = ["C", "I"];

/// Filters applied by the LOV queries
#[derive(Debug, Clone)]
pub struct LovSettings {
    pub employee_departments: Vec<String>,
    pub excluded_job_category: String,
    pub excluded_product_categories: Vec<String>,
}

impl From<&AppConfig> for LovSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            employee_departments: config.lov_employee_departments.clone(),
            excluded_job_category: config.lov_excluded_job_category.clone(),
            excluded_product_categories: config.lov_excluded_product_categories.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductLov {
    pub p_desc: String,
    pub p_code: String,
    pub pack_size: Option<String>,
    /// "A X B" when both pack sizes are known, otherwise empty
    pub pack: String,
    pub ptype_desc: Option<String>,
    pub pcat_code: String,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
}

impl From<product::Model> for ProductLov {
    fn from(p: product::Model) -> Self {
        let pack = match (&p.pack_size1, &p.pack_size2) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => format!("{} X {}", a, b),
            _ => String::new(),
        };
        Self {
            p_desc: p.product_name,
            p_code: p.product_code,
            pack_size: p.pack_size,
            pack,
            ptype_desc: p.ptype_desc,
            pcat_code: p.pcat_code,
            dosage_form: p.dosage_form,
            strength: p.strength,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductWithBomLov {
    #[serde(flatten)]
    pub product: ProductLov,
    pub current_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RawMaterialLov {
    pub raw_code: String,
    pub raw_desc: String,
    pub raw_grade: Option<String>,
    pub raw_type: Option<String>,
    pub unit_of_measure: Option<String>,
    pub molecular_weight: Option<rust_decimal::Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeLov {
    pub emp_office_name: String,
    pub emp_code: String,
    pub dept_desc: Option<String>,
    pub dept_code: String,
    pub job_category: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryLov {
    pub pcat_code: String,
    pub pcat_name: String,
    pub pcat_desc: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DepartmentLov {
    pub dept_code: String,
    pub dept_name: String,
}

/// Highest version label per product. Labels compare as strings, so "001A" > "001".
fn latest_versions(rows: Vec<(String, String)>) -> HashMap<String, String> {
    let mut latest: HashMap<String, String> = HashMap::new();
    for (product_code, version_no) in rows {
        match latest.get(&product_code) {
            Some(current) if current >= &version_no => {}
            _ => {
                latest.insert(product_code, version_no);
            }
        }
    }
    latest
}

#[derive(Clone)]
pub struct LovService {
    db: Arc<DbPool>,
    settings: LovSettings,
}

impl LovService {
    pub fn new(db: Arc<DbPool>, settings: LovSettings) -> Self {
        Self { db, settings }
    }

    fn listed_products(&self, pcat_code: Option<&str>) -> sea_orm::Select<product::Entity> {
        product::Entity::find()
            .filter(product::Column::ProdStat.is_in(LISTED_PRODUCT_STATUSES))
            .filter(product::Column::IsActive.eq(true))
            .apply_if(pcat_code, |query, code| {
                query.filter(product::Column::PcatCode.eq(code))
            })
            .order_by_asc(product::Column::ProductName)
    }

    /// Products eligible for a first BOM: no BOM yet, category not excluded.
    #[instrument(skip(self))]
    pub async fn products(&self, pcat_code: Option<&str>) -> Result<Vec<ProductLov>, ServiceError> {
        let with_bom = bom::Entity::find()
            .select_only()
            .column(bom::Column::ProductCode)
            .into_query();

        let products = self
            .listed_products(pcat_code)
            .filter(product::Column::ProductCode.not_in_subquery(with_bom))
            .filter(
                product::Column::PcatCode
                    .is_not_in(self.settings.excluded_product_categories.iter().cloned()),
            )
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(products.into_iter().map(ProductLov::from).collect())
    }

    /// Products that already have a BOM, with their latest version label.
    #[instrument(skip(self))]
    pub async fn products_with_bom(
        &self,
        pcat_code: Option<&str>,
    ) -> Result<Vec<ProductWithBomLov>, ServiceError> {
        let db = &*self.db;
        let with_bom = bom::Entity::find()
            .select_only()
            .column(bom::Column::ProductCode)
            .into_query();

        let products = self
            .listed_products(pcat_code)
            .filter(product::Column::ProductCode.in_subquery(with_bom))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let versions: Vec<(String, String)> = bom::Entity::find()
            .select_only()
            .column(bom::Column::ProductCode)
            .column(bom::Column::VersionNo)
            .filter(
                bom::Column::ProductCode.is_in(products.iter().map(|p| p.product_code.clone())),
            )
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let mut latest = latest_versions(versions);

        Ok(products
            .into_iter()
            .map(|p| {
                let current_version = latest.remove(&p.product_code);
                ProductWithBomLov {
                    product: ProductLov::from(p),
                    current_version,
                }
            })
            .collect())
    }

    /// Current raw materials; names flagged with `**` are withdrawn items.
    #[instrument(skip(self))]
    pub async fn raw_materials(&self) -> Result<Vec<RawMaterialLov>, ServiceError> {
        let rows = raw_material::Entity::find()
            .filter(raw_material::Column::RawName.not_like("%**%"))
            .filter(raw_material::Column::RawStat.eq("C"))
            .filter(raw_material::Column::IsActive.eq(true))
            .order_by_asc(raw_material::Column::RawName)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|r| RawMaterialLov {
                raw_code: r.raw_code,
                raw_desc: r.raw_name,
                raw_grade: r.raw_grade,
                raw_type: r.raw_type,
                unit_of_measure: r.unit_of_measure,
                molecular_weight: r.molecular_weight,
            })
            .collect())
    }

    /// Employees who may sign BOM workflow steps. A missing job category
    /// is not treated as the excluded one.
    #[instrument(skip(self))]
    pub async fn employees(&self) -> Result<Vec<EmployeeLov>, ServiceError> {
        let rows = employee::Entity::find()
            .find_also_related(department::Entity)
            .filter(employee::Column::IsActive.eq(true))
            .filter(employee::Column::DeptCode.is_in(self.settings.employee_departments.iter().cloned()))
            .filter(department::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(employee::Column::JobCategory.is_null())
                    .add(employee::Column::JobCategory.ne(self.settings.excluded_job_category.as_str())),
            )
            .order_by_asc(employee::Column::EmpOfficeName)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|(emp, dept)| EmployeeLov {
                emp_office_name: emp.emp_office_name,
                emp_code: emp.emp_code,
                dept_desc: dept.map(|d| d.dept_name),
                dept_code: emp.dept_code,
                job_category: emp.job_category,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn product_categories(&self) -> Result<Vec<CategoryLov>, ServiceError> {
        let rows = product_category::Entity::find()
            .filter(product_category::Column::IsActive.eq(true))
            .order_by_asc(product_category::Column::PcatName)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|c| CategoryLov {
                pcat_code: c.pcat_code,
                pcat_name: c.pcat_name,
                pcat_desc: c.pcat_desc,
            })
            .collect())
    }

    /// Active departments; `bom_only` keeps the BOM signing departments.
    #[instrument(skip(self))]
    pub async fn departments(&self, bom_only: bool) -> Result<Vec<DepartmentLov>, ServiceError> {
        let rows = department::Entity::find()
            .filter(department::Column::IsActive.eq(true))
            .apply_if(bom_only.then_some(()), |query, _| {
                query.filter(
                    department::Column::DeptCode
                        .is_in(self.settings.employee_departments.iter().cloned()),
                )
            })
            .order_by_asc(department::Column::DeptName)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|d| DepartmentLov {
                dept_code: d.dept_code,
                dept_name: d.dept_name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(pack1: Option<&str>, pack2: Option<&str>) -> product::Model {
        let now = Utc::now().naive_utc();
        product::Model {
            id: 1,
            product_code: "P0001".into(),
            product_name: "Paracetamol 500".into(),
            product_desc: None,
            pcat_code: "TAB".into(),
            dosage_form: Some("Tablet".into()),
            strength: Some("500 mg".into()),
            pack_size: Some("10x10".into()),
            pack_size1: pack1.map(Into::into),
            pack_size2: pack2.map(Into::into),
            ptype_desc: None,
            generic_name: None,
            therapeutic_class: None,
            drug_category: None,
            shelf_life_months: None,
            storage_condition: None,
            pack_type: None,
            mrp: None,
            trade_price: None,
            prod_stat: "C".into(),
            is_active: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pack_is_joined_only_when_both_sizes_exist() {
        assert_eq!(ProductLov::from(product(Some("10"), Some("10"))).pack, "10 X 10");
        assert_eq!(ProductLov::from(product(Some("10"), None)).pack, "");
    }

    #[test]
    fn latest_version_uses_string_order() {
        let latest = latest_versions(vec![
            ("P1".into(), "001".into()),
            ("P1".into(), "001A".into()),
            ("P2".into(), "003".into()),
            ("P1".into(), "000".into()),
        ]);
        assert_eq!(latest.get("P1").map(String::as_str), Some("001A"));
        assert_eq!(latest.get("P2").map(String::as_str), Some("003"));
    }
}
