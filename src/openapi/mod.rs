use axum::{routing::get, Json, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pharma ERP API",
        version = "0.1.0",
        description = r#"
# Pharma ERP API

Backend for pharmaceutical manufacturing records.

## Features

- **Bills of Materials**: master and detail lines per product and version
- **Workflow**: approval followed by authorization, each stamped with an employee code
- **History**: append-only snapshots with a per-product serial number
- **Material Requirements**: raw-material quantities scaled to any production quantity
- **Catalogs**: suppliers, raw materials, products, employees, procurement documents
- **LOVs**: filtered value lists for data-entry screens

## Authentication

Every `/api` endpoint requires a bearer token:

```
Authorization: Bearer <your-jwt-token>
```

## Pagination

List endpoints accept `skip` and `limit` and return `{ "data": [...], "pagination": { "skip", "limit", "total" } }`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "bom", description = "Bill of materials endpoints"),
        (name = "lovs", description = "Value lists for data entry"),
        (name = "production", description = "Production planning endpoints")
    ),
    paths(
        // BOM
        crate::handlers::bom::list_boms,
        crate::handlers::bom::get_bom,
        crate::handlers::bom::list_boms_by_product,
        crate::handlers::bom::create_bom,
        crate::handlers::bom::update_bom,
        crate::handlers::bom::delete_bom,
        crate::handlers::bom::material_requirements,
        crate::handlers::bom::approve_bom,
        crate::handlers::bom::authorize_bom,
        crate::handlers::bom::create_history,
        crate::handlers::bom::update_version,
        crate::handlers::bom::list_history,
        crate::handlers::bom::get_history,

        // LOVs
        crate::handlers::lovs::products,
        crate::handlers::lovs::products_with_bom,
        crate::handlers::lovs::raw_materials,
        crate::handlers::lovs::employees,
        crate::handlers::lovs::product_categories,
        crate::handlers::lovs::departments,

        // Production
        crate::handlers::production::batch_calculation,
    ),
    components(
        schemas(
            crate::entities::bom::Model,
            crate::entities::bom_detail::Model,
            crate::entities::bom_history_master::Model,
            crate::entities::bom_history_detail::Model,
            crate::services::bom::BomView,
            crate::services::bom::WorkflowState,
            crate::services::bom::CreateBomRequest,
            crate::services::bom::UpdateBomRequest,
            crate::services::bom::BomDetailInput,
            crate::services::bom_history::HistorySnapshot,
            crate::services::requirements::MaterialRequirements,
            crate::services::requirements::MaterialRequirement,
            crate::services::production::BatchCalculation,
            crate::handlers::common::MessageResponse,
            crate::handlers::common::PaginationMeta,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Serves the generated document at `/api-docs/openapi.json`
pub fn openapi_routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
