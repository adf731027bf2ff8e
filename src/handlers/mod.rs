pub mod bom;
pub mod catalog;
pub mod common;
pub mod lovs;
pub mod production;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        lovs::LovSettings, BomHistoryService, BomService, CatalogService, LovService,
        ProductionService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub bom: Arc<BomService>,
    pub bom_history: Arc<BomHistoryService>,
    pub catalog: Arc<CatalogService>,
    pub lovs: Arc<LovService>,
    pub production: Arc<ProductionService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            bom: Arc::new(BomService::new(db_pool.clone())),
            bom_history: Arc::new(BomHistoryService::new(db_pool.clone())),
            catalog: Arc::new(CatalogService::new(db_pool.clone())),
            lovs: Arc::new(LovService::new(db_pool.clone(), LovSettings::from(config))),
            production: Arc::new(ProductionService::new(db_pool)),
        }
    }
}
