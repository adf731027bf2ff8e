//! Business services. Each service owns an `Arc<DbPool>` and returns
//! `ServiceError`; handlers never touch entities directly.

/// Assigns `Set(source.field.clone())` for every listed field.
macro_rules! copy_fields {
    ($target:ident <- $source:ident; $($field:ident),+ $(,)?) => {
        $( $target.$field = sea_orm::ActiveValue::Set($source.$field.clone()); )+
    };
}

/// Assigns `Set(Some(value))` for every listed `Option` field that is present.
macro_rules! patch_optional {
    ($target:ident <- $source:ident; $($field:ident),+ $(,)?) => {
        $( if let Some(value) = $source.$field { $target.$field = sea_orm::ActiveValue::Set(Some(value)); } )+
    };
}

/// Assigns `Set(value)` for every listed field that is present.
macro_rules! patch_required {
    ($target:ident <- $source:ident; $($field:ident),+ $(,)?) => {
        $( if let Some(value) = $source.$field { $target.$field = sea_orm::ActiveValue::Set(value); } )+
    };
}

pub mod bom;
pub mod bom_history;
pub mod catalog;
pub mod lovs;
pub mod production;
pub mod references;
pub mod requirements;

pub use bom::BomService;
pub use bom_history::BomHistoryService;
pub use catalog::CatalogService;
pub use lovs::LovService;
pub use production::ProductionService;
