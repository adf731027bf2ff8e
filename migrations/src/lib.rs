pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_reference_tables;
mod m20250301_000002_create_bom_tables;
mod m20250301_000003_create_procurement_tables;
mod m20250301_000004_create_operations_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference_tables::Migration),
            Box::new(m20250301_000002_create_bom_tables::Migration),
            Box::new(m20250301_000003_create_procurement_tables::Migration),
            Box::new(m20250301_000004_create_operations_tables::Migration),
        ]
    }
}
