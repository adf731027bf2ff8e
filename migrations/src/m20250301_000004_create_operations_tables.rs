use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_reference_tables::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductionPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionPlans::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductionPlans::PlanNo)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProductionPlans::PlanDate).date().not_null())
                    .col(ColumnDef::new(ProductionPlans::ProductCode).string_len(5).not_null())
                    .col(
                        ColumnDef::new(ProductionPlans::PlannedQuantity)
                            .decimal_len(12, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductionPlans::UnitOfMeasure).string_len(5).null())
                    .col(ColumnDef::new(ProductionPlans::PlannedStartDate).date().null())
                    .col(ColumnDef::new(ProductionPlans::PlannedEndDate).date().null())
                    .col(
                        ColumnDef::new(ProductionPlans::Priority)
                            .string_len(10)
                            .not_null()
                            .default("Normal"),
                    )
                    .col(
                        ColumnDef::new(ProductionPlans::Status)
                            .string_len(20)
                            .not_null()
                            .default("Planned"),
                    )
                    .col(ColumnDef::new(ProductionPlans::BatchSize).decimal_len(12, 4).null())
                    .col(ColumnDef::new(ProductionPlans::NumberOfBatches).integer().null())
                    .col(ColumnDef::new(ProductionPlans::Remarks).text().null())
                    .col(ColumnDef::new(ProductionPlans::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(ProductionPlans::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProductionPlans::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_plans_product_code")
                            .from(ProductionPlans::Table, ProductionPlans::ProductCode)
                            .to(Products::Table, Products::ProductCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DrugRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrugRegistrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DrugRegistrations::DrugLetterRefNo)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DrugRegistrations::DrugLetterDate).date().null())
                    .col(ColumnDef::new(DrugRegistrations::ProductCode).string_len(5).not_null())
                    .col(ColumnDef::new(DrugRegistrations::RegistrationType).string_len(20).null())
                    .col(ColumnDef::new(DrugRegistrations::ApplicationDate).date().null())
                    .col(ColumnDef::new(DrugRegistrations::ApprovalDate).date().null())
                    .col(ColumnDef::new(DrugRegistrations::ExpiryDate).date().null())
                    .col(
                        ColumnDef::new(DrugRegistrations::RegistrationNumber)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DrugRegistrations::Status)
                            .string_len(20)
                            .not_null()
                            .default("Applied"),
                    )
                    .col(
                        ColumnDef::new(DrugRegistrations::RegulatoryAuthority)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(DrugRegistrations::Remarks).text().null())
                    .col(ColumnDef::new(DrugRegistrations::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(DrugRegistrations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DrugRegistrations::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drug_registrations_product_code")
                            .from(DrugRegistrations::Table, DrugRegistrations::ProductCode)
                            .to(Products::Table, Products::ProductCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QcTests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QcTests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QcTests::TestCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(QcTests::TestName).string_len(200).not_null())
                    .col(ColumnDef::new(QcTests::TestCategory).string_len(50).null())
                    .col(ColumnDef::new(QcTests::TestMethod).text().null())
                    .col(ColumnDef::new(QcTests::Specification).text().null())
                    .col(ColumnDef::new(QcTests::AcceptanceCriteria).text().null())
                    .col(
                        ColumnDef::new(QcTests::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(QcTests::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(QcTests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(QcTests::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QcTests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DrugRegistrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductionPlans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductionPlans {
    Table,
    Id,
    PlanNo,
    PlanDate,
    ProductCode,
    PlannedQuantity,
    UnitOfMeasure,
    PlannedStartDate,
    PlannedEndDate,
    Priority,
    Status,
    BatchSize,
    NumberOfBatches,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DrugRegistrations {
    Table,
    Id,
    DrugLetterRefNo,
    DrugLetterDate,
    ProductCode,
    RegistrationType,
    ApplicationDate,
    ApprovalDate,
    ExpiryDate,
    RegistrationNumber,
    Status,
    RegulatoryAuthority,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QcTests {
    Table,
    Id,
    TestCode,
    TestName,
    TestCategory,
    TestMethod,
    Specification,
    AcceptanceCriteria,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
