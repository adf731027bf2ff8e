use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductCategories::PcatCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProductCategories::PcatName).string_len(100).not_null())
                    .col(ColumnDef::new(ProductCategories::PcatDesc).string_len(500).null())
                    .col(
                        ColumnDef::new(ProductCategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ProductCategories::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(ProductCategories::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProductCategories::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::DeptCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Departments::DeptName).string_len(100).not_null())
                    .col(ColumnDef::new(Departments::DeptDesc).string_len(500).null())
                    .col(
                        ColumnDef::new(Departments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Departments::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::EmpCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employees::EmpOfficeName).string_len(100).not_null())
                    .col(ColumnDef::new(Employees::DeptCode).string_len(10).not_null())
                    .col(ColumnDef::new(Employees::JobCategory).string_len(5).null())
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Employees::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_dept_code")
                            .from(Employees::Table, Employees::DeptCode)
                            .to(Departments::Table, Departments::DeptCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Suppliers::SupCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Suppliers::SupName).string_len(100).not_null())
                    .col(ColumnDef::new(Suppliers::Address1).string_len(100).null())
                    .col(ColumnDef::new(Suppliers::Address2).string_len(100).null())
                    .col(ColumnDef::new(Suppliers::Address3).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::Address4).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::Phone).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::Fax).string_len(30).null())
                    .col(ColumnDef::new(Suppliers::Email).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::Website).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::ContactPerson).string_len(100).null())
                    .col(ColumnDef::new(Suppliers::Mobile).string_len(30).null())
                    .col(ColumnDef::new(Suppliers::CountryCode).string_len(3).null())
                    .col(ColumnDef::new(Suppliers::Currency).string_len(3).null())
                    .col(ColumnDef::new(Suppliers::PaymentTerms).string_len(50).null())
                    .col(ColumnDef::new(Suppliers::CreditLimit).decimal_len(15, 2).null())
                    .col(
                        ColumnDef::new(Suppliers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Suppliers::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(Suppliers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Suppliers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RawMaterials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::RawCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(RawMaterials::RawName).string_len(300).not_null())
                    .col(ColumnDef::new(RawMaterials::RawDesc).string_len(500).null())
                    .col(ColumnDef::new(RawMaterials::RawType).string_len(10).null())
                    .col(ColumnDef::new(RawMaterials::RawGrade).string_len(20).null())
                    .col(ColumnDef::new(RawMaterials::FormType).string_len(10).null())
                    .col(ColumnDef::new(RawMaterials::SpecGroup).string_len(10).null())
                    .col(ColumnDef::new(RawMaterials::UnitOfMeasure).string_len(5).null())
                    .col(ColumnDef::new(RawMaterials::ShelfLifeMonths).integer().null())
                    .col(ColumnDef::new(RawMaterials::StorageCondition).string_len(100).null())
                    .col(ColumnDef::new(RawMaterials::CasNumber).string_len(50).null())
                    .col(ColumnDef::new(RawMaterials::MolecularFormula).string_len(100).null())
                    .col(ColumnDef::new(RawMaterials::MolecularWeight).decimal_len(10, 4).null())
                    .col(ColumnDef::new(RawMaterials::HsCode).string_len(12).null())
                    .col(
                        ColumnDef::new(RawMaterials::RawStat)
                            .string_len(1)
                            .not_null()
                            .default("C"),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RawMaterials::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(RawMaterials::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Products::ProductCode)
                            .string_len(5)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::ProductName).string_len(200).not_null())
                    .col(ColumnDef::new(Products::ProductDesc).string_len(500).null())
                    .col(ColumnDef::new(Products::PcatCode).string_len(10).not_null())
                    .col(ColumnDef::new(Products::DosageForm).string_len(50).null())
                    .col(ColumnDef::new(Products::Strength).string_len(100).null())
                    .col(ColumnDef::new(Products::PackSize).string_len(50).null())
                    .col(ColumnDef::new(Products::PackSize1).string_len(20).null())
                    .col(ColumnDef::new(Products::PackSize2).string_len(20).null())
                    .col(ColumnDef::new(Products::PtypeDesc).string_len(100).null())
                    .col(ColumnDef::new(Products::GenericName).string_len(200).null())
                    .col(ColumnDef::new(Products::TherapeuticClass).string_len(100).null())
                    .col(ColumnDef::new(Products::DrugCategory).string_len(50).null())
                    .col(ColumnDef::new(Products::ShelfLifeMonths).integer().null())
                    .col(ColumnDef::new(Products::StorageCondition).string_len(100).null())
                    .col(ColumnDef::new(Products::PackType).string_len(50).null())
                    .col(ColumnDef::new(Products::Mrp).decimal_len(12, 4).null())
                    .col(ColumnDef::new(Products::TradePrice).decimal_len(12, 4).null())
                    .col(
                        ColumnDef::new(Products::ProdStat)
                            .string_len(1)
                            .not_null()
                            .default("C"),
                    )
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Products::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_pcat_code")
                            .from(Products::Table, Products::PcatCode)
                            .to(ProductCategories::Table, ProductCategories::PcatCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_pcat_code")
                    .table(Products::Table)
                    .col(Products::PcatCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_dept_code")
                    .table(Employees::Table)
                    .col(Employees::DeptCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RawMaterials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductCategories {
    Table,
    Id,
    PcatCode,
    PcatName,
    PcatDesc,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Departments {
    Table,
    Id,
    DeptCode,
    DeptName,
    DeptDesc,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
    EmpCode,
    EmpOfficeName,
    DeptCode,
    JobCategory,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Suppliers {
    Table,
    Id,
    SupCode,
    SupName,
    #[sea_orm(iden = "address_1")]
    Address1,
    #[sea_orm(iden = "address_2")]
    Address2,
    #[sea_orm(iden = "address_3")]
    Address3,
    #[sea_orm(iden = "address_4")]
    Address4,
    Phone,
    Fax,
    Email,
    Website,
    ContactPerson,
    Mobile,
    CountryCode,
    Currency,
    PaymentTerms,
    CreditLimit,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum RawMaterials {
    Table,
    Id,
    RawCode,
    RawName,
    RawDesc,
    RawType,
    RawGrade,
    FormType,
    SpecGroup,
    UnitOfMeasure,
    ShelfLifeMonths,
    StorageCondition,
    CasNumber,
    MolecularFormula,
    MolecularWeight,
    HsCode,
    RawStat,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    ProductCode,
    ProductName,
    ProductDesc,
    PcatCode,
    DosageForm,
    Strength,
    PackSize,
    #[sea_orm(iden = "pack_size1")]
    PackSize1,
    #[sea_orm(iden = "pack_size2")]
    PackSize2,
    PtypeDesc,
    GenericName,
    TherapeuticClass,
    DrugCategory,
    ShelfLifeMonths,
    StorageCondition,
    PackType,
    Mrp,
    TradePrice,
    ProdStat,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
