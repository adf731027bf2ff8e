use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_reference_tables::{RawMaterials, Suppliers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PurchaseRequisitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseRequisitions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRequisitions::ReqNo)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PurchaseRequisitions::ReqDate).date().not_null())
                    .col(ColumnDef::new(PurchaseRequisitions::Department).string_len(50).null())
                    .col(ColumnDef::new(PurchaseRequisitions::RequestedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(PurchaseRequisitions::Priority)
                            .string_len(10)
                            .not_null()
                            .default("Normal"),
                    )
                    .col(
                        ColumnDef::new(PurchaseRequisitions::Status)
                            .string_len(20)
                            .not_null()
                            .default("Draft"),
                    )
                    .col(ColumnDef::new(PurchaseRequisitions::TotalAmount).decimal_len(15, 2).null())
                    .col(
                        ColumnDef::new(PurchaseRequisitions::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(PurchaseRequisitions::RequiredDate).date().null())
                    .col(ColumnDef::new(PurchaseRequisitions::Remarks).text().null())
                    .col(ColumnDef::new(PurchaseRequisitions::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(PurchaseRequisitions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PurchaseRequisitions::UpdatedAt)
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
                    .table(PurchaseRequisitionItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseRequisitionItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseRequisitionItems::ReqId).integer().not_null())
                    .col(ColumnDef::new(PurchaseRequisitionItems::ItemNo).integer().not_null())
                    .col(ColumnDef::new(PurchaseRequisitionItems::RawCode).string_len(10).not_null())
                    .col(
                        ColumnDef::new(PurchaseRequisitionItems::Quantity)
                            .decimal_len(12, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseRequisitionItems::UnitOfMeasure).string_len(5).null())
                    .col(
                        ColumnDef::new(PurchaseRequisitionItems::EstimatedRate)
                            .decimal_len(12, 4)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseRequisitionItems::EstimatedAmount)
                            .decimal_len(15, 2)
                            .null(),
                    )
                    .col(ColumnDef::new(PurchaseRequisitionItems::RequiredDate).date().null())
                    .col(ColumnDef::new(PurchaseRequisitionItems::Specification).text().null())
                    .col(ColumnDef::new(PurchaseRequisitionItems::Remarks).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_requisition_items_req_id")
                            .from(PurchaseRequisitionItems::Table, PurchaseRequisitionItems::ReqId)
                            .to(PurchaseRequisitions::Table, PurchaseRequisitions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_requisition_items_raw_code")
                            .from(PurchaseRequisitionItems::Table, PurchaseRequisitionItems::RawCode)
                            .to(RawMaterials::Table, RawMaterials::RawCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::PoNo)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::PoDate).date().not_null())
                    .col(ColumnDef::new(PurchaseOrders::SupCode).string_len(10).not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::ExchangeRate)
                            .decimal_len(10, 4)
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(PurchaseOrders::PaymentTerms).string_len(100).null())
                    .col(ColumnDef::new(PurchaseOrders::DeliveryTerms).string_len(100).null())
                    .col(ColumnDef::new(PurchaseOrders::DeliveryAddress).text().null())
                    .col(ColumnDef::new(PurchaseOrders::TotalAmount).decimal_len(15, 2).null())
                    .col(
                        ColumnDef::new(PurchaseOrders::DiscountAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::TaxAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PurchaseOrders::NetAmount).decimal_len(15, 2).null())
                    .col(
                        ColumnDef::new(PurchaseOrders::Status)
                            .string_len(20)
                            .not_null()
                            .default("Draft"),
                    )
                    .col(ColumnDef::new(PurchaseOrders::DeliveryDate).date().null())
                    .col(ColumnDef::new(PurchaseOrders::Remarks).text().null())
                    .col(ColumnDef::new(PurchaseOrders::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_sup_code")
                            .from(PurchaseOrders::Table, PurchaseOrders::SupCode)
                            .to(Suppliers::Table, Suppliers::SupCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrderItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrderItems::PoId).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrderItems::ItemNo).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrderItems::RawCode).string_len(10).not_null())
                    .col(ColumnDef::new(PurchaseOrderItems::Quantity).decimal_len(12, 4).not_null())
                    .col(ColumnDef::new(PurchaseOrderItems::UnitOfMeasure).string_len(5).null())
                    .col(ColumnDef::new(PurchaseOrderItems::UnitRate).decimal_len(12, 4).not_null())
                    .col(ColumnDef::new(PurchaseOrderItems::Amount).decimal_len(15, 2).not_null())
                    .col(ColumnDef::new(PurchaseOrderItems::DeliveryDate).date().null())
                    .col(ColumnDef::new(PurchaseOrderItems::Specification).text().null())
                    .col(ColumnDef::new(PurchaseOrderItems::Remarks).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_items_po_id")
                            .from(PurchaseOrderItems::Table, PurchaseOrderItems::PoId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_items_raw_code")
                            .from(PurchaseOrderItems::Table, PurchaseOrderItems::RawCode)
                            .to(RawMaterials::Table, RawMaterials::RawCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LettersOfCredit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LettersOfCredit::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LettersOfCredit::LcNo)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LettersOfCredit::LcDate).date().not_null())
                    .col(ColumnDef::new(LettersOfCredit::SupCode).string_len(10).not_null())
                    .col(ColumnDef::new(LettersOfCredit::BankCode).string_len(10).null())
                    .col(ColumnDef::new(LettersOfCredit::LcAmount).decimal_len(15, 2).not_null())
                    .col(
                        ColumnDef::new(LettersOfCredit::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(LettersOfCredit::ExpiryDate).date().null())
                    .col(ColumnDef::new(LettersOfCredit::LatestShipmentDate).date().null())
                    .col(ColumnDef::new(LettersOfCredit::PaymentTerms).string_len(100).null())
                    .col(ColumnDef::new(LettersOfCredit::DeliveryTerms).string_len(100).null())
                    .col(ColumnDef::new(LettersOfCredit::PortOfLoading).string_len(100).null())
                    .col(ColumnDef::new(LettersOfCredit::PortOfDischarge).string_len(100).null())
                    .col(
                        ColumnDef::new(LettersOfCredit::PartialShipment)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LettersOfCredit::Transhipment)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LettersOfCredit::Status)
                            .string_len(20)
                            .not_null()
                            .default("Open"),
                    )
                    .col(ColumnDef::new(LettersOfCredit::Remarks).text().null())
                    .col(ColumnDef::new(LettersOfCredit::CreatedBy).string_len(50).null())
                    .col(
                        ColumnDef::new(LettersOfCredit::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LettersOfCredit::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_letters_of_credit_sup_code")
                            .from(LettersOfCredit::Table, LettersOfCredit::SupCode)
                            .to(Suppliers::Table, Suppliers::SupCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LetterOfCreditItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LetterOfCreditItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LetterOfCreditItems::LcId).integer().not_null())
                    .col(ColumnDef::new(LetterOfCreditItems::RawCode).string_len(10).not_null())
                    .col(ColumnDef::new(LetterOfCreditItems::Quantity).decimal_len(12, 4).not_null())
                    .col(ColumnDef::new(LetterOfCreditItems::UnitOfMeasure).string_len(5).null())
                    .col(ColumnDef::new(LetterOfCreditItems::UnitPrice).decimal_len(12, 4).not_null())
                    .col(ColumnDef::new(LetterOfCreditItems::Amount).decimal_len(15, 2).not_null())
                    .col(
                        ColumnDef::new(LetterOfCreditItems::TolerancePercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_letter_of_credit_items_lc_id")
                            .from(LetterOfCreditItems::Table, LetterOfCreditItems::LcId)
                            .to(LettersOfCredit::Table, LettersOfCredit::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_letter_of_credit_items_raw_code")
                            .from(LetterOfCreditItems::Table, LetterOfCreditItems::RawCode)
                            .to(RawMaterials::Table, RawMaterials::RawCode),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LetterOfCreditItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LettersOfCredit::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseRequisitionItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseRequisitions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PurchaseRequisitions {
    Table,
    Id,
    ReqNo,
    ReqDate,
    Department,
    RequestedBy,
    Priority,
    Status,
    TotalAmount,
    Currency,
    RequiredDate,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PurchaseRequisitionItems {
    Table,
    Id,
    ReqId,
    ItemNo,
    RawCode,
    Quantity,
    UnitOfMeasure,
    EstimatedRate,
    EstimatedAmount,
    RequiredDate,
    Specification,
    Remarks,
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    Table,
    Id,
    PoNo,
    PoDate,
    SupCode,
    Currency,
    ExchangeRate,
    PaymentTerms,
    DeliveryTerms,
    DeliveryAddress,
    TotalAmount,
    DiscountAmount,
    TaxAmount,
    NetAmount,
    Status,
    DeliveryDate,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PurchaseOrderItems {
    Table,
    Id,
    PoId,
    ItemNo,
    RawCode,
    Quantity,
    UnitOfMeasure,
    UnitRate,
    Amount,
    DeliveryDate,
    Specification,
    Remarks,
}

#[derive(DeriveIden)]
enum LettersOfCredit {
    Table,
    Id,
    LcNo,
    LcDate,
    SupCode,
    BankCode,
    LcAmount,
    Currency,
    ExpiryDate,
    LatestShipmentDate,
    PaymentTerms,
    DeliveryTerms,
    PortOfLoading,
    PortOfDischarge,
    PartialShipment,
    Transhipment,
    Status,
    Remarks,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LetterOfCreditItems {
    Table,
    Id,
    LcId,
    RawCode,
    Quantity,
    UnitOfMeasure,
    UnitPrice,
    Amount,
    TolerancePercentage,
}
