use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_reference_tables::{Products, RawMaterials};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Nullable column shapes shared by live BOM rows and their history copies.
enum Shape {
    Code(u32),
    LongText,
    Qty(u32, u32),
    Int,
    Day,
    Stamp,
}

/// Optional master columns, identical on `bill_of_materials` and `bom_history_masters`.
const MASTER_COLUMNS: &[(&str, Shape)] = &[
    ("batch_unit", Shape::Code(5)),
    ("bom_ratio", Shape::Qty(10, 4)),
    ("annex_ratio", Shape::Qty(10, 4)),
    ("batch_qnty", Shape::Qty(12, 4)),
    ("batch_qnty_unit", Shape::Code(5)),
    ("pack1", Shape::Code(20)),
    ("pack2", Shape::Code(20)),
    ("pack3", Shape::Code(20)),
    ("per_unit_wt", Shape::Qty(10, 4)),
    ("per_unit_wt_unit", Shape::Code(5)),
    ("std_avg_wt", Shape::Qty(10, 4)),
    ("bmr_no", Shape::Code(50)),
    ("eff_dt", Shape::Day),
    ("prod_ld_time", Shape::Int),
    ("prod_dosage_form", Shape::Code(50)),
    ("bom_code", Shape::Code(20)),
    ("label_ratio", Shape::Qty(10, 4)),
    ("per_unit_solid_unit", Shape::Code(5)),
    ("dml_valid_upto", Shape::Day),
    ("granul_method", Shape::Code(100)),
    ("max_bt_per_day", Shape::Int),
    ("mon_sfty_stock", Shape::Qty(12, 4)),
    ("bpr_version_no", Shape::Code(6)),
    ("bpr_eff_dt", Shape::Day),
    ("bcr_version_no", Shape::Code(6)),
    ("bcr_eff_dt", Shape::Day),
    ("opl_p_code", Shape::Code(5)),
    ("batch_per_large_unit", Shape::Qty(12, 4)),
    ("batch_per_large_qnty", Shape::Qty(12, 4)),
    ("note", Shape::LongText),
    ("user_id", Shape::Code(50)),
    ("enter_dt", Shape::Stamp),
    ("initiator", Shape::Code(10)),
    ("aprv_by", Shape::Code(10)),
    ("aprv_dt", Shape::Stamp),
    ("edit_by", Shape::Code(10)),
    ("edit_dt", Shape::Stamp),
    ("auth_by", Shape::Code(10)),
    ("auth_dt", Shape::Stamp),
];

/// Optional detail columns, identical on `bom_details` and `bom_history_details`.
const DETAIL_COLUMNS: &[(&str, Shape)] = &[
    ("raw_type", Shape::Code(10)),
    ("declared_qnty", Shape::Qty(12, 4)),
    ("declared_unit", Shape::Code(5)),
    ("ratio_type", Shape::Code(10)),
    ("ratio_ra", Shape::Qty(10, 4)),
    ("unit_unit", Shape::Code(5)),
    ("unit_qnty", Shape::Qty(12, 4)),
    ("overage", Shape::Qty(10, 4)),
    ("qty_per_batch_issue", Shape::Qty(12, 4)),
    ("batch_size", Shape::Qty(12, 4)),
    ("batch_unit", Shape::Code(5)),
    ("annex_cont", Shape::Qty(10, 4)),
    ("dec_volm_per_unit", Shape::Qty(10, 4)),
    ("each_unit_qnty", Shape::Qty(12, 4)),
    ("qty_per_batch_unit", Shape::Code(5)),
    ("qty_per_batch_cont", Shape::Qty(12, 4)),
    ("qty_per_batch_unit_cont", Shape::Code(5)),
    ("filler_flag", Shape::Code(1)),
    ("annex", Shape::Code(1)),
    ("not_apper_flag", Shape::Code(1)),
    ("batch_size_qnty", Shape::Qty(12, 4)),
    ("batch_size_qnty_unit", Shape::Code(5)),
    ("qs_to_make", Shape::Code(100)),
    ("each_unit_ratio", Shape::Qty(10, 4)),
    ("raw_group", Shape::Code(10)),
    ("raw_cat", Shape::Code(10)),
    ("potency_ratio", Shape::Qty(10, 4)),
    ("da_gen_code", Shape::Code(10)),
    ("each_unit_qnty_annex", Shape::Qty(12, 4)),
    ("each_unit_qnty_unit_annex", Shape::Code(5)),
    ("seq", Shape::Int),
    ("stat", Shape::Code(1)),
    ("prod_qty", Shape::Qty(12, 4)),
    ("prod_qty_unit", Shape::Code(5)),
    ("version_no", Shape::Code(6)),
    ("raw_qnty", Shape::Qty(12, 4)),
    ("raw_unit", Shape::Code(5)),
    ("raw_mole_wt", Shape::Qty(10, 4)),
    ("gen_mole_wt", Shape::Qty(10, 4)),
    ("raw_by_gen", Shape::Qty(10, 4)),
    ("ref_book", Shape::Code(100)),
    ("ref_book_ver", Shape::Code(10)),
    ("ref_book_page", Shape::Code(20)),
    ("is_annex_raw", Shape::Code(1)),
    ("opl_p_code", Shape::Code(5)),
    ("opl_raw_code", Shape::Code(10)),
    ("raw_version_no", Shape::Code(6)),
    ("user_id", Shape::Code(50)),
    ("enter_dt", Shape::Stamp),
];

fn nullable_column(name: &str, shape: &Shape) -> ColumnDef {
    let mut def = ColumnDef::new(Alias::new(name));
    match shape {
        Shape::Code(len) => def.string_len(*len),
        Shape::LongText => def.text(),
        Shape::Qty(precision, scale) => def.decimal_len(*precision, *scale),
        Shape::Int => def.integer(),
        Shape::Day => def.date(),
        Shape::Stamp => def.timestamp(),
    };
    def.null().to_owned()
}

fn with_columns(mut table: TableCreateStatement, columns: &[(&str, Shape)]) -> TableCreateStatement {
    for (name, shape) in columns {
        table.col(&mut nullable_column(name, shape));
    }
    table
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut masters = Table::create()
            .table(BillOfMaterials::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BillOfMaterials::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(BillOfMaterials::PcatCode).string_len(10).not_null())
            .col(ColumnDef::new(BillOfMaterials::ProductCode).string_len(5).not_null())
            .col(ColumnDef::new(BillOfMaterials::BatchSize).decimal_len(12, 4).not_null())
            .col(ColumnDef::new(BillOfMaterials::VersionNo).string_len(6).not_null())
            .to_owned();
        masters = with_columns(masters, MASTER_COLUMNS);
        masters
            .col(
                ColumnDef::new(BillOfMaterials::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(BillOfMaterials::CreatedBy).string_len(50).null())
            .col(
                ColumnDef::new(BillOfMaterials::CreatedAt)
                    .timestamp()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(BillOfMaterials::UpdatedAt)
                    .timestamp()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_bill_of_materials_product_code")
                    .from(BillOfMaterials::Table, BillOfMaterials::ProductCode)
                    .to(Products::Table, Products::ProductCode),
            );
        manager.create_table(masters).await?;

        // One formulation per product and version, active or not
        manager
            .create_index(
                Index::create()
                    .name("idx_bill_of_materials_product_version")
                    .table(BillOfMaterials::Table)
                    .col(BillOfMaterials::ProductCode)
                    .col(BillOfMaterials::VersionNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut details = Table::create()
            .table(BomDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BomDetails::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(BomDetails::BomId).integer().not_null())
            .col(ColumnDef::new(BomDetails::PcatCode).string_len(10).not_null())
            .col(ColumnDef::new(BomDetails::ProductCode).string_len(5).not_null())
            .col(ColumnDef::new(BomDetails::RawCode).string_len(10).not_null())
            .col(ColumnDef::new(BomDetails::QtyPerBatch).decimal_len(12, 4).not_null())
            .to_owned();
        details = with_columns(details, DETAIL_COLUMNS);
        details
            .col(
                ColumnDef::new(BomDetails::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_bom_details_bom_id")
                    .from(BomDetails::Table, BomDetails::BomId)
                    .to(BillOfMaterials::Table, BillOfMaterials::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_bom_details_raw_code")
                    .from(BomDetails::Table, BomDetails::RawCode)
                    .to(RawMaterials::Table, RawMaterials::RawCode),
            );
        manager.create_table(details).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bom_details_bom_id")
                    .table(BomDetails::Table)
                    .col(BomDetails::BomId)
                    .to_owned(),
            )
            .await?;

        let mut history_masters = Table::create()
            .table(BomHistoryMasters::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BomHistoryMasters::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(BomHistoryMasters::BomId).integer().not_null())
            .col(ColumnDef::new(BomHistoryMasters::SlNo).integer().not_null())
            .col(ColumnDef::new(BomHistoryMasters::PcatCode).string_len(10).not_null())
            .col(ColumnDef::new(BomHistoryMasters::ProductCode).string_len(5).not_null())
            .col(ColumnDef::new(BomHistoryMasters::BatchSize).decimal_len(12, 4).not_null())
            .col(ColumnDef::new(BomHistoryMasters::VersionNo).string_len(6).not_null())
            .to_owned();
        history_masters = with_columns(history_masters, MASTER_COLUMNS);
        history_masters
            .col(ColumnDef::new(BomHistoryMasters::HistBy).string_len(50).null())
            .col(
                ColumnDef::new(BomHistoryMasters::HistDt)
                    .timestamp()
                    .not_null()
                    .default(Expr::current_timestamp()),
            );
        manager.create_table(history_masters).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bom_history_masters_product_serial")
                    .table(BomHistoryMasters::Table)
                    .col(BomHistoryMasters::ProductCode)
                    .col(BomHistoryMasters::SlNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut history_details = Table::create()
            .table(BomHistoryDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BomHistoryDetails::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(BomHistoryDetails::HistMasterId).integer().not_null())
            .col(ColumnDef::new(BomHistoryDetails::SlNo).integer().not_null())
            .col(ColumnDef::new(BomHistoryDetails::PcatCode).string_len(10).not_null())
            .col(ColumnDef::new(BomHistoryDetails::ProductCode).string_len(5).not_null())
            .col(ColumnDef::new(BomHistoryDetails::RawCode).string_len(10).not_null())
            .col(ColumnDef::new(BomHistoryDetails::QtyPerBatch).decimal_len(12, 4).not_null())
            .to_owned();
        history_details = with_columns(history_details, DETAIL_COLUMNS);
        history_details
            .col(ColumnDef::new(BomHistoryDetails::HistBy).string_len(50).null())
            .col(
                ColumnDef::new(BomHistoryDetails::HistDt)
                    .timestamp()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_bom_history_details_master")
                    .from(BomHistoryDetails::Table, BomHistoryDetails::HistMasterId)
                    .to(BomHistoryMasters::Table, BomHistoryMasters::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(history_details).await?;

        manager
            .create_table(
                Table::create()
                    .table(BomHistorySequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BomHistorySequences::ProductCode)
                            .string_len(5)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BomHistorySequences::LastSerial)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BomHistorySequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BomHistoryDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BomHistoryMasters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BomDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillOfMaterials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BillOfMaterials {
    Table,
    Id,
    PcatCode,
    ProductCode,
    BatchSize,
    VersionNo,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum BomDetails {
    Table,
    Id,
    BomId,
    PcatCode,
    ProductCode,
    RawCode,
    QtyPerBatch,
    IsActive,
}

#[derive(DeriveIden)]
pub enum BomHistoryMasters {
    Table,
    Id,
    BomId,
    SlNo,
    PcatCode,
    ProductCode,
    BatchSize,
    VersionNo,
    HistBy,
    HistDt,
}

#[derive(DeriveIden)]
pub enum BomHistoryDetails {
    Table,
    Id,
    HistMasterId,
    SlNo,
    PcatCode,
    ProductCode,
    RawCode,
    QtyPerBatch,
    HistBy,
    HistDt,
}

#[derive(DeriveIden)]
pub enum BomHistorySequences {
    Table,
    ProductCode,
    LastSerial,
}
