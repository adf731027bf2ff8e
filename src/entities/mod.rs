//! sea-orm entities, one module per table.

// Reference data
pub mod department;
pub mod employee;
pub mod product;
pub mod product_category;
pub mod raw_material;
pub mod supplier;

// Bills of materials
pub mod bom;
pub mod bom_detail;
pub mod bom_history_detail;
pub mod bom_history_master;
pub mod bom_history_sequence;

// Procurement
pub mod letter_of_credit;
pub mod letter_of_credit_item;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod purchase_requisition;
pub mod purchase_requisition_item;

// Operations
pub mod drug_registration;
pub mod production_plan;
pub mod quality_control_test;
