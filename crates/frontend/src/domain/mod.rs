pub mod a001_supplier;
pub mod a002_product;
pub mod a003_purchase_order;
pub mod a004_stock;
