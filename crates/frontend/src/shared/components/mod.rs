pub mod data_table;
pub mod form_modal;
pub mod ui;

pub use data_table::{CellValue, ColumnKind, DataTable, TableAction, TableColumn};
pub use form_modal::FormModal;
