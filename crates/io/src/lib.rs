// File I/O operations

pub mod csv;
pub mod loader;
pub mod xlsx;

/// Default name of the exported workbook.
pub const EXPORT_FILE_NAME: &str = "combined_keywords_split.xlsx";
