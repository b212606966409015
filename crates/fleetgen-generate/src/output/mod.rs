pub mod csv;

pub use self::csv::{CsvRecord, WrittenTables, write_dataset_csv, write_table_csv};
