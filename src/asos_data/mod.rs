pub mod csv_parser;
pub mod data_loader;
pub mod error;
pub mod source;
