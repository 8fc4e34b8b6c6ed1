pub mod error;
pub mod meteogram;
