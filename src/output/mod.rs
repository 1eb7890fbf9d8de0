//! Output module
//!
//! Sinks for projected records.
//!
//! # Overview
//!
//! - CSV files with a `name,location,image` header, written atomically
//! - JSON arrays for stdout and HTTP responses

mod csv_writer;
mod json_writer;

pub use self::csv_writer::{write_csv, AtomicCsvWriter, DEFAULT_CSV_PATH};
pub use self::json_writer::{to_json_string, write_json};

#[cfg(test)]
mod tests;
