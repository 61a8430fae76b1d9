//! ScanSheet Processing Library
//!
//! Payload and result materialization for the upload pipeline: JPEG
//! re-encoding of input images, flattening of the server's table response
//! into a single field map, and CSV record construction.

pub mod csv;
pub mod image;
pub mod table;

pub use csv::{export_filename, CsvRecord, CSV_CONTENT_TYPE};
pub use image::{reencode_all_jpeg, reencode_jpeg};
pub use table::{flatten, FlattenedTable};
