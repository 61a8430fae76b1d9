pub mod export;
pub mod upload;

pub use export::CsvFileInfo;
pub use upload::UploadOutcome;
