//! Services built on top of the processing core

pub mod mass_upload;

pub use mass_upload::{MassUploadReport, MassUploadService, RowOutcome};
