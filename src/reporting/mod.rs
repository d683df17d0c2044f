//! Progress output and batch reports

pub mod progress;
pub mod report_writer;

pub use progress::ProgressReporter;
pub use report_writer::{write_json_report, write_report, write_text_report};
