//! Redaction Batch Driver Library
//!
//! Runs an external PDF redaction tool once per team directory of an input
//! folder, mirroring the directory layout into an output folder.

pub mod core;
pub mod exit_codes;
pub mod logging;
pub mod reporting;
pub mod scanner;

pub use crate::core::driver;
pub use reporting::report_writer;
pub use scanner::team_scanner;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::driver::{run_batch, BatchSummary, DriverConfig, TeamOutcome, TeamStatus};
    pub use crate::core::error::DriverError;
    pub use crate::core::tool::{ExternalTool, RedactionTool, ToolStatus};
    pub use crate::reporting::progress::{ProgressReporter, COMPLETION_MESSAGE, DELIMITER};
    pub use crate::reporting::report_writer::{write_json_report, write_report, write_text_report};
    pub use crate::scanner::team_scanner::{collect_team_dirs, count_pdf_files, TeamDir};
}
