//! Batch driver, redaction tool seam and error types

pub mod driver;
pub mod error;
pub mod tool;

pub use driver::{run_batch, BatchSummary, DriverConfig, TeamOutcome, TeamStatus};
pub use error::DriverError;
pub use tool::{ExternalTool, RedactionTool, ToolStatus};
