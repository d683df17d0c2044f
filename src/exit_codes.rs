//! Process exit codes for the `redact_batch` binary.

/// Every team directory was handed to the tool (tool failures included).
pub const OK: i32 = 0;
/// Bad arguments, missing input root, fatal setup error, or a fail-fast stop.
pub const FAILURE: i32 = 1;
/// Ctrl-C stopped the batch before every team ran.
pub const INTERRUPTED: i32 = 130;
