//! Redaction tool capability and the external process implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Exit status reported by a redaction tool run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Process exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolStatus {
    pub const SUCCESS: ToolStatus = ToolStatus { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ToolStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Something that can redact one directory of files into another
///
/// The driver calls `run` once per team directory and blocks until it
/// returns. An `Err` means the tool could not be started at all; a tool
/// that ran and failed reports that through the returned status.
pub trait RedactionTool: Send + Sync {
    fn run(&self, input_dir: &Path, output_dir: &Path, batch: bool) -> Result<ToolStatus>;
}

/// Redaction script invoked as a child process
///
/// Command line: `program [base_args..] --input <dir> --output <dir> [--batch] [pass-through..]`.
/// The child inherits stdout and stderr so its output reaches the user unchanged.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: PathBuf,
    base_args: Vec<OsString>,
    ignore_terms: Option<String>,
    disable_default_ignores: bool,
}

impl Default for ExternalTool {
    fn default() -> Self {
        Self::new("python3", ["redact.py"])
    }
}

impl ExternalTool {
    /// Create a tool from a program and the arguments that precede `--input`
    pub fn new<P, I, S>(program: P, base_args: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            base_args: base_args.into_iter().map(Into::into).collect(),
            ignore_terms: None,
            disable_default_ignores: false,
        }
    }

    /// Extra comma-separated terms the tool must never redact (`--ignore`)
    pub fn with_ignore_terms(mut self, terms: Option<String>) -> Self {
        self.ignore_terms = terms.filter(|t| !t.trim().is_empty());
        self
    }

    /// Forward `--disable-default-ignores` to the tool
    pub fn with_default_ignores_disabled(mut self, disabled: bool) -> Self {
        self.disable_default_ignores = disabled;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument list for one invocation, excluding the program itself
    pub fn args_for(&self, input_dir: &Path, output_dir: &Path, batch: bool) -> Vec<OsString> {
        let mut args = self.base_args.clone();
        args.push("--input".into());
        args.push(input_dir.as_os_str().to_owned());
        args.push("--output".into());
        args.push(output_dir.as_os_str().to_owned());
        if batch {
            args.push("--batch".into());
        }
        if let Some(terms) = &self.ignore_terms {
            args.push("--ignore".into());
            args.push(terms.into());
        }
        if self.disable_default_ignores {
            args.push("--disable-default-ignores".into());
        }
        args
    }
}

impl RedactionTool for ExternalTool {
    fn run(&self, input_dir: &Path, output_dir: &Path, batch: bool) -> Result<ToolStatus> {
        let args = self.args_for(input_dir, output_dir, batch);
        debug!(program = %self.program.display(), ?args, "spawning redaction tool");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to start {}", self.program.display()))?;

        debug!(exit_code = ?status.code(), "redaction tool finished");
        Ok(status.into())
    }
}
