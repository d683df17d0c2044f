use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use redact_batch::exit_codes;
use redact_batch::prelude::*;

const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_SCRIPT: &str = "redact.py";

#[derive(Parser)]
#[command(name = "redact_batch", version)]
#[command(about = "Run the PDF redaction tool over every team directory of an input folder", long_about = None)]
struct Cli {
    /// Directory whose immediate subdirectories are the teams to redact
    input_root: PathBuf,

    /// Directory that receives one redacted subdirectory per team (created if missing)
    output_root: PathBuf,

    /// Number of team directories processed at once
    #[arg(short, long, default_value = "1")]
    jobs: NonZeroUsize,

    /// Stop starting new teams after the first failure and exit non-zero
    #[arg(long)]
    fail_fast: bool,

    /// Redaction program to run (default: python3 with the redaction script)
    #[arg(long, value_name = "PROGRAM")]
    tool: Option<PathBuf>,

    /// Redaction script passed to the program (default: redact.py when --tool is not given)
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Extra argument placed before --input (repeatable)
    #[arg(long = "tool-arg", value_name = "ARG", allow_hyphen_values = true)]
    tool_args: Vec<String>,

    /// Comma-separated terms the tool must not redact (e.g. 'React,Node')
    #[arg(long, value_name = "TERMS")]
    ignore: Option<String>,

    /// Tell the tool to skip its built-in technology ignore list
    #[arg(long)]
    disable_default_ignores: bool,

    /// Write a batch report (JSON when the name ends in .json, text otherwise)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Show a progress bar counting finished teams
    #[arg(long)]
    progress: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn external_tool(&self) -> ExternalTool {
        let (program, script) = match &self.tool {
            Some(program) => (program.clone(), self.script.clone()),
            None => (
                PathBuf::from(DEFAULT_INTERPRETER),
                Some(self.script.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT))),
            ),
        };

        let base_args = script
            .into_iter()
            .map(PathBuf::into_os_string)
            .chain(self.tool_args.iter().map(Into::into));

        ExternalTool::new(program, base_args)
            .with_ignore_terms(self.ignore.clone())
            .with_default_ignores_disabled(self.disable_default_ignores)
    }

    fn driver_config(&self) -> DriverConfig {
        let mut config = DriverConfig::new(&self.input_root, &self.output_root);
        config.jobs = self.jobs.get();
        config.fail_fast = self.fail_fast;
        config
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            println!("Error: {:#}", err);
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            return Ok(match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = err.print();
                    exit_codes::OK
                }
                _ => {
                    print!("{}", err.render());
                    exit_codes::FAILURE
                }
            });
        }
    };

    redact_batch::logging::init(cli.verbose);

    // Ctrl-C: no new team is started after the flag is set
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown_requested.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nShutdown requested. No new team will be started.");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let progress = if cli.progress {
        ProgressReporter::with_bar()
    } else {
        ProgressReporter::plain()
    };

    let tool = cli.external_tool();
    let config = cli.driver_config();

    let summary = match run_batch(&config, &tool, &progress, &shutdown_requested) {
        Ok(summary) => summary,
        Err(err) if err.is_precondition() => {
            println!("Error: {}", err);
            println!("Usage: redact_batch <INPUT_ROOT> <OUTPUT_ROOT>");
            return Ok(exit_codes::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(report_path) = &cli.report {
        write_report(report_path, &summary)?;
        eprintln!("Report saved to: {}", report_path.display());
    }

    if summary.failed() > 0 {
        debug!(
            failed = summary.failed(),
            total = summary.teams.len(),
            "some team directories failed"
        );
    }

    Ok(if summary.interrupted {
        exit_codes::INTERRUPTED
    } else if summary.aborted {
        exit_codes::FAILURE
    } else {
        exit_codes::OK
    })
}
