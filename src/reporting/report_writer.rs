//! Report writing functionality

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::driver::{BatchSummary, TeamStatus};

/// Write a batch summary, JSON when the path ends in `.json`, text otherwise
pub fn write_report(output_path: &Path, summary: &BatchSummary) -> Result<()> {
    let is_json = output_path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        write_json_report(output_path, summary)
    } else {
        write_text_report(output_path, summary)
    }
}

/// Write the summary as pretty-printed JSON
pub fn write_json_report(output_path: &Path, summary: &BatchSummary) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report file {}", output_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .context("Failed to write JSON report")?;
    Ok(())
}

/// Write a human-readable summary
pub fn write_text_report(output_path: &Path, summary: &BatchSummary) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report file {}", output_path.display()))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "Redaction Batch Report")?;
    writeln!(file, "======================")?;
    writeln!(file, "Input:  {}", summary.input_root.display())?;
    writeln!(file, "Output: {}", summary.output_root.display())?;
    if let Ok(elapsed) = summary.finished_at.duration_since(summary.started_at) {
        writeln!(file, "Duration: {:.1}s", elapsed.as_secs_f64())?;
    }
    writeln!(file)?;

    writeln!(file, "Summary Statistics:")?;
    writeln!(file, "-------------------")?;
    writeln!(file, "  Teams found: {}", summary.teams.len())?;
    writeln!(file, "  Succeeded: {}", summary.succeeded())?;
    writeln!(file, "  Failed: {}", summary.failed())?;
    writeln!(file, "  Skipped: {}", summary.skipped())?;
    if summary.interrupted {
        writeln!(file, "  Run was interrupted")?;
    } else if summary.aborted {
        writeln!(file, "  Run stopped at first failure")?;
    }
    writeln!(file)?;

    writeln!(file, "Teams:")?;
    writeln!(file, "------")?;
    for team in &summary.teams {
        writeln!(
            file,
            "  [{}] {} ({} PDF file(s)) -> {}",
            status_label(&team.status),
            team.name,
            team.pdf_files,
            team.output_dir.display()
        )?;
        match &team.status {
            TeamStatus::ToolFailed { code: Some(code) } => writeln!(file, "      exit code {}", code)?,
            TeamStatus::ToolFailed { code: None } => writeln!(file, "      terminated by signal")?,
            TeamStatus::SpawnFailed { reason } | TeamStatus::MirrorFailed { reason } => {
                writeln!(file, "      {}", reason)?
            }
            TeamStatus::Succeeded | TeamStatus::Skipped => {}
        }
    }

    file.flush()?;
    Ok(())
}

fn status_label(status: &TeamStatus) -> &'static str {
    match status {
        TeamStatus::Succeeded => "OK",
        TeamStatus::ToolFailed { .. } => "FAILED",
        TeamStatus::SpawnFailed { .. } => "NOT STARTED",
        TeamStatus::MirrorFailed { .. } => "NO OUTPUT DIR",
        TeamStatus::Skipped => "SKIPPED",
    }
}
