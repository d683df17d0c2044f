//! Progress lines on stdout, optionally under an indicatif bar

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

pub const DELIMITER: &str = "==========================================";
pub const COMPLETION_MESSAGE: &str = "All directories processed.";

/// Prints the driver's progress lines
///
/// Every line goes through `ProgressBar::suspend`, so a visible bar is
/// redrawn below the text instead of being torn by it. A hidden bar just
/// prints.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Plain line output, no bar
    pub fn plain() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Line output plus a bar counting finished teams
    pub fn with_bar() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} teams {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    pub fn set_total(&self, teams: usize) {
        self.bar.set_length(teams as u64);
    }

    pub fn line(&self, message: &str) {
        self.bar.suspend(|| println!("{}", message));
    }

    pub fn started(&self, input_root: &Path) {
        self.line(&format!("Processing teams in {}", input_root.display()));
    }

    /// Delimiter block printed before each tool invocation
    pub fn team_started(&self, team: &str, pdf_files: usize) {
        self.bar.suspend(|| {
            println!("{}", DELIMITER);
            println!("Processing team: {} ({} PDF file(s))", team, pdf_files);
            println!("{}", DELIMITER);
        });
        self.bar.set_message(team.to_string());
    }

    pub fn team_finished(&self) {
        self.bar.inc(1);
    }

    pub fn finished(&self) {
        self.bar.finish_and_clear();
        self.line(COMPLETION_MESSAGE);
    }

    /// Run was cut short; no completion message
    pub fn stopped(&self, skipped: usize, reason: &str) {
        self.bar.abandon();
        self.line(&format!("Stopped ({}): {} team(s) not processed", reason, skipped));
    }
}
