//! Batch driver: mirror every team directory and run the redaction tool on it

use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime};
use tracing::{debug, info, warn};

use super::error::DriverError;
use super::tool::RedactionTool;
use crate::reporting::progress::ProgressReporter;
use crate::scanner::team_scanner::{collect_team_dirs, count_pdf_files, TeamDir};

/// Everything the driver needs, passed explicitly
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Teams processed at once; 1 keeps the sequential baseline
    pub jobs: usize,
    /// Stop launching teams after the first per-team failure
    pub fail_fast: bool,
}

impl DriverConfig {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            jobs: 1,
            fail_fast: false,
        }
    }
}

/// How one team directory ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TeamStatus {
    Succeeded,
    /// Tool ran and exited non-zero (`None` when killed by a signal)
    ToolFailed { code: Option<i32> },
    /// Tool could not be started
    SpawnFailed { reason: String },
    /// Mirrored output directory could not be created; tool not run
    MirrorFailed { reason: String },
    /// Never started because the run was stopped
    Skipped,
}

impl TeamStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ToolFailed { .. } | Self::SpawnFailed { .. } | Self::MirrorFailed { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamOutcome {
    pub name: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pdf_files: usize,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub status: TeamStatus,
}

/// Result of a whole batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
    pub teams: Vec<TeamOutcome>,
    /// Shutdown was requested before every team ran
    pub interrupted: bool,
    /// Fail-fast stopped the run
    pub aborted: bool,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|s| *s == TeamStatus::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(TeamStatus::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| *s == TeamStatus::Skipped)
    }

    fn count(&self, pred: impl Fn(&TeamStatus) -> bool) -> usize {
        self.teams.iter().filter(|t| pred(&t.status)).count()
    }
}

/// Run the redaction tool once per team directory of `config.input_root`
///
/// Fails before touching the filesystem when the input root is missing or
/// not a directory. Per-team failures are recorded and the run continues,
/// unless `fail_fast` is set. `shutdown` is checked before each team starts.
pub fn run_batch(
    config: &DriverConfig,
    tool: &dyn RedactionTool,
    progress: &ProgressReporter,
    shutdown: &AtomicBool,
) -> Result<BatchSummary, DriverError> {
    check_input_root(&config.input_root)?;

    let started_at = SystemTime::now();
    progress.started(&config.input_root);

    fs::create_dir_all(&config.output_root).map_err(|source| DriverError::CreateOutputRoot {
        path: config.output_root.clone(),
        source,
    })?;

    let teams = collect_team_dirs(&config.input_root).map_err(|e| DriverError::Scan {
        path: config.input_root.clone(),
        reason: format!("{:#}", e),
    })?;
    info!(teams = teams.len(), jobs = config.jobs, "discovered team directories");
    progress.set_total(teams.len());

    let halt = AtomicBool::new(false);
    let outcomes: Vec<TeamOutcome> = if config.jobs <= 1 {
        teams
            .iter()
            .map(|team| next_team(team, config, tool, progress, shutdown, &halt))
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .map_err(|e| DriverError::ThreadPool(e.to_string()))?;
        pool.install(|| {
            teams
                .par_iter()
                .map(|team| next_team(team, config, tool, progress, shutdown, &halt))
                .collect::<Vec<_>>()
        })
    };

    let summary = BatchSummary {
        input_root: config.input_root.clone(),
        output_root: config.output_root.clone(),
        started_at,
        finished_at: SystemTime::now(),
        teams: outcomes,
        interrupted: shutdown.load(Ordering::SeqCst),
        aborted: halt.load(Ordering::SeqCst),
    };

    if summary.interrupted {
        progress.stopped(summary.skipped(), "interrupted");
    } else if summary.aborted {
        progress.stopped(summary.skipped(), "fail-fast");
    } else {
        progress.finished();
    }

    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        skipped = summary.skipped(),
        "batch finished"
    );
    Ok(summary)
}

fn check_input_root(input_root: &Path) -> Result<(), DriverError> {
    match fs::metadata(input_root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DriverError::NotADirectory(input_root.to_path_buf())),
        Err(_) => Err(DriverError::MissingInputRoot(input_root.to_path_buf())),
    }
}

fn next_team(
    team: &TeamDir,
    config: &DriverConfig,
    tool: &dyn RedactionTool,
    progress: &ProgressReporter,
    shutdown: &AtomicBool,
    halt: &AtomicBool,
) -> TeamOutcome {
    let output_dir = team.mirror_in(&config.output_root);

    if shutdown.load(Ordering::SeqCst) || halt.load(Ordering::SeqCst) {
        debug!(team = %team.name, "skipping team");
        return TeamOutcome {
            name: team.name.clone(),
            input_dir: team.path.clone(),
            output_dir,
            pdf_files: 0,
            elapsed_ms: 0,
            status: TeamStatus::Skipped,
        };
    }

    let outcome = process_team(team, output_dir, tool, progress);
    if config.fail_fast && outcome.status.is_failure() {
        halt.store(true, Ordering::SeqCst);
    }
    outcome
}

fn process_team(
    team: &TeamDir,
    output_dir: PathBuf,
    tool: &dyn RedactionTool,
    progress: &ProgressReporter,
) -> TeamOutcome {
    let start = Instant::now();

    let pdf_files = count_pdf_files(&team.path).unwrap_or_else(|e| {
        warn!(team = %team.name, error = %e, "could not count PDF files");
        0
    });
    if pdf_files == 0 {
        info!(team = %team.name, "team directory has no PDF files");
    }

    progress.team_started(&team.name, pdf_files);

    let status = match fs::create_dir_all(&output_dir) {
        Err(e) => {
            warn!(team = %team.name, dir = %output_dir.display(), error = %e, "could not create output directory");
            TeamStatus::MirrorFailed {
                reason: e.to_string(),
            }
        }
        Ok(()) => match tool.run(&team.path, &output_dir, true) {
            Ok(status) if status.success() => TeamStatus::Succeeded,
            Ok(status) => {
                warn!(team = %team.name, exit_code = ?status.code, "redaction tool failed");
                TeamStatus::ToolFailed { code: status.code }
            }
            Err(e) => {
                warn!(team = %team.name, error = %format!("{:#}", e), "redaction tool did not start");
                TeamStatus::SpawnFailed {
                    reason: format!("{:#}", e),
                }
            }
        },
    };

    progress.team_finished();

    TeamOutcome {
        name: team.name.clone(),
        input_dir: team.path.clone(),
        output_dir,
        pdf_files,
        elapsed_ms: start.elapsed().as_millis() as u64,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tool::ToolStatus;
    use anyhow::Result;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedTool(ToolStatus);

    impl RedactionTool for FixedTool {
        fn run(&self, _input: &Path, _output: &Path, _batch: bool) -> Result<ToolStatus> {
            Ok(self.0)
        }
    }

    /// Requests shutdown from inside the first invocation
    struct InterruptingTool<'a> {
        shutdown: &'a AtomicBool,
        calls: Mutex<usize>,
    }

    impl RedactionTool for InterruptingTool<'_> {
        fn run(&self, _input: &Path, _output: &Path, _batch: bool) -> Result<ToolStatus> {
            *self.calls.lock().unwrap() += 1;
            self.shutdown.store(true, Ordering::SeqCst);
            Ok(ToolStatus::SUCCESS)
        }
    }

    fn input_with_teams(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in names {
            fs::create_dir(temp_dir.path().join(name)).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_missing_input_root_is_rejected() {
        let out = TempDir::new().unwrap();
        let config = DriverConfig::new("/definitely/not/here", out.path().join("out"));
        let err = run_batch(
            &config,
            &FixedTool(ToolStatus::SUCCESS),
            &ProgressReporter::plain(),
            &AtomicBool::new(false),
        )
        .unwrap_err();

        assert!(matches!(err, DriverError::MissingInputRoot(_)));
        assert!(!out.path().join("out").exists());
    }

    #[test]
    fn test_file_as_input_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("input.txt");
        fs::write(&file, b"x").unwrap();
        let config = DriverConfig::new(&file, temp_dir.path().join("out"));

        let err = run_batch(
            &config,
            &FixedTool(ToolStatus::SUCCESS),
            &ProgressReporter::plain(),
            &AtomicBool::new(false),
        )
        .unwrap_err();
        assert!(matches!(err, DriverError::NotADirectory(_)));
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let input = input_with_teams(&["a", "b", "c"]);
        let out = TempDir::new().unwrap();
        let config = DriverConfig::new(input.path(), out.path());

        let summary = run_batch(
            &config,
            &FixedTool(ToolStatus::from_code(2)),
            &ProgressReporter::plain(),
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!(summary.failed(), 3);
        assert!(!summary.aborted);
        assert!(summary
            .teams
            .iter()
            .all(|t| t.status == TeamStatus::ToolFailed { code: Some(2) }));
    }

    #[test]
    fn test_fail_fast_skips_remaining_teams() {
        let input = input_with_teams(&["a", "b", "c"]);
        let out = TempDir::new().unwrap();
        let mut config = DriverConfig::new(input.path(), out.path());
        config.fail_fast = true;

        let summary = run_batch(
            &config,
            &FixedTool(ToolStatus::from_code(1)),
            &ProgressReporter::plain(),
            &AtomicBool::new(false),
        )
        .unwrap();

        assert!(summary.aborted);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped(), 2);
        assert!(!out.path().join("b").exists());
    }

    #[test]
    fn test_shutdown_skips_teams_not_yet_started() {
        let input = input_with_teams(&["a", "b"]);
        let out = TempDir::new().unwrap();
        let config = DriverConfig::new(input.path(), out.path());
        let shutdown = AtomicBool::new(false);
        let tool = InterruptingTool {
            shutdown: &shutdown,
            calls: Mutex::new(0),
        };

        let summary = run_batch(&config, &tool, &ProgressReporter::plain(), &shutdown).unwrap();

        assert_eq!(*tool.calls.lock().unwrap(), 1);
        assert!(summary.interrupted);
        assert_eq!(summary.teams[0].status, TeamStatus::Succeeded);
        assert_eq!(summary.teams[1].status, TeamStatus::Skipped);
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(TeamStatus::ToolFailed { code: Some(4) }).unwrap();
        assert_eq!(json["status"], "tool_failed");
        assert_eq!(json["code"], 4);
    }
}
