//! Team directory discovery

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One unit of batch work: an immediate subdirectory of the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDir {
    pub name: String,
    pub path: PathBuf,
}

impl TeamDir {
    /// Directory mirrored for this team under `output_root`
    pub fn mirror_in(&self, output_root: &Path) -> PathBuf {
        match self.path.file_name() {
            Some(base) => output_root.join(base),
            None => output_root.join(&self.name),
        }
    }
}

/// Collect the team directories directly under `input_root`
///
/// Only depth-1 directories count. Plain files and symlinks are ignored.
/// The result is sorted by file name.
///
/// # Arguments
/// * `input_root` - Directory to scan
///
/// # Returns
/// Vector of team directories
pub fn collect_team_dirs(input_root: &Path) -> Result<Vec<TeamDir>> {
    let mut teams = Vec::new();

    let walker = WalkDir::new(input_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        teams.push(TeamDir {
            name,
            path: entry.into_path(),
        });
    }

    Ok(teams)
}

/// Count PDF files directly inside `dir` (extension match is case-insensitive)
pub fn count_pdf_files(dir: &Path) -> Result<usize> {
    let mut count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(ext) = entry.path().extension() {
                if ext.to_string_lossy().to_lowercase() == "pdf" {
                    count += 1;
                }
            }
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_collect_team_dirs_ignores_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("team_b")).unwrap();
        fs::create_dir(temp_dir.path().join("team_a")).unwrap();
        File::create(temp_dir.path().join("stray.pdf")).unwrap();

        let teams = collect_team_dirs(temp_dir.path()).unwrap();
        let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["team_a", "team_b"]);
        assert_eq!(teams[0].path, temp_dir.path().join("team_a"));
    }

    #[test]
    fn test_collect_team_dirs_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("team_a").join("archive");
        fs::create_dir_all(&nested).unwrap();

        let teams = collect_team_dirs(temp_dir.path()).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "team_a");
    }

    #[test]
    fn test_collect_team_dirs_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect_team_dirs(temp_dir.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_team_dirs_skips_symlinked_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real");
        fs::create_dir(&real).unwrap();
        std::os::unix::fs::symlink(&real, temp_dir.path().join("link")).unwrap();

        let teams = collect_team_dirs(temp_dir.path()).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "real");
    }

    #[test]
    fn test_mirror_in_keeps_name() {
        let team = TeamDir {
            name: "team a".to_string(),
            path: PathBuf::from("/in/team a"),
        };
        assert_eq!(team.mirror_in(Path::new("/out")), PathBuf::from("/out/team a"));
    }

    #[test]
    fn test_count_pdf_files() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("a.pdf")).unwrap();
        File::create(temp_dir.path().join("b.PDF")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        fs::create_dir(temp_dir.path().join("c.pdf")).unwrap();

        assert_eq!(count_pdf_files(temp_dir.path()).unwrap(), 2);
    }
}
