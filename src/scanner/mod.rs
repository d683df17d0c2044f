//! Input root scanning

pub mod team_scanner;

pub use team_scanner::{collect_team_dirs, count_pdf_files, TeamDir};
