use std::{
    path::{Path, PathBuf},
    process::Command,
};

use chrono::NaiveDate;

/// Looks up when a file was last changed.
pub trait History {
    /// The date of the last change to `path`, if known.
    fn last_updated(&self, path: &Path) -> Option<NaiveDate>;
}

/// Reads last-change dates from a git repository.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo_root: PathBuf,
}

impl GitHistory {
    /// Reads history from the repository checked out at `repo_root`.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// The path of `path` relative to the repository root.
    fn relative(&self, path: &Path) -> Option<PathBuf> {
        if let Ok(relative) = path.strip_prefix(&self.repo_root) {
            return Some(relative.to_path_buf());
        }

        // one of the two paths may be absolute
        let root = self.repo_root.canonicalize().ok()?;
        let path = path.canonicalize().ok()?;
        path.strip_prefix(root).ok().map(Path::to_path_buf)
    }
}

impl History for GitHistory {
    fn last_updated(&self, path: &Path) -> Option<NaiveDate> {
        let Some(relative) = self.relative(path) else {
            tracing::debug!(path = %path.display(), "not inside the repository");
            return None;
        };

        let output = Command::new("git")
            .args(["log", "-1", "--format=%ai"])
            .arg(&relative)
            .current_dir(&self.repo_root)
            .output()
            .inspect_err(|error| tracing::debug!(%error, "failed to run git"))
            .ok()?;

        if !output.status.success() {
            tracing::debug!(
                path = %relative.display(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git log failed"
            );
            return None;
        }

        parse_commit_date(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Never knows any dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl History for NoHistory {
    fn last_updated(&self, _path: &Path) -> Option<NaiveDate> {
        None
    }
}

/// Extracts the date from `git log --format=%ai` output, e.g.
/// `2024-03-01 12:34:56 +0100`.
fn parse_commit_date(output: &str) -> Option<NaiveDate> {
    let date = output.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
