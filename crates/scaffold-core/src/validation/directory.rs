//! Target directory safety check
//!
//! A project may be generated into an existing directory as long as it only
//! holds version-control metadata, editor files, docs, or logs left behind by
//! a previous failed attempt.

use crate::error::{ScaffoldError, ScaffoldResult};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Entries that may already exist in the target directory
const ALLOWED_ENTRIES: &[&str] = &[
    ".DS_Store",
    ".git",
    ".gitattributes",
    ".gitignore",
    ".gitlab-ci.yml",
    ".hg",
    ".hgcheck",
    ".hgignore",
    ".idea",
    ".npmignore",
    ".travis.yml",
    "docs",
    "LICENSE",
    "README.md",
    "mkdocs.yml",
    "Thumbs.db",
];

/// IntelliJ module files
const ALLOWED_SUFFIX: &str = ".iml";

/// Logs written by package managers on a failed install
const ERROR_LOG_PREFIXES: &[&str] = &["npm-debug.log", "yarn-error.log", "yarn-debug.log"];

/// A pre-existing entry that would collide with the generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    pub is_directory: bool,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_directory {
            write!(f, "{}/", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryConflictReport {
    pub conflicts: Vec<Conflict>,
    /// Error logs deleted because the directory was otherwise clean
    pub removed_logs: Vec<String>,
}

impl DirectoryConflictReport {
    pub fn is_safe(&self) -> bool {
        self.conflicts.is_empty()
    }
}

fn is_error_log(name: &str) -> bool {
    ERROR_LOG_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

fn is_allowed(name: &str) -> bool {
    ALLOWED_ENTRIES.contains(&name) || name.ends_with(ALLOWED_SUFFIX) || is_error_log(name)
}

/// Create the project directory (and parents) if it does not exist yet
pub fn ensure_project_dir(root: &Path) -> ScaffoldResult<()> {
    fs::create_dir_all(root).map_err(|source| ScaffoldError::Io {
        context: format!("Failed to create directory {}", root.display()),
        source,
    })
}

/// Scan `root` once for conflicting entries.
/// When none are found, error logs from earlier attempts are removed.
pub fn check_directory(root: &Path) -> io::Result<DirectoryConflictReport> {
    let mut names: Vec<String> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let conflicts: Vec<Conflict> = names
        .iter()
        .filter(|name| !is_allowed(name))
        .map(|name| Conflict {
            name: name.clone(),
            // unreadable metadata is shown as a plain file
            is_directory: fs::symlink_metadata(root.join(name))
                .map(|meta| meta.is_dir())
                .unwrap_or(false),
        })
        .collect();

    if !conflicts.is_empty() {
        return Ok(DirectoryConflictReport {
            conflicts,
            removed_logs: Vec::new(),
        });
    }

    let mut removed_logs = Vec::new();
    for name in names.iter().filter(|name| is_error_log(name)) {
        let path = root.join(name);
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => {
                tracing::debug!(file = %name, "removed leftover error log");
                removed_logs.push(name.clone());
            }
            Err(e) => tracing::warn!(file = %name, error = %e, "could not remove error log"),
        }
    }

    Ok(DirectoryConflictReport {
        conflicts,
        removed_logs,
    })
}

/// Abort with [`ScaffoldError::UnsafeDirectory`] if `root` holds conflicting entries
pub fn ensure_safe(root: &Path, display_name: &str) -> ScaffoldResult<DirectoryConflictReport> {
    let report = check_directory(root).map_err(|source| ScaffoldError::Io {
        context: format!("Failed to read directory {}", root.display()),
        source,
    })?;

    if report.is_safe() {
        Ok(report)
    } else {
        Err(ScaffoldError::UnsafeDirectory {
            dir: display_name.to_string(),
            conflicts: report.conflicts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_empty_directory_is_safe() {
        let tmp = TempDir::new().unwrap();
        let report = check_directory(tmp.path()).unwrap();
        assert!(report.is_safe());
        assert!(report.removed_logs.is_empty());
    }

    #[test]
    fn test_allowed_entries_are_not_conflicts() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        touch(tmp.path(), "README.md");
        touch(tmp.path(), "LICENSE");
        touch(tmp.path(), "my-app.iml");

        let report = check_directory(tmp.path()).unwrap();
        assert!(report.is_safe(), "{report:?}");
    }

    #[test]
    fn test_single_unexpected_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        touch(tmp.path(), "README.md");
        touch(tmp.path(), "index.html");

        let report = check_directory(tmp.path()).unwrap();
        assert_eq!(
            report.conflicts,
            vec![Conflict {
                name: "index.html".to_string(),
                is_directory: false,
            }]
        );
    }

    #[test]
    fn test_conflicting_directory_is_marked() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("src")).unwrap();

        let report = check_directory(tmp.path()).unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert!(report.conflicts[0].is_directory);
        assert_eq!(report.conflicts[0].to_string(), "src/");
    }

    #[test]
    fn test_error_logs_removed_when_clean() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "npm-debug.log.1");
        touch(tmp.path(), "yarn-error.log");
        touch(tmp.path(), "README.md");

        let report = check_directory(tmp.path()).unwrap();
        assert!(report.is_safe());
        assert_eq!(report.removed_logs, vec!["npm-debug.log.1", "yarn-error.log"]);
        assert!(!tmp.path().join("npm-debug.log.1").exists());
        assert!(!tmp.path().join("yarn-error.log").exists());
        assert!(tmp.path().join("README.md").exists());
    }

    #[test]
    fn test_error_logs_kept_when_conflicts_exist() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "npm-debug.log");
        touch(tmp.path(), "package.json");

        let report = check_directory(tmp.path()).unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert!(tmp.path().join("npm-debug.log").exists());
    }

    #[test]
    fn test_ensure_safe_returns_unsafe_directory() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "index.html");

        let err = ensure_safe(tmp.path(), "my-app").unwrap_err();
        match err {
            ScaffoldError::UnsafeDirectory { dir, conflicts } => {
                assert_eq!(dir, "my-app");
                assert_eq!(conflicts.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ensure_project_dir_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested").join("my-app");
        ensure_project_dir(&root).unwrap();
        assert!(root.is_dir());
        // idempotent
        ensure_project_dir(&root).unwrap();
    }
}
