//! Errors raised by the scaffolding stages

use crate::validation::directory::Conflict;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Broad classes of failure, used for reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing project name
    UserInput,
    /// Something on the machine conflicts with the new project
    EnvironmentConflict,
    /// An external tool exited non-zero
    Subprocess,
    /// Filesystem or manifest failure
    Internal,
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(
        "Cannot create a project named \"{name}\" because of npm naming restrictions:\n\n{}\n\nPlease choose a different project name.",
        bullet_list(problems)
    )]
    InvalidName { name: String, problems: Vec<String> },

    #[error(
        "Cannot create a project named \"{name}\" because a dependency with the same name exists.\nDue to the way npm works, the following names are not allowed:\n\n{}\n\nPlease choose a different project name.",
        indented(reserved)
    )]
    ReservedName { name: String, reserved: Vec<String> },

    #[error(
        "The directory {dir} contains files that could conflict:\n\n{}\n\nEither try using a new directory name, or remove the files listed above.",
        ConflictList(conflicts)
    )]
    UnsafeDirectory { dir: String, conflicts: Vec<Conflict> },

    #[error(
        "Could not start an npm process in the right directory.\n\nThe current directory is: {}\nHowever, a newly started npm process runs in: {}\n\nThis is probably caused by a misconfigured system terminal shell.",
        expected.display(),
        actual.display()
    )]
    NpmCwdMismatch { expected: PathBuf, actual: PathBuf },

    #[error("Template fetch failed: `{command}` exited with a non-zero status")]
    Fetch { command: String },

    #[error("Dependency install failed: `{command}` exited with a non-zero status")]
    Install { command: String },

    #[error("Failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not contain a JSON object", path.display())]
    ManifestShape { path: PathBuf },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScaffoldError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. } | Self::ReservedName { .. } => ErrorCategory::UserInput,
            Self::UnsafeDirectory { .. } | Self::NpmCwdMismatch { .. } => {
                ErrorCategory::EnvironmentConflict
            }
            Self::Fetch { .. } | Self::Install { .. } | Self::Spawn { .. } => {
                ErrorCategory::Subprocess
            }
            Self::ManifestRead { .. }
            | Self::ManifestParse { .. }
            | Self::ManifestShape { .. }
            | Self::Io { .. }
            | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS; every failure exits with 1
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Command line of the subprocess that failed, if any
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Fetch { command } | Self::Install { command } | Self::Spawn { command, .. } => {
                Some(command)
            }
            _ => None,
        }
    }

    /// Platform-specific advice printed after the error message
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NpmCwdMismatch { .. } if cfg!(windows) => Some(COMMAND_PROCESSOR_AUTORUN_FIX),
            _ => None,
        }
    }
}

/// A Command Processor `AutoRun` entry that changes directory makes every new
/// cmd.exe, npm included, start somewhere else
pub const COMMAND_PROCESSOR_AUTORUN_FIX: &str = "\
On Windows, this can usually be fixed by running:

  reg delete \"HKCU\\Software\\Microsoft\\Command Processor\" /v AutoRun /f
  reg delete \"HKLM\\Software\\Microsoft\\Command Processor\" /v AutoRun /f

Try running the above two lines in the terminal.
To learn more about this problem, read: https://blogs.msdn.microsoft.com/oldnewthing/20071121-00/?p=24433/";

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  * {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indented(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

struct ConflictList<'a>(&'a [Conflict]);

impl fmt::Display for ConflictList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conflict) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", conflict)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_lists_every_problem() {
        let err = ScaffoldError::InvalidName {
            name: ".Bad".to_string(),
            problems: vec![
                "name cannot start with a period".to_string(),
                "name can no longer contain capital letters".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("  * name cannot start with a period"));
        assert!(msg.contains("  * name can no longer contain capital letters"));
        assert_eq!(err.category(), ErrorCategory::UserInput);
    }

    #[test]
    fn test_reserved_name_message_differs_from_invalid_name() {
        let err = ScaffoldError::ReservedName {
            name: "svelte".to_string(),
            reserved: vec!["svelte".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("a dependency with the same name exists"));
        assert!(!msg.contains("naming restrictions"));
    }

    #[test]
    fn test_unsafe_directory_marks_directories() {
        let err = ScaffoldError::UnsafeDirectory {
            dir: "my-app".to_string(),
            conflicts: vec![
                Conflict {
                    name: "index.html".to_string(),
                    is_directory: false,
                },
                Conflict {
                    name: "src".to_string(),
                    is_directory: true,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("  index.html\n  src/"));
        assert_eq!(err.category(), ErrorCategory::EnvironmentConflict);
    }

    #[test]
    fn test_install_error_carries_command() {
        let err = ScaffoldError::Install {
            command: "npm install --save --save-exact --loglevel error".to_string(),
        };
        assert_eq!(
            err.command(),
            Some("npm install --save --save-exact --loglevel error")
        );
        assert!(err.to_string().contains("npm install --save"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_npm_cwd_mismatch_hint_only_on_windows() {
        let err = ScaffoldError::NpmCwdMismatch {
            expected: PathBuf::from("/work/my-app"),
            actual: PathBuf::from("/home/user"),
        };
        assert_eq!(err.category(), ErrorCategory::EnvironmentConflict);
        assert_eq!(err.hint().is_some(), cfg!(windows));
        assert!(COMMAND_PROCESSOR_AUTORUN_FIX
            .contains(r#"reg delete "HKCU\Software\Microsoft\Command Processor" /v AutoRun /f"#));
        assert!(COMMAND_PROCESSOR_AUTORUN_FIX
            .contains(r#"reg delete "HKLM\Software\Microsoft\Command Processor" /v AutoRun /f"#));
    }

    #[test]
    fn test_other_errors_have_no_hint() {
        let err = ScaffoldError::Install {
            command: "npm install".to_string(),
        };
        assert!(err.hint().is_none());
    }
}
