//! Dependency installation through the selected package manager

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::process::{CommandLine, ProcessRunner};
use crate::request::PackageManager;
use std::path::Path;

/// Arguments passed to every install: pin exact versions, only print errors
const INSTALL_ARGS: &[&str] = &["install", "--save", "--save-exact", "--loglevel", "error"];

/// The install command for `package_manager`, run inside `root`
pub fn install_command(package_manager: PackageManager, verbose: bool, root: &Path) -> CommandLine {
    let mut command = CommandLine::new(package_manager.binary())
        .args(INSTALL_ARGS.iter().copied())
        .current_dir(root);
    if verbose {
        command = command.arg("--verbose");
    }
    command
}

/// Install the project's declared dependencies with inherited stdio
pub async fn install_dependencies<R: ProcessRunner>(
    runner: &R,
    package_manager: PackageManager,
    verbose: bool,
    root: &Path,
) -> ScaffoldResult<()> {
    let command = install_command(package_manager, verbose, root);
    tracing::info!(command = %command, "installing dependencies");

    let outcome = runner
        .run_inherited(&command)
        .await
        .map_err(|source| ScaffoldError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if outcome.success() {
        Ok(())
    } else {
        tracing::error!(command = %outcome.command_line, code = outcome.exit_code, "install failed");
        Err(ScaffoldError::Install {
            command: outcome.command_line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use tempfile::TempDir;

    #[test]
    fn test_install_command_npm() {
        let command = install_command(PackageManager::Npm, false, Path::new("/tmp/app"));
        assert_eq!(
            crate::process::testing::key(&command),
            "npm install --save --save-exact --loglevel error"
        );
    }

    #[test]
    fn test_install_command_cnpm_verbose() {
        let command = install_command(PackageManager::Cnpm, true, Path::new("/tmp/app"));
        assert_eq!(
            crate::process::testing::key(&command),
            "cnpm install --save --save-exact --loglevel error --verbose"
        );
    }

    #[tokio::test]
    async fn test_install_runs_in_project_root() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        install_dependencies(&runner, PackageManager::Npm, false, tmp.path())
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd.as_deref(), Some(tmp.path()));
    }

    #[tokio::test]
    async fn test_install_failure_carries_command() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new().exit_with("npm install", 1);
        let err = install_dependencies(&runner, PackageManager::Npm, false, tmp.path())
            .await
            .unwrap_err();

        let expected = install_command(PackageManager::Npm, false, tmp.path()).to_string();
        assert_eq!(err.command(), Some(expected.as_str()));
        assert!(matches!(err, ScaffoldError::Install { .. }));
    }
}
