//! Local toolchain checks: Node.js and npm versions, npm working directory

use super::compare::{meets_minimum, parse_version};
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::process::{CommandLine, ProcessRunner};
use crate::request::node_binary;
use semver::Version;
use std::path::{Path, PathBuf};

/// Oldest npm that installs the template's lockfile correctly
pub const MIN_NPM_VERSION: Version = Version::new(6, 0, 0);

/// Oldest Node.js major the generated project supports
pub const MIN_NODE_MAJOR: u64 = 10;

/// Prefix of the line `npm config list` prints for its working directory
const NPM_CWD_PREFIX: &str = "; cwd = ";

/// Result of reading the local npm version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmInfo {
    pub version: Option<String>,
    /// `None` when the version could not be read or parsed
    pub has_min_npm: Option<bool>,
}

pub async fn npm_info<R: ProcessRunner>(runner: &R) -> NpmInfo {
    let version = runner
        .capture_stdout(&CommandLine::new(node_binary("npm")).arg("--version"))
        .await
        .map(|out| out.trim().to_string())
        .filter(|v| !v.is_empty());
    let has_min_npm = version
        .as_deref()
        .and_then(|v| meets_minimum(v, &MIN_NPM_VERSION));
    NpmInfo {
        version,
        has_min_npm,
    }
}

/// Warn when npm is older than [`MIN_NPM_VERSION`]; skip silently when unreadable
pub async fn check_npm_version<R: ProcessRunner>(runner: &R) -> Option<String> {
    let info = npm_info(runner).await;
    tracing::debug!(?info, "npm version");
    match (info.version, info.has_min_npm) {
        (Some(version), Some(false)) => Some(format!(
            "You are using npm {} so the project will be bootstrapped with an old unsupported version of tools.\n\n\
             Please update to npm {} or higher for a better, fully supported experience.",
            version, MIN_NPM_VERSION.major
        )),
        _ => None,
    }
}

/// Warn when Node.js is older than [`MIN_NODE_MAJOR`]; skip silently when unreadable
pub async fn check_node_version<R: ProcessRunner>(runner: &R) -> Option<String> {
    let raw = runner
        .capture_stdout(&CommandLine::new("node").arg("--version"))
        .await?;
    let version = parse_version(&raw).ok()?;
    tracing::debug!(%version, "node version");
    if version.major < MIN_NODE_MAJOR {
        Some(format!(
            "You are using Node {}; projects generated on this version are unsupported.\n\n\
             Please update to Node {} or higher for a better, fully supported experience.",
            raw.trim(),
            MIN_NODE_MAJOR
        ))
    } else {
        None
    }
}

/// Working directory reported by `npm config list`, if any
fn parse_npm_cwd(output: &str) -> Option<PathBuf> {
    output
        .lines()
        .find_map(|line| line.trim_end().strip_prefix(NPM_CWD_PREFIX))
        .map(PathBuf::from)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Verify a freshly spawned npm sees `root` as its working directory.
///
/// A misconfigured shell (e.g. a Windows `AutoRun` entry) can silently move
/// child processes elsewhere, which would install dependencies into the wrong
/// project. If npm can't be queried, or its output format changed, the check
/// passes.
pub async fn check_npm_cwd<R: ProcessRunner>(runner: &R, root: &Path) -> ScaffoldResult<()> {
    let command = CommandLine::new(node_binary("npm"))
        .args(["config", "list"])
        .current_dir(root);
    let Some(output) = runner.capture_stdout(&command).await else {
        return Ok(());
    };
    let Some(npm_cwd) = parse_npm_cwd(&output) else {
        return Ok(());
    };

    if same_dir(&npm_cwd, root) {
        Ok(())
    } else {
        Err(ScaffoldError::NpmCwdMismatch {
            expected: root.to_path_buf(),
            actual: npm_cwd,
        })
    }
}
