//! Runtime and tool detection for the environment report

use crate::process::{CommandLine, ProcessRunner};
use crate::request::node_binary;

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    fn missing(name: &'static str) -> Self {
        RuntimeInfo {
            name,
            version: None,
            available: false,
        }
    }

    /// Version for display, `Not Found` when absent
    pub fn display_version(&self) -> &str {
        self.version.as_deref().unwrap_or("Not Found")
    }
}

/// Pull the first version-looking token out of a `--version` banner
pub fn extract_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .map(|token| token.trim_start_matches('v').trim_end_matches(','))
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Try each candidate command in turn; the first that answers wins
pub async fn detect<R: ProcessRunner>(
    runner: &R,
    name: &'static str,
    candidates: &[CommandLine],
) -> RuntimeInfo {
    for command in candidates {
        if let Some(out) = runner.capture_stdout(command).await {
            if let Some(version) = extract_version(&out) {
                return RuntimeInfo {
                    name,
                    version: Some(version),
                    available: true,
                };
            }
        }
    }
    RuntimeInfo::missing(name)
}

fn version_of(program: &str) -> CommandLine {
    CommandLine::new(program).arg("--version")
}

/// Check Node.js, npm and Yarn
pub async fn check_binaries<R: ProcessRunner>(runner: &R) -> Vec<RuntimeInfo> {
    vec![
        detect(runner, "Node", &[version_of("node")]).await,
        detect(runner, "npm", &[version_of(&node_binary("npm"))]).await,
        detect(runner, "Yarn", &[version_of(&node_binary("yarn"))]).await,
    ]
}

/// Check the browsers the development server is usually opened in
pub async fn check_browsers<R: ProcessRunner>(runner: &R) -> Vec<RuntimeInfo> {
    let chrome = [
        version_of("google-chrome"),
        version_of("google-chrome-stable"),
        version_of("chromium"),
    ];
    let edge = [version_of("microsoft-edge"), version_of("microsoft-edge-stable")];
    let firefox = [version_of("firefox")];
    let safari: Vec<CommandLine> = if cfg!(target_os = "macos") {
        vec![CommandLine::new("defaults").args([
            "read",
            "/Applications/Safari.app/Contents/Info",
            "CFBundleShortVersionString",
        ])]
    } else {
        Vec::new()
    };
    let internet_explorer: Vec<CommandLine> = if cfg!(windows) {
        vec![CommandLine::new("reg").args([
            "query",
            r"HKLM\Software\Microsoft\Internet Explorer",
            "/v",
            "svcVersion",
        ])]
    } else {
        Vec::new()
    };

    vec![
        detect(runner, "Chrome", &chrome).await,
        detect(runner, "Edge", &edge).await,
        detect(runner, "Firefox", &firefox).await,
        detect(runner, "Internet Explorer", &internet_explorer).await,
        detect(runner, "Safari", &safari).await,
    ]
}
