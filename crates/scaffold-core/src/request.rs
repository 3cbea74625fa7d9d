//! The immutable request threaded through every scaffolding stage

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Which flavour of the remote template to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateVariant {
    #[default]
    SinglePage,
    MultiPage,
}

impl TemplateVariant {
    /// Suffix appended to the template source identifier
    pub fn suffix(&self) -> &'static str {
        match self {
            TemplateVariant::SinglePage => "",
            TemplateVariant::MultiPage => "-mpa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateVariant::SinglePage => "single-page",
            TemplateVariant::MultiPage => "multi-page",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Package manager used for every install-related subprocess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Cnpm,
}

impl PackageManager {
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Cnpm => "cnpm",
        }
    }

    /// Executable to spawn; the Node toolchain ships `.cmd` shims on Windows
    pub fn binary(&self) -> String {
        node_binary(self.name())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolve a Node toolchain executable name for the current platform
pub fn node_binary(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    }
}

/// Everything the user asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    /// Target directory as given by the user
    pub name: String,
    pub package_manager: PackageManager,
    /// Forward `--verbose` to the dependency installer
    pub verbose: bool,
    pub variant: TemplateVariant,
}

impl ProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_manager: PackageManager::default(),
            verbose: false,
            variant: TemplateVariant::default(),
        }
    }

    /// Absolute project root, resolved against `base`
    pub fn root_in(&self, base: &Path) -> PathBuf {
        normalize(&base.join(&self.name))
    }

    /// Absolute project root, resolved against the current directory
    pub fn root(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("Failed to read the current directory")?;
        Ok(self.root_in(&cwd))
    }
}

/// Final component of the project root, used as the package name
pub fn app_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lexically remove `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
