//! Environment report printed by `--info`, for pasting into bug reports

use super::check::{self, RuntimeInfo};
use crate::process::{CommandLine, ProcessRunner};
use crate::product::ProductConfig;
use crate::request::node_binary;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// One titled block of `key: value` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub entries: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvReport {
    pub sections: Vec<Section>,
}

impl fmt::Display for EnvReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "  {}:", section.title)?;
            for (key, value) in &section.entries {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PackageVersion {
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalListing {
    #[serde(default)]
    dependencies: BTreeMap<String, PackageVersion>,
}

fn runtime_entries(infos: Vec<RuntimeInfo>) -> Vec<(String, String)> {
    infos
        .into_iter()
        .map(|info| (info.name.to_string(), info.display_version().to_string()))
        .collect()
}

fn system_entries() -> Vec<(String, String)> {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    vec![
        (
            "OS".to_string(),
            format!("{} {}", std::env::consts::OS, std::env::consts::FAMILY),
        ),
        (
            "CPU".to_string(),
            format!("({}) {}", cores, std::env::consts::ARCH),
        ),
    ]
}

/// Version of a package installed in `project_dir/node_modules`
pub fn local_package_version(project_dir: &Path, package: &str) -> Option<String> {
    let manifest = project_dir
        .join("node_modules")
        .join(package)
        .join("package.json");
    let content = std::fs::read_to_string(manifest).ok()?;
    serde_json::from_str::<PackageVersion>(&content)
        .ok()?
        .version
}

/// Version of a globally installed package, read from `npm ls -g`
pub async fn global_package_version<R: ProcessRunner>(runner: &R, package: &str) -> Option<String> {
    let command =
        CommandLine::new(node_binary("npm")).args(["ls", "-g", "--depth=0", "--json", package]);
    let output = runner.capture_stdout(&command).await?;
    let listing: GlobalListing = serde_json::from_str(&output).ok()?;
    listing.dependencies.get(package)?.version.clone()
}

/// Collect everything the report shows
pub async fn collect<C: ProductConfig, R: ProcessRunner>(
    config: &C,
    runner: &R,
    project_dir: &Path,
) -> EnvReport {
    let not_found = || "Not Found".to_string();

    let npm_packages: Vec<(String, String)> = config
        .reserved_names()
        .iter()
        .map(|name| {
            (
                name.to_string(),
                local_package_version(project_dir, name).unwrap_or_else(not_found),
            )
        })
        .collect();

    let global = global_package_version(runner, config.name())
        .await
        .unwrap_or_else(not_found);

    EnvReport {
        sections: vec![
            Section {
                title: "System",
                entries: system_entries(),
            },
            Section {
                title: "Binaries",
                entries: runtime_entries(check::check_binaries(runner).await),
            },
            Section {
                title: "Browsers",
                entries: runtime_entries(check::check_browsers(runner).await),
            },
            Section {
                title: "npmPackages",
                entries: npm_packages,
            },
            Section {
                title: "npmGlobalPackages",
                entries: vec![(config.name().to_string(), global)],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use crate::product::testing::TestProduct;
    use tempfile::TempDir;

    #[test]
    fn test_render_sections() {
        let report = EnvReport {
            sections: vec![Section {
                title: "Binaries",
                entries: vec![
                    ("Node".to_string(), "18.17.1".to_string()),
                    ("Yarn".to_string(), "Not Found".to_string()),
                ],
            }],
        };
        assert_eq!(
            report.to_string(),
            "  Binaries:\n    Node: 18.17.1\n    Yarn: Not Found\n"
        );
    }

    #[test]
    fn test_local_package_version() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("node_modules").join("svelte");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("package.json"), r#"{"name":"svelte","version":"3.59.2"}"#)
            .unwrap();

        assert_eq!(
            local_package_version(tmp.path(), "svelte").as_deref(),
            Some("3.59.2")
        );
        assert_eq!(local_package_version(tmp.path(), "rollup"), None);
    }

    #[tokio::test]
    async fn test_collect_reports_every_section() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new()
            .output("node --version", "v18.17.1\n")
            .output(
                "npm ls -g",
                r#"{"dependencies":{"db-create-svelte":{"version":"1.0.3"}}}"#,
            );

        let report = collect(&TestProduct::default(), &runner, tmp.path()).await;
        let titles: Vec<&str> = report.sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["System", "Binaries", "Browsers", "npmPackages", "npmGlobalPackages"]
        );

        let rendered = report.to_string();
        assert!(rendered.contains("Node: 18.17.1"));
        assert!(rendered.contains("svelte: Not Found"));
        assert!(rendered.contains("db-create-svelte: 1.0.3"));
    }
}
