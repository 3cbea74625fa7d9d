//! Scaffolding workflow
//!
//! Stages run strictly in order and any gate may abort the run:
//!
//! 1. Name validation (nothing is spawned before it passes)
//! 2. Directory creation and safety check
//! 3. Version advisories (tool, Node.js, npm)
//! 4. Template fetch
//! 5. `package.json` metadata merge
//! 6. npm working-directory check
//! 7. Dependency install

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::install::install_dependencies;
use crate::process::ProcessRunner;
use crate::product::ProductConfig;
use crate::request::{app_name, PackageManager, ProjectRequest};
use crate::templates::{merge_metadata, TemplateFetcher, TemplateSource};
use crate::validation::{check_app_name, ensure_project_dir, ensure_safe};
use crate::version::{self, RegistryClient};
use anyhow::Context;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// How the template fetch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched,
    /// The retrieval failed; the run carried on regardless
    Failed { command: String, reason: String },
}

/// What a completed run did
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    pub app_name: String,
    /// Non-fatal warnings printed along the way
    pub advisories: Vec<String>,
    pub fetch: FetchOutcome,
    /// Error logs from earlier attempts that were cleaned up
    pub removed_logs: Vec<String>,
}

/// Drives one project through every stage
pub struct Scaffolder<'a, C, R> {
    config: &'a C,
    runner: &'a R,
    registry: Option<RegistryClient>,
    template: TemplateSource,
    base_dir: PathBuf,
}

impl<'a, C: ProductConfig, R: ProcessRunner> Scaffolder<'a, C, R> {
    /// Build a scaffolder rooted at the current directory
    pub fn new(config: &'a C, runner: &'a R) -> anyhow::Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to read the current directory")?;
        Ok(Self {
            config,
            runner,
            registry: RegistryClient::from_config(config),
            template: TemplateSource::from_config(config),
            base_dir,
        })
    }

    /// Resolve project names against `dir` instead of the current directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    #[instrument(skip_all, fields(project = %request.name, variant = %request.variant))]
    pub async fn run(&self, request: &ProjectRequest) -> ScaffoldResult<ScaffoldReport> {
        let root = request.root_in(&self.base_dir);
        let app_name = app_name(&root);

        check_app_name(&app_name, self.config.reserved_names())?;
        tracing::debug!(root = %root.display(), "project name accepted");

        ensure_project_dir(&root)?;
        let directory = ensure_safe(&root, &request.name)?;
        println!();

        let advisories = self.check_versions().await;

        let fetch = self.fetch_template(request, &root).await;

        println!(
            "Creating a new {} {} app in {}.",
            self.config.display_name(),
            request.variant,
            root.display().to_string().green()
        );
        println!();

        merge_metadata(&root, &app_name)?;

        if request.package_manager == PackageManager::Npm {
            version::check_npm_cwd(self.runner, &root).await?;
        }

        println!("Installing packages. This might take a couple of minutes.");
        install_dependencies(self.runner, request.package_manager, request.verbose, &root).await?;

        self.print_next_steps(request, &root);
        tracing::info!(root = %root.display(), "project created");

        Ok(ScaffoldReport {
            root,
            app_name,
            advisories,
            fetch,
            removed_logs: directory.removed_logs,
        })
    }

    /// Advisory checks; each prints its own warning and none can fail the run
    async fn check_versions(&self) -> Vec<String> {
        let mut advisories = Vec::new();

        let latest = match &self.registry {
            Some(registry) => registry.latest_version(self.runner).await,
            None => version::registry::npm_view_version(self.runner, self.config.name()).await,
        };
        if let Some(latest) = latest {
            tracing::debug!(%latest, current = self.config.version(), "latest release");
            advisories.extend(version::outdated_warning(
                self.config.name(),
                self.config.version(),
                &latest,
                self.config.upgrade_command(),
            ));
        }
        advisories.extend(version::check_node_version(self.runner).await);
        advisories.extend(version::check_npm_version(self.runner).await);

        for advisory in &advisories {
            eprintln!("{}", advisory.yellow());
            eprintln!();
        }
        advisories
    }

    /// Fetch the template; a failure is reported and the run continues
    async fn fetch_template(&self, request: &ProjectRequest, root: &Path) -> FetchOutcome {
        let fetcher = TemplateFetcher::new(self.template.clone(), self.runner);
        println!("Pulling the template...");

        match fetcher.fetch(request.variant, root).await {
            Ok(()) => FetchOutcome::Fetched,
            Err(e) => {
                let command = match &e {
                    ScaffoldError::Fetch { command } => command.clone(),
                    _ => fetcher.command(request.variant, root).to_string(),
                };
                tracing::warn!(error = %e, "template fetch failed, continuing");
                eprintln!("{} {}", "Template fetch failed:".red(), e);
                FetchOutcome::Failed {
                    command,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn print_next_steps(&self, request: &ProjectRequest, root: &Path) {
        println!();
        println!("{}", "Dependencies installed.".green().bold());
        println!();
        for step in self.config.next_steps(&request.name, root) {
            println!("    {}", step.blue().bold());
            println!();
        }
        println!("{}", "Now start building your project!".green().bold());
    }
}
