//! Template retrieval
//!
//! Templates live in a remote repository and are copied (without git history)
//! by `degit`, run through `npx` so nothing has to be installed globally.

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::process::{CommandLine, ProcessRunner};
use crate::product::ProductConfig;
use crate::request::{node_binary, TemplateVariant};
use std::path::Path;

/// Remote template identifier, before the variant suffix is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    base: String,
}

impl TemplateSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Create a template source from a product config, honouring its override variable
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        let base = std::env::var(config.template_source_env())
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| config.default_template_source().to_string());
        Self::new(base)
    }

    /// Identifier of the requested variant, e.g. `user/repo-mpa`
    pub fn identifier(&self, variant: TemplateVariant) -> String {
        format!("{}{}", self.base, variant.suffix())
    }
}

/// Template fetcher - copies a remote template into the project root
pub struct TemplateFetcher<'a, R> {
    source: TemplateSource,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> TemplateFetcher<'a, R> {
    pub fn new(source: TemplateSource, runner: &'a R) -> Self {
        Self { source, runner }
    }

    /// The retrieval command for `variant` into `root`
    pub fn command(&self, variant: TemplateVariant, root: &Path) -> CommandLine {
        let mut command = CommandLine::new(node_binary("npx"))
            .arg("degit")
            .arg(self.source.identifier(variant))
            .arg(root.to_string_lossy());
        if let Some(parent) = root.parent() {
            command = command.current_dir(parent);
        }
        command
    }

    /// Run the retrieval with inherited stdio so progress is visible
    pub async fn fetch(&self, variant: TemplateVariant, root: &Path) -> ScaffoldResult<()> {
        let command = self.command(variant, root);
        tracing::info!(command = %command, "fetching template");

        let outcome = self
            .runner
            .run_inherited(&command)
            .await
            .map_err(|source| ScaffoldError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if outcome.success() {
            Ok(())
        } else {
            Err(ScaffoldError::Fetch {
                command: outcome.command_line,
            })
        }
    }

    /// Get the template source
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }
}
