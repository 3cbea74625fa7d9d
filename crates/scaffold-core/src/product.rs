//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface that each scaffolding binary implements
//! to describe its own identity, template source and registry package.

use std::path::Path;

/// Configuration trait for scaffolding products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name, version)
/// - Template source and registry locations
/// - Names a generated project may not take
/// - Post-install instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Tool name, also the package name published on the registry
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Version of the running tool
    fn version(&self) -> &'static str;

    /// Base template identifier passed to the retrieval tool (`user/repo`)
    fn default_template_source(&self) -> &'static str;

    /// Environment variable name for overriding the template source
    fn template_source_env(&self) -> &'static str;

    /// Base URL of the package registry
    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// Dependencies declared by the generated project; the project may not share their names
    fn reserved_names(&self) -> &'static [&'static str];

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Where users should report problems
    fn issues_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after the dependencies are installed
    fn next_steps(&self, project: &str, dir: &Path) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> String {
        format!("{}/{}", self.name(), self.version())
    }
}
