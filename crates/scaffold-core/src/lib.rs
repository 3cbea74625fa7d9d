//! Scaffold Core - Shared library for project scaffolding CLIs
//!
//! This library creates a new project from a remote template: it validates the
//! project name, makes sure the target directory is safe to write into, fetches
//! the template, stamps the project's own metadata into `package.json` and
//! installs dependencies. Package management and template retrieval are
//! delegated to external tools run as subprocesses.
//!
//! # Architecture
//!
//! - **Gates** - [`validation`] (name rules, directory safety) and [`version`]
//!   (advisory version checks)
//! - **Stages** - [`templates`] (fetch, manifest merge) and [`install`]
//! - **Workflow** - [`Scaffolder`] runs the stages in order for one
//!   [`ProjectRequest`], configured by a [`ProductConfig`]
//! - **Seam** - every subprocess goes through [`ProcessRunner`]
//!
//! # Example Usage
//!
//! ```ignore
//! use scaffold_core::{ProjectRequest, Scaffolder, SystemRunner};
//!
//! let runner = SystemRunner;
//! let scaffolder = Scaffolder::new(&MyConfig, &runner)?;
//! let report = scaffolder.run(&ProjectRequest::new("my-app")).await?;
//! ```

pub mod error;
pub mod install;
pub mod process;
pub mod product;
pub mod request;
pub mod runtime;
pub mod scaffold;
pub mod templates;
pub mod validation;
pub mod version;

// Re-export main types for convenience
pub use error::{ErrorCategory, ScaffoldError, ScaffoldResult};
pub use process::{CommandLine, ProcessRunner, SubprocessOutcome, SystemRunner};
pub use product::ProductConfig;
pub use request::{PackageManager, ProjectRequest, TemplateVariant};
pub use runtime::{collect_env_report, EnvReport};
pub use scaffold::{FetchOutcome, ScaffoldReport, Scaffolder};
pub use validation::{Conflict, DirectoryConflictReport, ValidationResult};
