//! Template retrieval and post-fetch manifest rewrite
//!
//! This module provides:
//! - Template source resolution (product default or environment override)
//! - Template fetching through an external retrieval tool
//! - `package.json` metadata merge for the new project

pub mod fetcher;
pub mod package_json;

pub use fetcher::{TemplateFetcher, TemplateSource};
pub use package_json::merge_metadata;
