//! Latest published version lookup
//!
//! The registry's dist-tags endpoint is queried directly first. Environments
//! behind a firewall often only reach a private registry through the npm
//! client's own configuration, so `npm view` is tried next.

use crate::process::{CommandLine, ProcessRunner};
use crate::product::ProductConfig;
use crate::request::node_binary;
use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: String,
}

/// Client for the package registry
pub struct RegistryClient {
    base_url: Url,
    package: String,
    client: reqwest::Client,
}

impl RegistryClient {
    /// Create a new client with a custom user agent
    pub fn new(base_url: Url, package: &str, user_agent: &str) -> Self {
        Self {
            base_url,
            package: package.to_string(),
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a client from a product config, honouring its registry override variable.
    /// Returns `None` when no usable base URL exists, in which case only `npm view` is asked.
    pub fn from_config<C: ProductConfig>(config: &C) -> Option<Self> {
        let override_url = std::env::var(config.registry_url_env()).ok();
        let url = resolve_base_url(override_url.as_deref(), config.default_registry_url())?;
        Some(Self::new(url, config.name(), &config.user_agent()))
    }

    /// Build a URL by appending path segments, preserving query parameters
    fn build_url(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint returning `{ "latest": "<semver>", ... }`
    pub fn dist_tags_url(&self) -> Result<Url> {
        Self::build_url(
            &self.base_url,
            &["-", "package", self.package.as_str(), "dist-tags"],
        )
    }

    /// Ask the registry over HTTPS for the `latest` dist-tag
    pub async fn fetch_latest(&self) -> Result<String> {
        let url = self.dist_tags_url()?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch dist-tags from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch dist-tags from {}: HTTP {}",
                url,
                response.status()
            );
        }

        let tags: DistTags = response
            .json()
            .await
            .context("Failed to parse dist-tags response")?;
        Ok(tags.latest)
    }

    /// Ask the local npm client, which honours the user's registry configuration
    pub async fn query_npm<R: ProcessRunner>(&self, runner: &R) -> Option<String> {
        npm_view_version(runner, &self.package).await
    }

    /// Latest published version, or `None` when neither source answers
    pub async fn latest_version<R: ProcessRunner>(&self, runner: &R) -> Option<String> {
        match self.fetch_latest().await {
            Ok(latest) => Some(latest),
            Err(e) => {
                tracing::debug!(error = %e, "registry lookup failed, falling back to npm view");
                self.query_npm(runner).await
            }
        }
    }
}

/// Pick the registry base URL. A malformed override is ignored with a warning.
pub fn resolve_base_url(override_url: Option<&str>, default: &str) -> Option<Url> {
    if let Some(raw) = override_url {
        match Url::parse(raw) {
            Ok(url) => return Some(url),
            Err(e) => {
                tracing::warn!(url = raw, error = %e, "ignoring invalid registry override");
            }
        }
    }
    match Url::parse(default) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(url = default, error = %e, "invalid default registry URL");
            None
        }
    }
}

/// `npm view <package> version`, trimmed; `None` when npm fails or prints nothing
pub async fn npm_view_version<R: ProcessRunner>(runner: &R, package: &str) -> Option<String> {
    let command = CommandLine::new(node_binary("npm")).args(["view", package, "version"]);
    runner
        .capture_stdout(&command)
        .await
        .map(|out| out.trim().to_string())
        .filter(|v| !v.is_empty())
}
