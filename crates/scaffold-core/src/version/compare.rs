//! Version comparison for the running tool and the local toolchain

use anyhow::Result;
use semver::Version;

/// Compare the running version against the latest published one.
/// Returns a warning message if the running tool is strictly older.
pub fn outdated_warning(
    tool_name: &str,
    current_version: &str,
    latest_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let current = parse_version(current_version).ok()?; // can't compare, skip warning
    let latest = parse_version(latest_version).ok()?;

    if current < latest {
        Some(format!(
            "You are running `{}` {}, which is behind the latest release ({}).\n\
             Consider updating: {}",
            tool_name, current_version, latest_version, upgrade_command
        ))
    } else {
        None
    }
}

/// True when `version` parses and is at least `minimum`
pub fn meets_minimum(version: &str, minimum: &Version) -> Option<bool> {
    parse_version(version).ok().map(|v| v >= *minimum)
}

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version> {
    let trimmed = version_str.trim();
    // Remove leading 'v' if present
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}
