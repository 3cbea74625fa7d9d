//! Generated metadata written into the fetched template's `package.json`

use crate::error::{ScaffoldError, ScaffoldResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Version every new project starts at
pub const INITIAL_VERSION: &str = "1.0.0";

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Overlay `name`, `version` and `private` onto a manifest object.
/// The generated fields come first; every other field keeps its original order.
pub fn overlay_metadata(manifest: Map<String, Value>, app_name: &str) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert("name".to_string(), Value::from(app_name));
    merged.insert("version".to_string(), Value::from(INITIAL_VERSION));
    merged.insert("private".to_string(), Value::Bool(true));

    for (key, value) in manifest {
        if !merged.contains_key(&key) {
            merged.insert(key, value);
        }
    }
    merged
}

/// Two-space indented JSON followed by the platform line ending
pub fn render(manifest: &Map<String, Value>) -> ScaffoldResult<String> {
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| ScaffoldError::Other(anyhow::Error::new(e)))?;
    Ok(format!("{}{}", json, LINE_ENDING))
}

/// Rewrite `<root>/package.json` with the project's own metadata
pub fn merge_metadata(root: &Path, app_name: &str) -> ScaffoldResult<PathBuf> {
    let path = root.join("package.json");
    let content = std::fs::read_to_string(&path).map_err(|source| ScaffoldError::ManifestRead {
        path: path.clone(),
        source,
    })?;
    let value: Value =
        serde_json::from_str(&content).map_err(|source| ScaffoldError::ManifestParse {
            path: path.clone(),
            source,
        })?;
    let Value::Object(manifest) = value else {
        return Err(ScaffoldError::ManifestShape { path });
    };

    let merged = overlay_metadata(manifest, app_name);
    std::fs::write(&path, render(&merged)?).map_err(|source| ScaffoldError::Io {
        context: format!("Failed to write {}", path.display()),
        source,
    })?;

    tracing::debug!(path = %path.display(), "package.json updated");
    Ok(path)
}
