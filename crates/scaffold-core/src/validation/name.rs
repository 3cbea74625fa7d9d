//! npm package name rules
//!
//! A new project must be publishable under its directory name, so the name is
//! held to the same rules the npm registry applies to new packages. Every
//! violation is collected before reporting.

use crate::error::{ScaffoldError, ScaffoldResult};

/// Names the registry refuses outright
const BLOCKED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// Node core modules; a package may not shadow them
const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

const MAX_LENGTH: usize = 214;

/// Characters that survive URI component encoding unchanged
const SPECIAL_CHARS: &[char] = &['~', '\'', '!', '(', ')', '*'];

/// Outcome of checking a name against the registry rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Violations that make the name unusable for any package
    pub errors: Vec<String>,
    /// Violations that only block new packages
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn valid_for_new_packages(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Errors followed by warnings, in the order they were found
    pub fn problems(&self) -> Vec<String> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect()
    }
}

/// Check `name` against every npm naming rule
pub fn validate_package_name(name: &str) -> ValidationResult {
    let mut result = ValidationResult::default();

    if name.is_empty() {
        result
            .errors
            .push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        result
            .errors
            .push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        result
            .errors
            .push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        result
            .errors
            .push("name cannot contain leading or trailing spaces".to_string());
    }
    let lower = name.to_lowercase();
    for blocked in BLOCKED_NAMES {
        if lower == *blocked {
            result
                .errors
                .push(format!("{} is not a valid package name", blocked));
        }
    }

    if CORE_MODULES.contains(&lower.as_str()) {
        result.warnings.push(format!("{} is a core module name", name));
    }
    if name.chars().count() > MAX_LENGTH {
        result.warnings.push(format!(
            "name can no longer contain more than {} characters",
            MAX_LENGTH
        ));
    }
    if lower != name {
        result
            .warnings
            .push("name can no longer contain capital letters".to_string());
    }
    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(SPECIAL_CHARS) {
        result.warnings.push(
            "name can no longer contain special characters (\"~'!()*\")".to_string(),
        );
    }

    if !is_url_friendly(name) {
        result
            .errors
            .push("name can only contain URL-friendly characters".to_string());
    }

    result
}

/// A name is URL-friendly when URI component encoding leaves it unchanged,
/// or when it is `@scope/name` with both halves unchanged
fn is_url_friendly(name: &str) -> bool {
    if name.chars().all(is_unreserved) {
        return true;
    }
    if let Some(scoped) = name.strip_prefix('@') {
        if let Some((scope, package)) = scoped.split_once('/') {
            return !scope.is_empty()
                && !package.is_empty()
                && scope.chars().all(is_unreserved)
                && package.chars().all(is_unreserved);
        }
    }
    false
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
}

/// Gate the flow on the app name: naming rules first, then reserved dependency names
pub fn check_app_name(name: &str, reserved: &[&str]) -> ScaffoldResult<()> {
    let result = validate_package_name(name);
    if !result.valid_for_new_packages() {
        tracing::debug!(name, ?result, "project name rejected");
        return Err(ScaffoldError::InvalidName {
            name: name.to_string(),
            problems: result.problems(),
        });
    }

    let mut dependencies: Vec<String> = reserved.iter().map(|s| s.to_string()).collect();
    dependencies.sort();
    if dependencies.iter().any(|dep| dep == name) {
        tracing::debug!(name, "project name collides with a dependency");
        return Err(ScaffoldError::ReservedName {
            name: name.to_string(),
            reserved: dependencies,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_valid() {
        for name in ["my-app", "svelte-site", "app.2", "a_b", "@scope/pkg"] {
            let result = validate_package_name(name);
            assert!(result.valid_for_new_packages(), "{name}: {result:?}");
        }
    }

    #[test]
    fn test_invalid_characters_are_errors() {
        for name in ["my app", "app#1", "a/b", "über", "what?"] {
            let result = validate_package_name(name);
            assert!(
                result
                    .errors
                    .contains(&"name can only contain URL-friendly characters".to_string()),
                "{name}: {result:?}"
            );
        }
    }

    #[test]
    fn test_all_problems_are_collected() {
        let result = validate_package_name(".My App");
        assert!(result
            .errors
            .contains(&"name cannot start with a period".to_string()));
        assert!(result
            .errors
            .contains(&"name can only contain URL-friendly characters".to_string()));
        assert!(result
            .warnings
            .contains(&"name can no longer contain capital letters".to_string()));
        assert_eq!(result.problems().len(), 3);
    }

    #[test]
    fn test_leading_underscore_and_spaces() {
        let result = validate_package_name("_app");
        assert_eq!(result.errors, vec!["name cannot start with an underscore"]);

        let result = validate_package_name(" app");
        assert!(result
            .errors
            .contains(&"name cannot contain leading or trailing spaces".to_string()));
    }

    #[test]
    fn test_empty_name() {
        let result = validate_package_name("");
        assert_eq!(result.errors, vec!["name length must be greater than zero"]);
    }

    #[test]
    fn test_blocked_and_core_module_names() {
        let result = validate_package_name("node_modules");
        assert_eq!(result.errors, vec!["node_modules is not a valid package name"]);

        let result = validate_package_name("http");
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings, vec!["http is a core module name"]);
    }

    #[test]
    fn test_length_limit() {
        let long = "a".repeat(215);
        let result = validate_package_name(&long);
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain more than 214 characters"]
        );
        assert!(validate_package_name(&"a".repeat(214)).valid_for_new_packages());
    }

    #[test]
    fn test_special_characters_are_warnings() {
        let result = validate_package_name("app!");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain special characters (\"~'!()*\")"]
        );
    }

    #[test]
    fn test_check_app_name_invalid() {
        let err = check_app_name("My App", &["svelte"]).unwrap_err();
        match err {
            ScaffoldError::InvalidName { name, problems } => {
                assert_eq!(name, "My App");
                assert_eq!(problems.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_app_name_reserved() {
        let err = check_app_name("svelte", &["svelte", "rollup"]).unwrap_err();
        match err {
            ScaffoldError::ReservedName { name, reserved } => {
                assert_eq!(name, "svelte");
                assert_eq!(reserved, vec!["rollup", "svelte"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reserved_match_is_case_sensitive() {
        // "Svelte" fails the capital-letter rule, not the reserved-name rule
        let err = check_app_name("Svelte", &["svelte"]).unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidName { .. }));
        assert!(check_app_name("svelte-app", &["svelte"]).is_ok());
    }
}
