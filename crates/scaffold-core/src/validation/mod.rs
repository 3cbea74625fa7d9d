//! Precondition gates that run before anything is spawned
//!
//! - Project name rules (npm package naming, reserved dependency names)
//! - Target directory safety (pre-existing conflicting files)

pub mod directory;
pub mod name;

pub use directory::{
    check_directory, ensure_project_dir, ensure_safe, Conflict, DirectoryConflictReport,
};
pub use name::{check_app_name, validate_package_name, ValidationResult};
