//! Version Gatekeeper
//!
//! Best-effort diagnostics run before the template is fetched:
//! - Is a newer release of this tool published?
//! - Are the local Node.js and npm recent enough?
//!
//! Nothing in this module can abort the flow.

pub mod compare;
pub mod package_manager;
pub mod registry;

pub use compare::{outdated_warning, parse_version};
pub use package_manager::{check_node_version, check_npm_cwd, check_npm_version};
pub use registry::RegistryClient;
