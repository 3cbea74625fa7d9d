//! Runtime detection and the environment report
//!
//! This module provides:
//! - Tool version detection (Node.js, npm, Yarn, browsers)
//! - The `--info` environment report

pub mod check;
pub mod info;

pub use check::{check_binaries, check_browsers, RuntimeInfo};
pub use info::{collect as collect_env_report, EnvReport};
