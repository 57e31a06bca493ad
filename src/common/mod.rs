//! # Common Components
//!
//! Shared utilities used by both the HTTP server and the command-line tool.
//!
//! ## Modules
//!
//! - [`config`]: Configuration structures and TOML loading
//! - [`logging`]: `env_logger` setup

pub mod config;
pub mod logging;
