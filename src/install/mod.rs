//! Installation layer
//!
//! Everything that touches the host after the environment has been
//! resolved:
//! - Command execution (with dry-run)
//! - Dependency routines per distribution
//! - phpMyAdmin and nginx configuration

pub mod commands;
pub mod configure;
pub mod dependencies;

pub use commands::{CommandRunner, SystemRunner};
pub use configure::{configure, ensure_sources, WebLayout};
pub use dependencies::install_dependencies;
