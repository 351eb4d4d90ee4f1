//! Host environment resolution
//!
//! This module decides what the installer is running on and what to do
//! about it:
//! - Distribution and architecture detection
//! - Support table and architecture checks
//! - Selection of the dependency routine (dispatch table)

pub mod detect;
pub mod dispatch;
pub mod support;

pub use detect::{detect, HostSource, SystemHost};
pub use dispatch::{dispatch, Family, InstallPlan, PreStep, Routine};
pub use support::check_supported;
