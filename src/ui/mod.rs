//! User Interface layer
//!
//! This module contains all operator-facing terminal code:
//! - Theme definitions and colors
//! - Styled status output
//! - Yes/no confirmation prompts

pub mod output;
pub mod prompt;
pub mod theme;

pub use output::Printer;
pub use prompt::{Confirm, TerminalConfirm};
pub use theme::Theme;
