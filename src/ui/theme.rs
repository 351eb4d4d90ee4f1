//! Theme definitions for pmasetup
//!
//! Provides three built-in palettes: Gruvbox, Nord, and Plain (no colors).

use crate::config::ThemeName;
use crossterm::style::Color;

/// Colors for terminal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub fg_dim: Option<Color>,
    pub accent: Option<Color>,
    pub success: Option<Color>,
    pub warning: Option<Color>,
    pub error: Option<Color>,
}

impl Theme {
    /// Create a theme from a theme name
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Gruvbox => Self::gruvbox(),
            ThemeName::Nord => Self::nord(),
            ThemeName::Plain => Self::plain(),
        }
    }

    /// Gruvbox dark (default)
    pub fn gruvbox() -> Self {
        Self {
            fg_dim: Some(rgb(146, 131, 116)),  // #928374
            accent: Some(rgb(254, 128, 25)),   // #fe8019
            success: Some(rgb(184, 187, 38)),  // #b8bb26
            warning: Some(rgb(250, 189, 47)),  // #fabd2f
            error: Some(rgb(251, 73, 52)),     // #fb4934
        }
    }

    /// Nord
    pub fn nord() -> Self {
        Self {
            fg_dim: Some(rgb(76, 86, 106)),    // #4c566a
            accent: Some(rgb(136, 192, 208)),  // #88c0d0
            success: Some(rgb(163, 190, 140)), // #a3be8c
            warning: Some(rgb(235, 203, 139)), // #ebcb8b
            error: Some(rgb(191, 97, 106)),    // #bf616a
        }
    }

    /// No colors, used for pipes and log files
    pub fn plain() -> Self {
        Self {
            fg_dim: None,
            accent: None,
            success: None,
            warning: None,
            error: None,
        }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_has_no_colors() {
        let theme = Theme::from_name(ThemeName::Plain);
        assert!(theme.accent.is_none());
        assert!(theme.error.is_none());
    }

    #[test]
    fn test_gruvbox_error_color() {
        let theme = Theme::from_name(ThemeName::Gruvbox);
        assert_eq!(theme.error, Some(Color::Rgb { r: 251, g: 73, b: 52 }));
    }
}
