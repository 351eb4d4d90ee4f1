//! Styled operator-facing output

use crate::ui::Theme;
use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use std::io;

/// Writes status lines with the configured theme
///
/// Status lines go to stdout, errors to stderr; each stream is colored only
/// when it is a terminal.
#[derive(Debug, Clone)]
pub struct Printer {
    theme: Theme,
    error_theme: Theme,
}

impl Printer {
    pub fn new(theme: Theme) -> Self {
        Self::for_terminals(theme, io::stdout().is_tty(), io::stderr().is_tty())
    }

    fn for_terminals(theme: Theme, stdout_tty: bool, stderr_tty: bool) -> Self {
        let pick = |tty: bool| if tty { theme.clone() } else { Theme::plain() };
        Self {
            theme: pick(stdout_tty),
            error_theme: pick(stderr_tty),
        }
    }

    /// Use `theme` on both streams regardless of terminals
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            error_theme: theme.clone(),
            theme,
        }
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", paint("*", self.theme.accent), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", paint("*", self.theme.success), paint(message, self.theme.success));
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", paint("* WARNING:", self.theme.warning), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }

    fn error_line(&self, message: &str) -> String {
        format!("{} {}", paint("* ERROR:", self.error_theme.error), message)
    }

    /// Banner line for a major installer stage
    pub fn stage(&self, title: &str) {
        println!();
        println!("{}", paint(&format!("--- {} ---", title), self.theme.accent));
    }

    /// Aligned key/value block
    pub fn summary(&self, rows: &[(String, String)]) {
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in rows {
            println!(
                "  {} {}",
                paint(&format!("{:<width$}", key, width = width), self.theme.fg_dim),
                value
            );
        }
    }

    pub fn question(&self, text: &str) -> String {
        paint(text, self.theme.warning)
    }
}

fn paint(text: &str, color: Option<Color>) -> String {
    match color {
        Some(color) => text.with(color).to_string(),
        None => text.to_string(),
    }
}
