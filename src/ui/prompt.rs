//! Operator confirmation
//!
//! Decision code asks through the [`Confirm`] trait so it can be driven
//! without a terminal.

use crate::ui::Printer;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Yes/no question to the operator, defaulting to no
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Interpret a typed answer; only y/yes (any case) accepts
pub fn parse_answer(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Asks on stdout and reads one line from stdin
pub struct TerminalConfirm<'a> {
    printer: &'a Printer,
}

impl<'a> TerminalConfirm<'a> {
    pub fn new(printer: &'a Printer) -> Self {
        Self { printer }
    }

    fn read_answer(&self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{} [y/N]: ", self.printer.question(question))?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

impl Confirm for TerminalConfirm<'_> {
    fn confirm(&mut self, question: &str) -> bool {
        match self.read_answer(question) {
            Ok(line) => parse_answer(&line),
            Err(e) => {
                debug!("Could not read answer ({}), treating as no", e);
                false
            }
        }
    }
}
