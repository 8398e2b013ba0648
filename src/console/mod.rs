//! Console layer - text front end for the manager menu, login screen and shop
//!
//! Everything here talks to a generic `BufRead`/`Write` pair so the same code
//! runs against stdin/stdout or an in-memory script in tests.

/// Menu and shop command implementations (manage, login, shop)
pub mod commands;
/// Re-prompting input helpers
pub mod prompt;

use crate::errors::{Error, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Input and output streams shared by every console command.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W> {
    /// Creates a console reading from `input` and writing to `output`.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The output stream, mainly for inspecting scripted sessions.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Writes one line of output.
    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Shows `label` and reads one line, without its line ending.
    ///
    /// # Errors
    /// Returns [`Error::InputClosed`] at end of input, or [`Error::Io`].
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(Error::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
