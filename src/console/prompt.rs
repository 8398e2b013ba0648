//! Prompt helpers that keep asking until the input parses.

use super::Console;
use crate::errors::{Error, Result};
use std::io::{BufRead, Write};

/// Prompts with `label` until `parse` accepts the input.
///
/// Input errors ([`Error::InvalidField`]) are shown and the prompt repeats;
/// any other error is returned.
///
/// # Errors
/// Returns [`Error::InputClosed`] at end of input, or any non-input error from `parse`.
pub fn ask<R, W, T>(
    console: &mut Console<R, W>,
    label: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<T>
where
    R: BufRead,
    W: Write,
{
    loop {
        let input = console.prompt(label)?;
        match parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_input_error() => console.say(format!("Invalid input. {e}"))?,
            Err(e) => return Err(e),
        }
    }
}

/// Prompts until a non-blank line is entered, returning it trimmed.
///
/// # Errors
/// Returns [`Error::InputClosed`] at end of input.
pub fn ask_text<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
    field: &'static str,
) -> Result<String> {
    ask(console, label, |input| {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Err(Error::invalid_field(field, "cannot be empty"))
        } else {
            Ok(trimmed.to_string())
        }
    })
}

/// Prompts until a number in `1..=max` is entered.
///
/// # Errors
/// Returns [`Error::InputClosed`] at end of input.
pub fn ask_choice<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
    max: usize,
) -> Result<usize> {
    ask(console, label, |input| {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|choice| (1..=max).contains(choice))
            .ok_or_else(|| {
                Error::invalid_field("choice", format!("please enter a number between 1 and {max}"))
            })
    })
}
