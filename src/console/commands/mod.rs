//! Console commands.
//!
//! Each submodule drives one interactive screen and returns when the user
//! exits it or input ends.

pub mod login;
pub mod manage;
pub mod shop;

pub use login::run_login;
pub use manage::run_manager;
pub use shop::run_shop;

use crate::errors::{Error, Result};

/// Reads a menu choice, mapping end of input to `None`.
fn menu_choice<R, W>(console: &mut super::Console<R, W>) -> Result<Option<String>>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    match console.prompt("Enter your choice: ") {
        Ok(choice) => Ok(Some(choice.trim().to_string())),
        Err(Error::InputClosed) => Ok(None),
        Err(e) => Err(e),
    }
}
