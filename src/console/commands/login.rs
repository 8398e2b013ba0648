//! Login screen - shoppers log in or register before the shop opens.

use super::menu_choice;
use crate::{
    console::Console,
    core::auth::CredentialStore,
    errors::{Error, Result},
};
use std::io::{BufRead, Write};
use tracing::{instrument, warn};

const MENU: &str = "\n===== Westminster Shopping Centre =====\n\
    1. Login\n\
    2. Register\n\
    3. Exit";

/// Runs the login screen, returning the username once a login succeeds.
///
/// Returns `None` when the user exits or input ends.
///
/// # Errors
/// Returns [`Error::Io`] if the console cannot be used.
#[instrument(skip_all)]
pub fn run_login<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    credentials: &mut CredentialStore,
) -> Result<Option<String>> {
    loop {
        console.say(MENU)?;
        let Some(choice) = menu_choice(console)? else {
            return Ok(None);
        };

        let outcome = match choice.as_str() {
            "1" => login(console, credentials),
            "2" => register(console, credentials).map(|()| None),
            "3" => return Ok(None),
            _ => console
                .say("Invalid choice. Please enter a number between 1 and 3.")
                .map(|()| None),
        };

        match outcome {
            Ok(Some(username)) => return Ok(Some(username)),
            Ok(None) => {}
            Err(Error::InputClosed) => return Ok(None),
            Err(e) => {
                warn!("Login screen action failed: {}", e);
                console.say(format!("❌ {e}"))?;
            }
        }
    }
}

fn login<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    credentials: &CredentialStore,
) -> Result<Option<String>> {
    let username = console.prompt("Username: ")?;
    let password = console.prompt("Password: ")?;
    let account = credentials.login(&username, &password)?;
    let username = account.username.clone();
    console.say(format!("✅ Login successful. Welcome, {username}!"))?;
    Ok(Some(username))
}

fn register<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    credentials: &mut CredentialStore,
) -> Result<()> {
    let username = console.prompt("Choose a username: ")?;
    let password = console.prompt("Choose a password: ")?;
    credentials.register(&username, &password)?;
    console.say("✅ Registration successful. You can now log in.")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn credentials() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("users.toml")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_register_then_login() {
        let (_dir, mut store) = credentials();
        let mut console = scripted_console("2\nalice\npw\n1\nalice\npw\n");

        let user = run_login(&mut console, &mut store).unwrap();

        assert_eq!(user.as_deref(), Some("alice"));
        let output = console_output(&console);
        assert!(output.contains("✅ Registration successful."));
        assert!(output.contains("Welcome, alice!"));
    }

    #[test]
    fn test_failed_login_returns_to_menu() {
        let (_dir, mut store) = credentials();
        store.register("bob", "right").unwrap();
        let mut console = scripted_console("1\nbob\nwrong\n3\n");

        let user = run_login(&mut console, &mut store).unwrap();

        assert!(user.is_none());
        assert!(console_output(&console).contains("❌ Invalid username or password"));
    }

    #[test]
    fn test_taken_username_and_invalid_choice() {
        let (_dir, mut store) = credentials();
        store.register("carol", "pw").unwrap();
        let mut console = scripted_console("7\n2\ncarol\nother\n");

        let user = run_login(&mut console, &mut store).unwrap();

        assert!(user.is_none());
        let output = console_output(&console);
        assert!(output.contains("Invalid choice."));
        assert!(output.contains("❌ Username 'carol' already exists"));
    }
}
