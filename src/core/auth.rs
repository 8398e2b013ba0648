//! Credential store - registering and authenticating shoppers.
//!
//! Accounts are kept in a TOML file as `[[users]]` tables. Passwords are
//! stored only as Argon2 hashes with a random salt per account.

use crate::{
    entities::UserAccount,
    errors::{Error, Result},
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    users: Vec<UserAccount>,
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("Stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Registered accounts backed by a TOML file.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    accounts: Vec<UserAccount>,
}

impl CredentialStore {
    /// Reads the credential file, creating an empty one if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, created or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let accounts = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str::<CredentialFile>(&text)?.users,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Creating empty credential file {:?}", path);
                fs::write(&path, "")?;
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} accounts from {:?}", accounts.len(), path);
        Ok(Self { path, accounts })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }

    /// Registers a new account and rewrites the credential file.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The username or password is blank ([`Error::InvalidField`])
    /// - The username is already registered ([`Error::UsernameTaken`])
    /// - Hashing or writing the file fails
    pub fn register(&mut self, username: &str, password: &str) -> Result<&UserAccount> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::invalid_field("username", "cannot be empty"));
        }
        if password.is_empty() {
            return Err(Error::invalid_field("password", "cannot be empty"));
        }
        if self.accounts.iter().any(|a| a.username == username) {
            return Err(Error::UsernameTaken {
                username: username.to_string(),
            });
        }

        self.accounts.push(UserAccount {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            created_at: chrono::Utc::now(),
        });
        if let Err(e) = self.persist() {
            self.accounts.pop();
            return Err(e);
        }

        info!("Registered user {username}");
        let index = self.accounts.len() - 1;
        Ok(&self.accounts[index])
    }

    /// Checks a username and password.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCredentials`] for an unknown user or wrong password.
    pub fn login(&self, username: &str, password: &str) -> Result<&UserAccount> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.username == username.trim())
            .filter(|a| verify_password(password, &a.password_hash))
            .ok_or(Error::InvalidCredentials)?;
        info!("User {} logged in", account.username);
        Ok(account)
    }

    fn persist(&self) -> Result<()> {
        let file = CredentialFile {
            users: self.accounts.clone(),
        };
        let text = toml::to_string_pretty(&file)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
