//! User account entity - a registered shopper as stored in the credential file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Login name, unique across the credential file
    pub username: String,
    /// Argon2 PHC string (algorithm, parameters, salt and hash)
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}
