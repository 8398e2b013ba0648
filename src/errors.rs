//! Unified error type for the catalog, cart, session and credential layers.
//!
//! Every variant is recoverable at the front-end boundary: the console prints
//! the message and returns to its idle prompt.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Maximum limit of {capacity} products reached. Cannot add more products.")]
    CapacityExceeded { capacity: usize },

    #[error("A product with ID '{id}' already exists")]
    DuplicateProduct { id: String },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Product with ID '{id}' not found")]
    ProductNotFound { id: String },

    #[error("Product '{id}' is out of stock")]
    OutOfStock { id: String },

    #[error("Username '{username}' already exists")]
    UsernameTaken { username: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing error: {message}")]
    PasswordHash { message: String },

    #[error("Input closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidField`] with a formatted reason.
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the user can fix this by entering something else at the prompt.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidField { .. })
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::PasswordHash {
            message: value.to_string(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
