//! Application settings loaded from config.toml
//!
//! Every section and field is optional; anything left out falls back to the
//! defaults below, so the application also runs without a config file.
//!
//! ```toml
//! [catalog]
//! path = "productList.txt"
//! capacity = 50
//! low_stock_threshold = 3
//!
//! [cart]
//! discount_rate = 0.20
//! discount_threshold = 3
//!
//! [auth]
//! credentials_path = "userCredentials.toml"
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Catalog file and limits
    pub catalog: CatalogSettings,
    /// Discount policy
    pub cart: CartSettings,
    /// Credential file
    pub auth: AuthSettings,
}

/// `[catalog]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSettings {
    /// Flat file the catalog is appended to
    pub path: PathBuf,
    /// Maximum number of unsaved products held in memory
    pub capacity: usize,
    /// Products with fewer items than this are flagged in listings
    pub low_stock_threshold: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("productList.txt"),
            capacity: 50,
            low_stock_threshold: 3,
        }
    }
}

/// `[cart]` section
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CartSettings {
    /// Fraction of the cart subtotal taken off per qualifying category
    pub discount_rate: f64,
    /// Adds within one category needed for that category to qualify
    pub discount_threshold: u32,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            discount_rate: 0.20,
            discount_threshold: 3,
        }
    }
}

/// `[auth]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// TOML file holding registered accounts
    pub credentials_path: PathBuf,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("userCredentials.toml"),
        }
    }
}

impl AppConfig {
    /// Checks value ranges that the TOML types alone cannot express.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if:
    /// - The catalog capacity is zero
    /// - The discount rate is outside `0.0..=1.0`
    /// - The discount threshold is zero
    pub fn validate(&self) -> Result<()> {
        if self.catalog.capacity == 0 {
            return Err(Error::Config {
                message: "catalog.capacity must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.cart.discount_rate) {
            return Err(Error::Config {
                message: format!(
                    "cart.discount_rate must be between 0 and 1, got {}",
                    self.cart.discount_rate
                ),
            });
        }
        if self.cart.discount_threshold == 0 {
            return Err(Error::Config {
                message: "cart.discount_threshold must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads settings from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or contains unknown keys
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {:?}: {e}", path.as_ref()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [catalog]
            path = "data/products.txt"
            capacity = 10
            low_stock_threshold = 5

            [cart]
            discount_rate = 0.1
            discount_threshold = 2

            [auth]
            credentials_path = "data/users.toml"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog.path, PathBuf::from("data/products.txt"));
        assert_eq!(config.catalog.capacity, 10);
        assert_eq!(config.catalog.low_stock_threshold, 5);
        assert_eq!(config.cart.discount_rate, 0.1);
        assert_eq!(config.cart.discount_threshold, 2);
        assert_eq!(config.auth.credentials_path, PathBuf::from("data/users.toml"));
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = toml::from_str("[cart]\ndiscount_rate = 0.5\n").unwrap();
        assert_eq!(config.cart.discount_rate, 0.5);
        assert_eq!(config.cart.discount_threshold, 3);
        assert_eq!(config.catalog, CatalogSettings::default());
        assert_eq!(config.catalog.capacity, 50);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[cart]\ndiscount = 0.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = AppConfig::default();
        config.validate().unwrap();

        config.cart.discount_rate = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        config.cart.discount_rate = 0.2;
        config.catalog.capacity = 0;
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        config.catalog.capacity = 50;
        config.cart.discount_threshold = 0;
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
