/// Settings structures and config.toml parsing
pub mod settings;

/// Config file discovery and environment overrides
pub mod storage;

pub use settings::{AppConfig, AuthSettings, CartSettings, CatalogSettings};
pub use storage::load_app_configuration;
