/// config.toml loading and export settings
pub mod app;

/// Organization details printed on receipts
pub mod organization;

pub use app::{AppConfig, ExportSettings, load_app_configuration, load_config};
pub use organization::Organization;
