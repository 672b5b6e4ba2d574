//! Application configuration loading from config.toml
//!
//! The file holds the organization details printed on receipts, export
//! settings, and the seed content for the in-memory content store. Every
//! table is optional; anything left out falls back to its default.

use super::organization::Organization;
use crate::entities::{Announcement, GalleryImage, Publication, SpecialEvent, WeeklyProgram};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "CHURCH_CONFIG";

/// Config file used when `CHURCH_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Receipt header and footer details
    pub organization: Organization,
    /// Export channel settings
    pub export: ExportSettings,
    /// Announcements to seed
    pub announcements: Vec<Announcement>,
    /// Special events to seed
    pub events: Vec<SpecialEvent>,
    /// Weekly programs to seed
    pub programs: Vec<WeeklyProgram>,
    /// Publications to seed
    pub publications: Vec<Publication>,
    /// Gallery images to seed
    pub gallery: Vec<GalleryImage>,
}

/// Settings shared by the receipt export channels
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Upscale factor for the raster capture
    pub capture_scale: u32,
    /// How long the print view settles before printing, in milliseconds
    pub print_delay_ms: u64,
    /// Symbol prefixed to amounts
    pub currency_symbol: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            capture_scale: 2,
            print_delay_ms: 250,
            currency_symbol: "$".to_string(),
        }
    }
}

impl ExportSettings {
    /// Print settle delay as a `Duration`
    #[must_use]
    pub const fn print_delay(&self) -> Duration {
        Duration::from_millis(self.print_delay_ms)
    }
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A content entry is missing a required field
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })?;

    if config.export.capture_scale == 0 {
        return Err(Error::Config {
            message: "export.capture_scale must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads the configuration from `$CHURCH_CONFIG`, or ./config.toml.
///
/// A missing default file is not an error: the built-in organization details
/// and an empty content store are used instead. A path named explicitly
/// through the environment must exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return load_config(path)
            .inspect_err(|e| tracing::error!("Failed to load configuration: {}", e));
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        tracing::warn!(
            "{} not found, using built-in organization details and no seed content",
            DEFAULT_CONFIG_PATH
        );
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Priority;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [organization]
            name = "GRACE CHAPEL"

            [export]
            capture_scale = 3

            [[announcements]]
            id = 1
            title = "Christmas Service"
            content = "Join us at 10 AM."
            date = "2024-12-15"
            priority = "high"
            author = "Pastor John Smith"

            [[programs]]
            title = "Bible Study"
            description = "Midweek study"
            day = "Wednesday"
            time = "7:00 PM"
            location = "Fellowship Hall"
            leader = "Deacon Mike"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.organization.name, "GRACE CHAPEL");
        assert_eq!(config.organization.phone, "(555) 123-4567");
        assert_eq!(config.export.capture_scale, 3);
        assert_eq!(config.export.print_delay_ms, 250);
        assert_eq!(config.export.currency_symbol, "$");
        assert_eq!(config.announcements.len(), 1);
        assert_eq!(config.announcements[0].priority, Priority::High);
        assert_eq!(config.programs[0].id, 0);
        assert!(config.events.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[export]\nprint_delay_ms = 100").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.export.print_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_config_rejects_zero_scale() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[export]\ncapture_scale = 0").unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(Error::Config { message: _ })
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/config.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_shipped_config_matches_default_organization() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert_eq!(config.organization, Organization::default());
        assert_eq!(config.announcements.len(), 3);
        assert_eq!(config.events.len(), 2);
    }
}
