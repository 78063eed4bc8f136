//! Configuration management for resumeforge.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "resumeforge";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "resumes.db";

/// Placeholder replaced with the markup file path in converter args.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder replaced with the document file path in converter args.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RESUMEFORGE_`)
/// 2. TOML config file at `~/.config/resumeforge/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Document export configuration.
    pub export: ExportConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,
    /// Largest accepted request body in bytes (form plus photo).
    pub max_body_bytes: usize,
}

/// Storage-related configuration.
///
/// Unset paths resolve under `~/.local/share/resumeforge/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    pub database_path: Option<PathBuf>,
    /// Directory holding uploaded photos.
    pub uploads_dir: Option<PathBuf>,
    /// Directory holding generated documents.
    pub generated_dir: Option<PathBuf>,
}

/// External converter used to turn HTML into PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Converter program, looked up on `PATH`.
    pub program: String,
    /// Arguments; `{input}` and `{output}` are substituted per export.
    pub args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            program: "weasyprint".to_string(),
            args: vec![INPUT_PLACEHOLDER.to_string(), OUTPUT_PLACEHOLDER.to_string()],
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RESUMEFORGE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.export.program.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.program must not be empty".to_string(),
            });
        }

        if !self
            .export
            .args
            .iter()
            .any(|arg| arg.contains(OUTPUT_PLACEHOLDER))
        {
            return Err(Error::ConfigValidation {
                message: format!("export.args must contain the {OUTPUT_PLACEHOLDER} placeholder"),
            });
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("server.bind is not a socket address: {}", self.server.bind),
            });
        }

        if self.server.max_body_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "server.max_body_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the uploads directory, resolving defaults if not set.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.storage
            .uploads_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("uploads"))
    }

    /// Get the generated documents directory, resolving defaults if not set.
    #[must_use]
    pub fn generated_dir(&self) -> PathBuf {
        self.storage
            .generated_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("generated"))
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("server.bind is not a socket address: {}", self.server.bind),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.export.program, "weasyprint");
    }

    #[test]
    fn test_default_storage_paths_resolve_under_data_dir() {
        let config = Config::default();
        assert!(config.database_path().ends_with("resumes.db"));
        assert!(config.uploads_dir().ends_with("uploads"));
        assert!(config.generated_dir().ends_with("generated"));
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains(DATA_DIR_NAME));
    }

    #[test]
    fn test_custom_paths() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/srv/db.sqlite"));
        config.storage.uploads_dir = Some(PathBuf::from("/srv/uploads"));

        assert_eq!(config.database_path(), PathBuf::from("/srv/db.sqlite"));
        assert_eq!(config.uploads_dir(), PathBuf::from("/srv/uploads"));
    }

    #[test]
    fn test_validate_empty_program() {
        let mut config = Config::default();
        config.export.program = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("export.program"));
    }

    #[test]
    fn test_validate_missing_output_placeholder() {
        let mut config = Config::default();
        config.export.args = vec!["{input}".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("{output}"));
    }

    #[test]
    fn test_validate_bad_bind() {
        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();

        assert!(config.validate().is_err());
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                bind = "0.0.0.0:8080"

                [export]
                program = "wkhtmltopdf"
                args = ["--quiet", "{input}", "{output}"]
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind, "0.0.0.0:8080");
            assert_eq!(config.export.program, "wkhtmltopdf");
            assert_eq!(config.export.args.len(), 3);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[server]\nbind = \"0.0.0.0:8080\"\n")?;
            jail.set_env("RESUMEFORGE_SERVER__BIND", "127.0.0.1:9000");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind, "127.0.0.1:9000");
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("max_body_bytes"));
        assert!(json.contains("weasyprint"));
    }
}
