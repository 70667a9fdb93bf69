use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use crate::error::{EtlError, Result};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub writer: WriterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WriterConfig {
    pub fallback: FallbackMode,
}

/// How `name` and `diameter_km` are filled in written results.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Real values when known; empty name / unknown diameter otherwise.
    #[default]
    Corrected,
    /// Always an empty name and unknown diameter, matching older exports.
    Legacy,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive applied on top of `RUST_LOG`.
    pub directive: String,
    /// Directory for daily-rolling log files; console only when unset.
    pub log_dir: Option<PathBuf>,
    /// Write file logs as JSON lines.
    pub json_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: "neo_etl=info".to_string(),
            log_dir: None,
            json_file: true,
        }
    }
}

impl Config {
    /// Load from `$NEO_ETL_CONFIG`, else `neo_etl.toml` in the working
    /// directory. A missing default file yields the default config; a missing
    /// file named by the environment variable is an error.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(path.trim()),
            _ => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.writer.fallback, FallbackMode::Corrected);
        assert_eq!(config.logging.directive, "neo_etl=info");
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            [writer]
            fallback = "legacy"

            [logging]
            directive = "neo_etl=debug"
            log_dir = "logs"
            json_file = false
            "#,
        )
        .unwrap();
        assert_eq!(config.writer.fallback, FallbackMode::Legacy);
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("logs")));
        assert!(!config.logging.json_file);
    }

    #[test]
    fn test_unknown_fallback_mode_rejected() {
        let err = Config::from_toml_str("[writer]\nfallback = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, EtlError::Toml(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[writer]\nfallback = \"legacy\"").unwrap();
        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.writer.fallback, FallbackMode::Legacy);
    }

    // Tests touching NEO_ETL_CONFIG hold this lock; the environment is process-wide.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_load_env_path_missing_is_error() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/neo_etl.toml");
        let result = Config::load();
        std::env::remove_var(CONFIG_PATH_ENV);
        assert!(matches!(result, Err(EtlError::Config(_))));
    }

    #[test]
    fn test_load_env_path() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[writer]\nfallback = \"legacy\"").unwrap();
        std::env::set_var(CONFIG_PATH_ENV, file.path());
        let result = Config::load();
        std::env::remove_var(CONFIG_PATH_ENV);
        assert_eq!(result.unwrap().writer.fallback, FallbackMode::Legacy);
    }

    #[test]
    fn test_load_without_env_or_default_file() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var(CONFIG_PATH_ENV);
        assert!(!Path::new(DEFAULT_CONFIG_FILE).exists());
        assert_eq!(Config::load().unwrap(), Config::default());
    }

    #[test]
    fn test_from_missing_path() {
        let err = Config::from_path("/nonexistent/neo_etl.toml").unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
    }
}
