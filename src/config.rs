//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the supervisor runtime:
//! where the external configuration lives, how long a graceful shutdown may
//! take, and which key/value overrides to merge on top of the loaded files.
//!
//! ## Sentinel values
//! Zero/empty fields are normalized by [`Config::ensure_defaults`]:
//! - `shutdown_timeout = 0s` → 30s
//! - empty `name` → `"convoy"`
//! - empty `log_level` → `"info"`
//! - empty `config_dirs` → `["./configs"]`

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Structured-data format of external configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml` / `.yml`), the default.
    #[default]
    Yaml,
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
}

impl ConfigFormat {
    /// File extensions recognized for this format when scanning directories.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Yaml => &["yaml", "yml"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Json => &["json"],
        }
    }

    pub(crate) fn as_file_format(&self) -> config::FileFormat {
        match self {
            ConfigFormat::Yaml => config::FileFormat::Yaml,
            ConfigFormat::Toml => config::FileFormat::Toml,
            ConfigFormat::Json => config::FileFormat::Json,
        }
    }
}

/// Global configuration for the supervisor runtime.
///
/// Defines:
/// - **Identity**: process name used in logs
/// - **Shutdown behavior**: timeout for graceful termination
/// - **Configuration sources**: an explicit file, or a merged directory set
/// - **Overrides**: CLI/derived key-value properties merged on top
///
/// ## Field semantics
/// - `config_file`, when set, wins over `config_dirs`.
/// - `config_dirs` are scanned for files of `config_format`; later files
///   (lexicographically, across directories in order) override earlier ones.
/// - `properties` are merged last and override everything.
#[derive(Clone, Debug)]
pub struct Config {
    /// Process name carried in logs.
    pub name: String,

    /// Maximum time the shutdown deadline grants to component `stop` calls
    /// and stop hooks.
    ///
    /// Advisory: it bounds the deadline context observed by cooperative stop
    /// logic, it does not forcibly terminate a blocked call.
    pub shutdown_timeout: Duration,

    /// Default log level directive for the tracing subscriber
    /// (overridden by `RUST_LOG` when set).
    pub log_level: String,

    /// Explicit configuration file; wins over `config_dirs` when set.
    pub config_file: Option<PathBuf>,

    /// Directories scanned for configuration files when `config_file` is
    /// unset.
    pub config_dirs: Vec<PathBuf>,

    /// Format of external configuration files.
    pub config_format: ConfigFormat,

    /// Key/value overrides merged into the configurer after file loading.
    ///
    /// Keys use the configurer's dotted-path syntax (e.g. `"server.addr"`).
    pub properties: HashMap<String, String>,
}

impl Config {
    /// Normalizes zero/empty fields to their defaults.
    #[must_use]
    pub fn ensure_defaults(mut self) -> Self {
        if self.name.is_empty() {
            self.name = "convoy".to_string();
        }
        if self.shutdown_timeout.is_zero() {
            self.shutdown_timeout = Duration::from_secs(30);
        }
        if self.log_level.is_empty() {
            self.log_level = "info".to_string();
        }
        if self.config_dirs.is_empty() {
            self.config_dirs = vec![PathBuf::from("./configs")];
        }
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name = "convoy"`
    /// - `shutdown_timeout = 30s`
    /// - `log_level = "info"`
    /// - no explicit file, `config_dirs = ["./configs"]`, YAML format
    /// - no property overrides
    fn default() -> Self {
        Self {
            name: "convoy".to_string(),
            shutdown_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
            config_file: None,
            config_dirs: vec![PathBuf::from("./configs")],
            config_format: ConfigFormat::default(),
            properties: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_defaults_fills_sentinels() {
        let cfg = Config {
            name: String::new(),
            shutdown_timeout: Duration::ZERO,
            log_level: String::new(),
            config_dirs: Vec::new(),
            ..Config::default()
        }
        .ensure_defaults();

        assert_eq!(cfg.name, "convoy");
        assert_eq!(cfg.shutdown_timeout, Duration::from_secs(30));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.config_dirs, vec![PathBuf::from("./configs")]);
    }

    #[test]
    fn ensure_defaults_keeps_explicit_values() {
        let cfg = Config {
            shutdown_timeout: Duration::from_secs(5),
            ..Config::default()
        }
        .ensure_defaults();
        assert_eq!(cfg.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn format_extensions() {
        assert_eq!(ConfigFormat::Yaml.extensions(), &["yaml", "yml"]);
        assert_eq!(ConfigFormat::Toml.extensions(), &["toml"]);
    }
}
