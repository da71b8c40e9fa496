//! # External configuration collaborator.
//!
//! [`Configurer`] is the narrow configuration surface the supervisor and its
//! components consume: load from a single file or a merged directory set,
//! merge key/value overrides on top, and look values up by dotted path.
//!
//! ## Source precedence
//! ```text
//! config_dirs (per dir, files sorted, later wins)
//!   └─► config_file (when set, replaces the directory scan)
//!         └─► merged properties (always win)
//! ```
//!
//! The supervisor builds one configurer during initialization and merges the
//! configured property overrides exactly once; components reach it through
//! [`Supervisor::config`](crate::Supervisor::config) from their `init`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config as Raw, ConfigBuilder, File};
use serde::de::DeserializeOwned;

use crate::config::ConfigFormat;
use crate::error::RuntimeError;

/// Merge-capable key/value configuration lookup.
///
/// Wraps a [`config::Config`] snapshot plus the builder it came from, so
/// later [`Configurer::merge`] calls can rebuild the snapshot with overrides
/// applied on top of the original sources.
#[derive(Clone, Debug)]
pub struct Configurer {
    builder: ConfigBuilder<DefaultState>,
    snapshot: Raw,
}

impl Configurer {
    /// Loads configuration from a single file.
    ///
    /// The file must exist and parse in the given format.
    pub fn from_file(path: &Path, format: ConfigFormat) -> Result<Self, RuntimeError> {
        let builder = Raw::builder().add_source(
            File::from(path)
                .format(format.as_file_format())
                .required(true),
        );
        Self::build(builder)
    }

    /// Loads configuration from a directory set.
    ///
    /// Every readable file with an extension of `format` is added, sorted
    /// lexicographically within each directory; directories are applied in
    /// the given order, and later sources override earlier ones. Missing or
    /// unreadable directories are skipped, so the default `./configs` path
    /// yields an empty configurer rather than an error.
    pub fn from_dirs(dirs: &[PathBuf], format: ConfigFormat) -> Result<Self, RuntimeError> {
        let mut builder = Raw::builder();
        for dir in dirs {
            for path in Self::scan_dir(dir, format) {
                builder = builder.add_source(
                    File::from(path.as_path())
                        .format(format.as_file_format())
                        .required(false),
                );
            }
        }
        Self::build(builder)
    }

    /// Merges key/value overrides on top of the loaded sources.
    ///
    /// Keys use dotted-path syntax (`"server.addr"`). Merged values override
    /// every file source and survive subsequent merges.
    pub fn merge(&mut self, properties: &HashMap<String, String>) -> Result<(), RuntimeError> {
        if properties.is_empty() {
            return Ok(());
        }
        // Sort for deterministic application order.
        let mut keys: Vec<&String> = properties.keys().collect();
        keys.sort();

        let mut builder = self.builder.clone();
        for key in keys {
            builder = builder.set_override(key.as_str(), properties[key].clone())?;
        }
        self.snapshot = builder.build_cloned()?;
        self.builder = builder;
        Ok(())
    }

    /// Looks up and deserializes the value at `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, RuntimeError> {
        Ok(self.snapshot.get(key)?)
    }

    /// Looks up a string value, `None` when the key is absent or not a
    /// string-convertible scalar.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.snapshot.get_string(key).ok()
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, RuntimeError> {
        let snapshot = builder.build_cloned()?;
        Ok(Self { builder, snapshot })
    }

    fn scan_dir(dir: &Path, format: ConfigFormat) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| format.extensions().contains(&ext))
            })
            .collect();
        paths.sort();
        paths
    }
}
