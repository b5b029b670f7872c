//! Host configuration access
//!
//! The engine never owns the host's configuration. It reads a handful of keys
//! through the [`ConfigSource`] trait, which a host implements on top of
//! whatever configuration system it already has:
//!
//! | Key                            | Type   | Default                    |
//! |--------------------------------|--------|----------------------------|
//! | `engines.tera.paths.helpers`   | path   | `workspace/utils/helpers`  |
//! | `engines.tera.paths.filters`   | path   | `workspace/utils/filters`  |
//! | `engines.tera.paths.partials`  | path   | `workspace/pages/partials` |
//! | `engines.tera.watch`           | bool   | `true`                     |
//! | `engines.tera.autoescape`      | bool   | `true`                     |
//!
//! Relative paths are resolved against the process working directory.
//!
//! [`Config`] is a ready-made JSON-tree implementation with dotted-path
//! access, used by the tests and by small hosts:
//!
//! ```toml
//! [engines.tera.paths]
//! helpers = "workspace/utils/helpers"
//! filters = "workspace/utils/filters"
//! partials = "workspace/pages/partials"
//!
//! [engines.tera]
//! watch = false
//! ```
//!
//! # Modules
//!
//! - `parser` - TOML parsing with file path context

mod parser;

pub use parser::{parse_config, parse_config_str};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FILTERS_PATH, DEFAULT_HELPERS_PATH, DEFAULT_PARTIALS_PATH};
use crate::core::{EngineError, Result};
use crate::engine::Metadata;
use crate::utils::fs::{resolve_from_cwd, resolve_path};
use crate::utils::json::{deep_merge_json, lookup_dotted, set_dotted};

/// Read-only accessor into host configuration.
///
/// `path` is a dotted key such as `engines.tera.paths`. Implementations return
/// `None` for unknown keys.
pub trait ConfigSource: Send + Sync {
    /// Look up the value stored at `path`.
    fn get(&self, path: &str) -> Option<Value>;
}

/// JSON-tree configuration with dotted-path access.
///
/// # Examples
///
/// ```rust
/// use web_tera::config::{Config, ConfigSource};
/// use web_tera::METADATA;
///
/// let mut config = Config::new().with_engine_defaults(&METADATA);
/// config.set("engines.tera.paths.partials", "site/partials");
///
/// assert_eq!(config.get("engines.tera.paths.partials").unwrap(), "site/partials");
/// assert_eq!(config.get("engines.tera.watch").unwrap(), true);
///
/// config.reset();
/// assert_eq!(config.get("engines.tera.paths.partials").unwrap(), "workspace/pages/partials");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    values: Value,
    initial: Value,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    /// Wrap an existing JSON tree. [`reset`](Self::reset) returns to this tree.
    pub fn from_value(values: Value) -> Self {
        Self {
            initial: values.clone(),
            values,
        }
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] on invalid TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let values: Value = parse_config_str(content)?;
        Ok(Self::from_value(values))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the file is unreadable or invalid.
    pub async fn load(path: &Path) -> Result<Self> {
        let values: Value = parse_config(path).await?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(Self::from_value(values))
    }

    /// Merge the engine's schema defaults under `engines.<handle>`.
    ///
    /// Values already present win over the defaults. The merged tree becomes
    /// the state that [`reset`](Self::reset) returns to.
    #[must_use]
    pub fn with_engine_defaults(self, metadata: &Metadata) -> Self {
        let mut defaults = Value::Object(Map::new());
        set_dotted(&mut defaults, &format!("engines.{}", metadata.handle), metadata.config.defaults());

        Self::from_value(deep_merge_json(defaults, &self.values))
    }

    /// Borrow the value at a dotted path.
    pub fn value(&self, path: &str) -> Option<&Value> {
        lookup_dotted(&self.values, path)
    }

    /// Set the value at a dotted path, creating intermediate objects.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        set_dotted(&mut self.values, path, value.into());
    }

    /// Discard every [`set`](Self::set) since construction.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
    }

    /// The whole configuration tree.
    pub fn as_value(&self) -> &Value {
        &self.values
    }
}

impl ConfigSource for Config {
    fn get(&self, path: &str) -> Option<Value> {
        self.value(path).cloned()
    }
}

/// Directories the engine scans besides the pages directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePaths {
    /// Helper templates (macros and fragments invoked by name)
    pub helpers: PathBuf,
    /// Filter modules
    pub filters: PathBuf,
    /// Partial templates
    pub partials: PathBuf,
}

impl Default for EnginePaths {
    fn default() -> Self {
        Self {
            helpers: PathBuf::from(DEFAULT_HELPERS_PATH),
            filters: PathBuf::from(DEFAULT_FILTERS_PATH),
            partials: PathBuf::from(DEFAULT_PARTIALS_PATH),
        }
    }
}

impl EnginePaths {
    /// Read `engines.<handle>.paths`; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the value is not an object of paths.
    pub fn from_config(config: &dyn ConfigSource, handle: &str) -> Result<Self> {
        let key = format!("engines.{handle}.paths");
        match config.get(&key) {
            None | Some(Value::Null) => Ok(Self::default()),
            // serde would also fill the struct from an array by position
            Some(value @ Value::Object(_)) => {
                serde_json::from_value(value).map_err(|e| EngineError::Config {
                    message: format!("`{key}` must be an object of paths: {e}"),
                })
            }
            Some(other) => Err(EngineError::Config {
                message: format!("`{key}` must be an object of paths, found {other}"),
            }),
        }
    }

    /// Resolve every path against the current working directory.
    ///
    /// # Errors
    ///
    /// See [`resolve_from_cwd`].
    pub fn resolve(&self) -> Result<Self> {
        Ok(Self {
            helpers: resolve_from_cwd(&self.helpers)?,
            filters: resolve_from_cwd(&self.filters)?,
            partials: resolve_from_cwd(&self.partials)?,
        })
    }

    /// Resolve every path against `base`.
    ///
    /// # Errors
    ///
    /// See [`resolve_path`].
    pub fn resolve_against(&self, base: &Path) -> Result<Self> {
        Ok(Self {
            helpers: resolve_path(&self.helpers, base)?,
            filters: resolve_path(&self.filters, base)?,
            partials: resolve_path(&self.partials, base)?,
        })
    }
}

/// Behavioural switches read from `engines.<handle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Recompile templates whose files changed on disk before rendering
    pub watch: bool,
    /// Escape HTML in rendered expressions
    pub autoescape: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            watch: true,
            autoescape: true,
        }
    }
}

impl EngineSettings {
    /// Read `engines.<handle>.watch` and `engines.<handle>.autoescape`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if either key is present but not a boolean.
    pub fn from_config(config: &dyn ConfigSource, handle: &str) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            watch: bool_option(config, &format!("engines.{handle}.watch"), defaults.watch)?,
            autoescape: bool_option(
                config,
                &format!("engines.{handle}.autoescape"),
                defaults.autoescape,
            )?,
        })
    }
}

fn bool_option(config: &dyn ConfigSource, key: &str, default: bool) -> Result<bool> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(value)) => Ok(value),
        Some(other) => Err(EngineError::Config {
            message: format!("`{key}` must be a boolean, found {other}"),
        }),
    }
}
