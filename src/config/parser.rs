//! TOML parsing for host configuration files.
//!
//! Hosts that keep their settings in TOML can load them straight into a
//! [`Config`](super::Config). Errors carry the file path so a broken config
//! file is easy to locate:
//!
//! ```text
//! Configuration error: failed to parse config file /srv/site/config.toml: expected `=` ...
//! ```

use std::path::Path;

use crate::core::{EngineError, Result};

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use web_tera::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Site {
///     name: String,
/// }
///
/// # async fn example() -> web_tera::core::Result<()> {
/// let site: Site = parse_config(Path::new("site.toml")).await?;
/// println!("Serving {}", site.name);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the file cannot be read, is not valid
/// TOML, or does not match `T`.
pub async fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = tokio::fs::read_to_string(path).await.map_err(|e| EngineError::Config {
        message: format!("failed to read config file {}: {e}", path.display()),
    })?;

    parse_config_str(&content).map_err(|e| match e {
        EngineError::Config {
            message,
        } => EngineError::Config {
            message: format!("failed to parse config file {}: {message}", path.display()),
        },
        other => other,
    })
}

/// Parse TOML text into the specified type.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the text is not valid TOML or does
/// not match `T`.
pub fn parse_config_str<T>(content: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    toml::from_str(content).map_err(|e| EngineError::Config {
        message: e.to_string(),
    })
}
