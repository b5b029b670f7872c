//! web-tera - Tera template engine adapter
//!
//! Exposes the [Tera](https://keats.github.io/tera/) templating library
//! through the uniform lifecycle a web host uses for all of its template
//! engines: initialise once, register templates, render per request.
//!
//! # Architecture Overview
//!
//! - The host calls [`factory`] and checks [`METADATA`] (extensions, handle,
//!   configuration schema) to decide which files this engine serves
//! - It creates a [`TeraEngine`] from [`EngineOptions`]: a configuration
//!   accessor, the pages directory, an optional helpers directory and any
//!   additional template files it discovered
//! - [`initialise`](TemplateEngine::initialise) scans partials, pages,
//!   helpers and filters and compiles everything into one Tera environment
//! - [`render`](TemplateEngine::render) evaluates a template with JSON locals
//!
//! # Core Modules
//!
//! - [`config`] - Host configuration access and engine settings
//! - [`core`] - Error types
//! - [`engine`] - The engine contract: trait, factory, metadata, options
//! - [`templating`] - The Tera implementation, environment and filters
//! - [`utils`] - Directory scanning, parallel reads, path and JSON helpers
//!
//! # Configuration
//!
//! ```toml
//! [engines.tera.paths]
//! helpers = "workspace/utils/helpers"
//! filters = "workspace/utils/filters"
//! partials = "workspace/pages/partials"
//!
//! [engines.tera]
//! watch = true
//! autoescape = true
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use web_tera::{Config, EngineOptions, METADATA, TemplateEngine, TeraEngine};
//!
//! # async fn example() -> web_tera::core::Result<()> {
//! let config = Config::load(std::path::Path::new("config.toml")).await?.with_engine_defaults(&METADATA);
//! let mut engine = TeraEngine::new(EngineOptions::new(Arc::new(config), "workspace/pages"));
//! engine.initialise().await?;
//!
//! let locals = json!({ "products": [{ "name": "Super Thing 3000", "price": 5000 }] });
//! let html = engine.render("products", None, &locals, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Loading
//! steps are logged at `debug`, completed initialisation at `info` and name
//! collisions at `warn`.

pub mod config;
pub mod constants;
pub mod core;
pub mod engine;
pub mod templating;
pub mod utils;

// Test utilities (only compiled in test mode or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::config::{Config, ConfigSource};
pub use crate::core::{EngineError, Result};
pub use crate::engine::{EngineFactory, EngineInfo, EngineOptions, METADATA, Metadata, TemplateEngine};
pub use crate::templating::{CompiledTemplate, TeraEngine, TeraEngineFactory, factory};
