//! Engine contract shared with the host framework
//!
//! A host treats every templating backend the same way: obtain a factory,
//! check its [`Metadata`] against the files it has to serve, create an
//! instance from [`EngineOptions`], call [`TemplateEngine::initialise`] once,
//! then [`TemplateEngine::register`] and [`TemplateEngine::render`] as needed.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use web_tera::config::Config;
//! use web_tera::engine::{EngineFactory, EngineOptions};
//!
//! # async fn example() -> web_tera::core::Result<()> {
//! let factory = web_tera::factory();
//! assert!(factory.metadata().supports_extension(".tera"));
//!
//! let config = Arc::new(Config::new().with_engine_defaults(factory.metadata()));
//! let mut engine = factory.create(EngineOptions::new(config, "workspace/pages"));
//! engine.initialise().await?;
//!
//! let html = engine.render("products", None, &json!({ "products": [] }), None).await?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```

mod metadata;

pub use metadata::{ConfigOption, ConfigSchema, METADATA, Metadata, OptionDefault};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ConfigSource;
use crate::core::Result;

/// Identification returned by [`TemplateEngine::info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    /// Engine handle
    pub engine: String,
    /// Backend version, when the backend reports one
    pub version: Option<String>,
}

/// Host-supplied construction options.
#[derive(Clone)]
pub struct EngineOptions {
    /// Template files discovered by the host outside the pages scan
    pub additional_templates: Vec<PathBuf>,
    /// Read-only accessor into host configuration
    pub config: Arc<dyn ConfigSource>,
    /// Helpers directory; overrides `engines.<handle>.paths.helpers` when set
    pub helpers: Option<PathBuf>,
    /// Root directory of page templates
    pub pages_path: PathBuf,
}

impl EngineOptions {
    /// Options with no helpers override and no additional templates.
    pub fn new(config: Arc<dyn ConfigSource>, pages_path: impl Into<PathBuf>) -> Self {
        Self {
            additional_templates: Vec::new(),
            config,
            helpers: None,
            pages_path: pages_path.into(),
        }
    }

    #[must_use]
    pub fn with_helpers(mut self, helpers: impl Into<PathBuf>) -> Self {
        self.helpers = Some(helpers.into());
        self
    }

    #[must_use]
    pub fn with_additional_templates(mut self, paths: Vec<PathBuf>) -> Self {
        self.additional_templates = paths;
        self
    }
}

impl std::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("additional_templates", &self.additional_templates)
            .field("helpers", &self.helpers)
            .field("pages_path", &self.pages_path)
            .finish_non_exhaustive()
    }
}

/// Lifecycle every templating backend exposes to the host.
///
/// `data`, `path` and `options` parameters are part of the shared contract;
/// engines that compile from disk ignore them.
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    /// Static metadata of this engine.
    fn metadata(&self) -> &'static Metadata;

    /// Engine handle and backend version.
    fn info(&self) -> EngineInfo;

    /// Raw backend handle for advanced use, once initialised.
    fn core(&self) -> Option<&dyn Any>;

    /// Configure the backend and load partials, pages, helpers and filters.
    ///
    /// Must complete before any other call. A failure leaves the instance
    /// unusable.
    async fn initialise(&mut self) -> Result<()>;

    /// Compile the template `name` and keep its handle.
    async fn register(&self, name: &str, data: Option<&str>, path: Option<&Path>) -> Result<()>;

    /// Render the template `name` with `locals` as its context.
    async fn render(
        &self,
        name: &str,
        data: Option<&str>,
        locals: &Value,
        options: Option<&Value>,
    ) -> Result<String>;

    /// Read and register the host's additional templates, all or nothing.
    async fn load_additional_templates(&self) -> Result<Vec<String>>;
}

/// Creates engine instances bound to one backend.
pub trait EngineFactory: Send + Sync {
    /// Static metadata of the engines this factory creates.
    fn metadata(&self) -> &'static Metadata;

    /// Construct an uninitialised engine.
    fn create(&self, options: EngineOptions) -> Box<dyn TemplateEngine>;
}
