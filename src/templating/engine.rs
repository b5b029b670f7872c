//! The Tera implementation of [`TemplateEngine`].

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::config::{ConfigSource, EnginePaths, EngineSettings};
use crate::constants::{ENGINE_HANDLE, FILTER_EXTENSION, TEMPLATE_EXTENSION};
use crate::core::{EngineError, Result};
use crate::engine::{EngineFactory, EngineInfo, EngineOptions, METADATA, Metadata, TemplateEngine};
use crate::utils::fs::{read_files_parallel, resolve_from_cwd, scan_directory};

use super::environment::Environment;
use super::filters::ScriptFilter;
use super::utils::{file_stem_name, name_relative_to, template_key};

/// Handle kept for every registered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// Template name, without extension
    pub name: String,
    /// Key of the template inside Tera
    pub key: String,
    /// File the template was compiled from; `None` for in-memory sources
    pub path: Option<PathBuf>,
    pub compiled_at: SystemTime,
}

type TemplateMap = DashMap<String, Arc<CompiledTemplate>>;

/// Template engine backed by Tera.
///
/// Created through [`factory`] or [`TeraEngine::new`]. Nothing is read from
/// disk until [`initialise`](TemplateEngine::initialise).
pub struct TeraEngine {
    config: Arc<dyn ConfigSource>,
    pages_path: PathBuf,
    helpers: Option<PathBuf>,
    additional_templates: Vec<PathBuf>,
    paths: Option<EnginePaths>,
    environment: Option<Environment>,
    templates: TemplateMap,
}

impl std::fmt::Debug for TeraEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeraEngine")
            .field("pages_path", &self.pages_path)
            .field("helpers", &self.helpers)
            .field("additional_templates", &self.additional_templates)
            .field("paths", &self.paths)
            .field("templates", &self.templates.len())
            .finish_non_exhaustive()
    }
}

impl TeraEngine {
    pub fn new(options: EngineOptions) -> Self {
        debug!("Starting Tera engine for {}", options.pages_path.display());
        Self {
            config: options.config,
            pages_path: options.pages_path,
            helpers: options.helpers,
            additional_templates: options.additional_templates,
            paths: None,
            environment: None,
            templates: DashMap::new(),
        }
    }

    pub fn pages_path(&self) -> &Path {
        &self.pages_path
    }

    /// Resolved helper, filter and partial directories, once initialised.
    pub fn paths(&self) -> Option<&EnginePaths> {
        self.paths.as_ref()
    }

    /// The backend environment, once initialised.
    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// Handle of a registered template.
    pub fn template(&self, name: &str) -> Option<Arc<CompiledTemplate>> {
        self.templates.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Names of every registered template, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    fn require_environment(&self) -> Result<&Environment> {
        self.environment.as_ref().ok_or(EngineError::NotInitialised)
    }

    fn resolve_paths(&self) -> Result<EnginePaths> {
        let mut paths = EnginePaths::from_config(self.config.as_ref(), ENGINE_HANDLE)?.resolve()?;
        if let Some(helpers) = &self.helpers {
            paths.helpers = resolve_from_cwd(helpers)?;
        }
        Ok(paths)
    }
}

/// Record `name` in `templates`; a different file under the same name wins
/// and is reported.
fn store_template(templates: &TemplateMap, name: &str, path: Option<PathBuf>) {
    let compiled = Arc::new(CompiledTemplate {
        name: name.to_string(),
        key: template_key(name),
        path,
        compiled_at: SystemTime::now(),
    });

    if let Some(previous) = templates.insert(name.to_string(), Arc::clone(&compiled))
        && previous.path != compiled.path
    {
        warn!(
            "Template '{}' from {} replaces the one from {}",
            name,
            display_origin(compiled.path.as_deref()),
            display_origin(previous.path.as_deref())
        );
    }
}

fn display_origin(path: Option<&Path>) -> String {
    path.map_or_else(|| "memory".to_string(), |p| p.display().to_string())
}

/// Register every template under `dir`, named by its path relative to `dir`.
async fn load_template_directory(
    environment: &Environment,
    templates: &TemplateMap,
    dir: &Path,
) -> Result<Vec<String>> {
    let files = scan_directory(Some(dir), &[TEMPLATE_EXTENSION]).await?;
    let mut names = Vec::with_capacity(files.len());

    for file in files {
        let Some(name) = name_relative_to(&file, dir) else {
            continue;
        };
        let path = environment.load(&name).await?;
        store_template(templates, &name, Some(path));
        names.push(name);
    }
    Ok(names)
}

/// Register every filter module under `dir`, named by its file stem.
async fn load_filter_directory(environment: &Environment, dir: &Path) -> Result<Vec<String>> {
    let files = scan_directory(Some(dir), &[FILTER_EXTENSION]).await?;
    let mut names = Vec::with_capacity(files.len());

    for file in files {
        let Some(name) = file_stem_name(&file) else {
            continue;
        };
        let filter = ScriptFilter::load(&name, &file).await?;
        environment.register_filter(&name, filter).await;
        names.push(name);
    }
    Ok(names)
}

#[async_trait]
impl TemplateEngine for TeraEngine {
    fn metadata(&self) -> &'static Metadata {
        &METADATA
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            engine: ENGINE_HANDLE.to_string(),
            version: None,
        }
    }

    fn core(&self) -> Option<&dyn Any> {
        self.environment.as_ref().map(|environment| environment as &dyn Any)
    }

    async fn initialise(&mut self) -> Result<()> {
        if self.environment.is_some() {
            return Err(EngineError::AlreadyInitialised);
        }

        let paths = self.resolve_paths()?;
        let settings = EngineSettings::from_config(self.config.as_ref(), ENGINE_HANDLE)?;
        let pages_path = resolve_from_cwd(&self.pages_path)?;

        let environment = Environment::new(
            vec![pages_path.clone(), paths.partials.clone(), paths.helpers.clone()],
            settings,
        );
        let templates = TemplateMap::new();

        let partials = load_template_directory(&environment, &templates, &paths.partials).await?;
        debug!("Partials loaded: {:?}", partials);

        let pages = load_template_directory(&environment, &templates, &pages_path).await?;
        debug!("Templates loaded: {:?}", pages);

        let helpers = load_template_directory(&environment, &templates, &paths.helpers).await?;
        debug!("Helpers loaded: {:?}", helpers);

        let filters = load_filter_directory(&environment, &paths.filters).await?;
        debug!("Filters loaded: {:?}", filters);

        info!(
            "Tera initialised with {} templates and {} filters (watch: {}, autoescape: {})",
            templates.len(),
            filters.len(),
            settings.watch,
            settings.autoescape
        );

        self.pages_path = pages_path;
        self.paths = Some(paths);
        self.templates = templates;
        self.environment = Some(environment);
        Ok(())
    }

    async fn register(&self, name: &str, _data: Option<&str>, _path: Option<&Path>) -> Result<()> {
        let environment = self.require_environment()?;
        let path = environment.load(name).await?;
        store_template(&self.templates, name, Some(path));
        Ok(())
    }

    async fn render(
        &self,
        name: &str,
        _data: Option<&str>,
        locals: &Value,
        _options: Option<&Value>,
    ) -> Result<String> {
        self.require_environment()?.render(name, locals).await
    }

    async fn load_additional_templates(&self) -> Result<Vec<String>> {
        let environment = self.require_environment()?;

        // Nothing is registered unless every file could be read
        let files = read_files_parallel(&self.additional_templates).await?;

        let mut sources = Vec::with_capacity(files.len());
        for (path, source) in files {
            let Some(name) =
                name_relative_to(&path, &self.pages_path).or_else(|| file_stem_name(&path))
            else {
                warn!("Cannot derive a template name from {}", path.display());
                continue;
            };
            sources.push((name, source, Some(path)));
        }

        // Compiled as one batch, so a malformed file registers nothing
        let registered: Vec<(String, Option<PathBuf>)> =
            sources.iter().map(|(name, _, path)| (name.clone(), path.clone())).collect();
        environment.add_sources(sources).await?;

        let mut names = Vec::with_capacity(registered.len());
        for (name, path) in registered {
            store_template(&self.templates, &name, path);
            names.push(name);
        }

        debug!("Additional templates loaded: {:?}", names);
        Ok(names)
    }
}

/// Creates [`TeraEngine`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraEngineFactory;

impl EngineFactory for TeraEngineFactory {
    fn metadata(&self) -> &'static Metadata {
        &METADATA
    }

    fn create(&self, options: EngineOptions) -> Box<dyn TemplateEngine> {
        Box::new(TeraEngine::new(options))
    }
}

/// Entry point for hosts: the factory of Tera engines.
///
/// ```rust
/// use web_tera::engine::EngineFactory;
///
/// let factory = web_tera::factory();
/// assert_eq!(factory.metadata().handle, "tera");
/// assert_eq!(factory.metadata().extensions, &[".tera"]);
/// ```
pub fn factory() -> TeraEngineFactory {
    TeraEngineFactory
}
