//! The Tera environment owned by one engine instance.
//!
//! Templates are addressed by key (`products.tera`, `admin/users.tera`) and
//! resolved through an ordered list of search paths: the first directory that
//! holds the file wins. Loading a template also loads what it extends,
//! imports or includes, and the whole batch is added to Tera at once so
//! inheritance chains and macro imports resolve regardless of load order.
//!
//! With watch enabled, [`Environment::render`] first reloads every template
//! whose file changed on disk since it was loaded.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;
use tera::{Context, Tera};
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::config::EngineSettings;
use crate::constants::TEMPLATE_EXTENSION;
use crate::core::{EngineError, Result, describe_tera_error, missing_template_in};

use super::dependencies::extract_references;
use super::utils::{find_similar_names, template_key, template_name};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplateOrigin {
    path: Option<PathBuf>,
    modified: Option<SystemTime>,
}

struct PendingTemplate {
    key: String,
    source: String,
    origin: TemplateOrigin,
}

struct Inner {
    tera: Tera,
    origins: HashMap<String, TemplateOrigin>,
    filters: BTreeSet<String>,
}

/// Tera plus the search paths and bookkeeping needed to load from disk.
pub struct Environment {
    inner: RwLock<Inner>,
    search_paths: Vec<PathBuf>,
    settings: EngineSettings,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("search_paths", &self.search_paths)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Create an empty environment searching `search_paths` in order.
    pub fn new(search_paths: Vec<PathBuf>, settings: EngineSettings) -> Self {
        let mut tera = Tera::default();
        if settings.autoescape {
            tera.autoescape_on(vec![TEMPLATE_EXTENSION]);
        } else {
            tera.autoescape_on(vec![]);
        }

        Self {
            inner: RwLock::new(Inner {
                tera,
                origins: HashMap::new(),
                filters: BTreeSet::new(),
            }),
            search_paths,
            settings,
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// First file named `key` under the search paths.
    pub async fn resolve(&self, key: &str) -> Option<PathBuf> {
        for dir in &self.search_paths {
            let candidate = dir.join(key);
            match tokio::fs::metadata(&candidate).await {
                Ok(metadata) if metadata.is_file() => {
                    trace!("Resolved '{}' to {}", key, candidate.display());
                    return Some(candidate);
                }
                _ => trace!("'{}' not in {}", key, dir.display()),
            }
        }
        None
    }

    /// Load the template `name` from the search paths, recompiling it if it
    /// was loaded before. Returns the file it was read from.
    ///
    /// # Errors
    ///
    /// [`EngineError::TemplateNotFound`] if `name` or a template it extends or
    /// imports cannot be found, [`EngineError::FileRead`] if a file cannot be
    /// read, [`EngineError::TemplateCompile`] if the source is malformed.
    pub async fn load(&self, name: &str) -> Result<PathBuf> {
        let key = template_key(name);
        let Some(root) = self.read_template(&key).await? else {
            return Err(self.not_found(name).await);
        };

        let path = root.origin.path.clone().unwrap_or_default();
        self.compile(name, vec![root]).await?;
        Ok(path)
    }

    /// Add the template `name` from in-memory `source`.
    ///
    /// Templates it references are still loaded from the search paths.
    /// `path` is the file the source was read from, if any; with watch
    /// enabled the template is reloaded from there once that file changes.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load), except that `name` itself is never looked up.
    pub async fn add_source(&self, name: &str, source: String, path: Option<PathBuf>) -> Result<()> {
        let root = in_memory(name, source, path).await;
        self.compile(name, vec![root]).await
    }

    /// Add several in-memory templates as one batch: either all of them are
    /// compiled or none is.
    ///
    /// Each entry is `(name, source, path)` as for [`add_source`](Self::add_source).
    ///
    /// # Errors
    ///
    /// As for [`add_source`](Self::add_source). On error nothing from the
    /// batch is visible.
    pub async fn add_sources(&self, sources: Vec<(String, String, Option<PathBuf>)>) -> Result<()> {
        if sources.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = sources.iter().map(|(name, _, _)| name.clone()).collect();
        let mut roots = Vec::with_capacity(sources.len());
        for (name, source, path) in sources {
            roots.push(in_memory(&name, source, path).await);
        }
        self.compile(&names.join(", "), roots).await
    }

    /// Render the template `name` with `locals` as its context.
    ///
    /// # Errors
    ///
    /// [`EngineError::TemplateNotFound`] if `name` or an include is missing,
    /// [`EngineError::Render`] if evaluation fails or `locals` is not an object,
    /// or the reload error if `name` changed on disk and no longer compiles.
    pub async fn render(&self, name: &str, locals: &Value) -> Result<String> {
        if self.settings.watch {
            let mut failures = self.reload_stale().await;
            if let Some(error) = failures.remove(&template_key(name)) {
                return Err(error);
            }
        }
        if !self.has_template(name).await {
            debug!("Loading '{}' on demand", name);
            self.load(name).await?;
        }

        let context = Context::from_value(locals.clone()).map_err(|e| EngineError::Render {
            name: name.to_string(),
            message: format!("locals must be an object: {}", describe_tera_error(&e)),
        })?;

        let key = template_key(name);
        let mut attempted: HashSet<String> = HashSet::new();
        loop {
            let missing = {
                let inner = self.inner.read().await;
                match inner.tera.render(&key, &context) {
                    Ok(output) => return Ok(output),
                    Err(e) => match missing_template_in(&e) {
                        Some(missing) => template_name(&missing).to_string(),
                        None => {
                            return Err(EngineError::Render {
                                name: name.to_string(),
                                message: describe_tera_error(&e),
                            });
                        }
                    },
                }
            };

            // Includes are only resolved at render time
            if !attempted.insert(missing.clone())
                || self.resolve(&template_key(&missing)).await.is_none()
            {
                return Err(self.not_found(&missing).await);
            }
            debug!("Loading '{}' included from '{}' on demand", missing, name);
            self.load(&missing).await?;
        }
    }

    /// Make `filter` available to templates as `name`.
    pub async fn register_filter<F>(&self, name: &str, filter: F)
    where
        F: tera::Filter + 'static,
    {
        let mut inner = self.inner.write().await;
        if !inner.filters.insert(name.to_string()) {
            warn!("Filter '{}' registered twice, keeping the last one", name);
        }
        inner.tera.register_filter(name, filter);
    }

    /// Names of the registered filters, sorted.
    pub async fn filter_names(&self) -> Vec<String> {
        self.inner.read().await.filters.iter().cloned().collect()
    }

    /// Names of every loaded template, sorted.
    pub async fn template_names(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut names: Vec<String> =
            inner.origins.keys().map(|key| template_name(key).to_string()).collect();
        names.sort();
        names
    }

    pub async fn has_template(&self, name: &str) -> bool {
        self.inner.read().await.origins.contains_key(&template_key(name))
    }

    async fn read_template(&self, key: &str) -> Result<Option<PendingTemplate>> {
        let Some(path) = self.resolve(key).await else {
            return Ok(None);
        };
        let (source, modified) = read_with_mtime(&path).await?;

        Ok(Some(PendingTemplate {
            key: key.to_string(),
            source,
            origin: TemplateOrigin {
                path: Some(path),
                modified,
            },
        }))
    }

    /// Add `roots` and any templates they reference that are not loaded yet.
    async fn compile(&self, name: &str, roots: Vec<PendingTemplate>) -> Result<()> {
        let loaded: HashSet<String> = self.inner.read().await.origins.keys().cloned().collect();

        let mut seen: HashSet<String> = roots.iter().map(|root| root.key.clone()).collect();
        let mut queue = VecDeque::from(roots);
        let mut batch: Vec<PendingTemplate> = Vec::new();

        while let Some(template) = queue.pop_front() {
            for reference in extract_references(&template.source) {
                if loaded.contains(&reference.target) || !seen.insert(reference.target.clone()) {
                    continue;
                }
                match self.read_template(&reference.target).await? {
                    Some(dependency) => queue.push_back(dependency),
                    None if reference.kind.is_required() => {
                        return Err(self.not_found(template_name(&reference.target)).await);
                    }
                    None => trace!(
                        "'{}' includes '{}', which is not available yet",
                        template.key, reference.target
                    ),
                }
            }
            batch.push(template);
        }

        self.add_batch(name, batch).await
    }

    async fn add_batch(&self, name: &str, batch: Vec<PendingTemplate>) -> Result<()> {
        let mut inner = self.inner.write().await;

        // Tera may keep half of a failed batch, so compile into a copy
        let mut staged = inner.tera.clone();
        staged
            .add_raw_templates(batch.iter().map(|t| (t.key.as_str(), t.source.as_str())))
            .map_err(|e| EngineError::TemplateCompile {
                name: name.to_string(),
                message: describe_tera_error(&e),
            })?;
        inner.tera = staged;

        for template in batch {
            debug!(
                "Compiled '{}'{}",
                template.key,
                template
                    .origin
                    .path
                    .as_deref()
                    .map(|p| format!(" from {}", p.display()))
                    .unwrap_or_default()
            );
            inner.origins.insert(template.key, template.origin);
        }
        Ok(())
    }

    /// Re-read every template whose file changed since it was loaded.
    ///
    /// Each changed template is recompiled on its own, together with whatever
    /// it now references. A template that fails keeps its last compiled
    /// version and its error is returned under its key, so only renders of
    /// that template fail. The next render retries it.
    async fn reload_stale(&self) -> HashMap<String, EngineError> {
        let tracked: Vec<(String, PathBuf, Option<SystemTime>)> = {
            let inner = self.inner.read().await;
            inner
                .origins
                .iter()
                .filter_map(|(key, origin)| {
                    origin.path.clone().map(|path| (key.clone(), path, origin.modified))
                })
                .collect()
        };

        let mut failures = HashMap::new();
        for (key, path, modified) in tracked {
            let current = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata.modified().ok(),
                Err(_) => {
                    debug!("{} is gone, keeping the compiled '{}'", path.display(), key);
                    continue;
                }
            };
            if current.is_none() || current == modified {
                continue;
            }

            debug!("{} changed on disk, reloading '{}'", path.display(), key);
            let name = template_name(&key).to_string();
            let reloaded = match read_with_mtime(&path).await {
                Ok((source, modified)) => {
                    let pending = PendingTemplate {
                        key: key.clone(),
                        source,
                        origin: TemplateOrigin {
                            path: Some(path),
                            modified,
                        },
                    };
                    self.compile(&name, vec![pending]).await
                }
                Err(e) => Err(e),
            };

            if let Err(e) = reloaded {
                warn!("Keeping the previous '{}': {}", name, e);
                failures.insert(key, e);
            }
        }
        failures
    }

    async fn not_found(&self, name: &str) -> EngineError {
        let inner = self.inner.read().await;
        EngineError::TemplateNotFound {
            name: name.to_string(),
            searched: self.search_paths.clone(),
            suggestions: similar_names(&inner, name),
        }
    }
}

fn similar_names(inner: &Inner, name: &str) -> Vec<String> {
    find_similar_names(name, inner.origins.keys().map(|key| template_name(key)))
}

async fn in_memory(name: &str, source: String, path: Option<PathBuf>) -> PendingTemplate {
    let modified = match &path {
        Some(path) => modified_time(path).await,
        None => None,
    };
    PendingTemplate {
        key: template_key(name),
        source,
        origin: TemplateOrigin {
            path,
            modified,
        },
    }
}

async fn read_with_mtime(path: &Path) -> Result<(String, Option<SystemTime>)> {
    let source = tokio::fs::read_to_string(path).await.map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((source, modified_time(path).await))
}

async fn modified_time(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok().and_then(|metadata| metadata.modified().ok())
}
