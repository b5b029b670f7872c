//! Fixture workspaces and sample data
//!
//! The checked-in fixture workspace lives in `tests/fixtures/workspace`:
//!
//! ```text
//! workspace/
//! ├── filters/        uppercase.lua, shout.lua
//! ├── helpers/        helpers.tera (macros)
//! └── pages/
//!     ├── partials/   header.tera, footer.tera
//!     └── products*.tera
//! ```

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::Config;
use crate::engine::EngineOptions;
use crate::templating::TeraEngine;

/// Location of the checked-in fixture workspace.
pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("workspace")
}

/// A throwaway site directory with pages, partials, helpers and filters.
///
/// Dropping the workspace deletes the directory.
pub struct TestWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

impl TestWorkspace {
    /// Copy the fixture workspace into a temporary directory.
    pub fn new() -> Result<Self> {
        let workspace = Self::empty()?;
        copy_tree(&fixture_root(), &workspace.root)?;
        Ok(workspace)
    }

    /// A workspace with the directory layout but no files.
    pub fn empty() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp dir")?;
        let root = temp.path().join("workspace");

        let workspace = Self {
            _temp: temp,
            root,
        };
        for dir in [workspace.partials(), workspace.helpers(), workspace.filters()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages(&self) -> PathBuf {
        self.root.join("pages")
    }

    pub fn partials(&self) -> PathBuf {
        self.root.join("pages").join("partials")
    }

    pub fn helpers(&self) -> PathBuf {
        self.root.join("helpers")
    }

    pub fn filters(&self) -> PathBuf {
        self.root.join("filters")
    }

    /// Write `content` to `relative` (from the workspace root), creating
    /// parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Host configuration pointing `engines.tera.paths` at this workspace.
    pub fn config(&self) -> Config {
        let mut config = Config::new();
        config.set("engines.tera.paths.helpers", path_value(&self.helpers()));
        config.set("engines.tera.paths.filters", path_value(&self.filters()));
        config.set("engines.tera.paths.partials", path_value(&self.partials()));
        config
    }

    /// Engine options for this workspace with the given configuration.
    pub fn options_with(&self, config: Config) -> EngineOptions {
        EngineOptions::new(Arc::new(config), self.pages())
    }

    pub fn options(&self) -> EngineOptions {
        self.options_with(self.config())
    }

    /// An uninitialised engine over this workspace.
    pub fn engine(&self) -> TeraEngine {
        TeraEngine::new(self.options())
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.with_context(|| format!("Failed to walk {}", from.display()))?;
        let relative = entry.path().strip_prefix(from)?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

/// The two-product locals used by the product page fixtures.
pub fn sample_products() -> Value {
    json!({
        "products": [
            { "name": "Super Thing 3000", "price": 5000 },
            { "name": "Mega Thang XL", "price": 8000 }
        ]
    })
}

/// Collapse whitespace and drop it between tags, so markup can be compared
/// regardless of indentation.
///
/// ```rust
/// use web_tera::test_utils::normalize_html;
///
/// assert_eq!(normalize_html("<ul>\n  <li>a  b</li>\n</ul>\n"), "<ul><li>a b</li></ul>");
/// ```
pub fn normalize_html(html: &str) -> String {
    html.split_whitespace().collect::<Vec<_>>().join(" ").replace("> <", "><")
}
