//! Template and filter discovery.
//!
//! Walks a directory tree and collects the files whose suffix is one of the
//! requested extensions. Used by `initialise` to enumerate partials, pages,
//! helpers and filters.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::{EngineError, Result};

/// Recursively collect files under `dir` whose extension is in `extensions`.
///
/// Extensions are given with their leading dot (`".tera"`); a bare suffix
/// (`"tera"`) is accepted too. Results are sorted by file name within each
/// directory so that enumeration order is stable across platforms.
///
/// # Arguments
///
/// * `dir` - Directory to scan, or `None` to skip the scan
/// * `extensions` - Accepted file suffixes
///
/// # Returns
///
/// The matching files. `None` short-circuits to an empty list.
///
/// # Errors
///
/// Returns [`EngineError::DirectoryRead`] if the directory does not exist or
/// any entry beneath it cannot be read.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use web_tera::utils::fs::scan_directory;
///
/// # async fn example() -> web_tera::core::Result<()> {
/// let pages = scan_directory(Some(Path::new("workspace/pages")), &[".tera"]).await?;
/// let nothing = scan_directory(None, &[".tera"]).await?;
/// assert!(nothing.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn scan_directory(dir: Option<&Path>, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let Some(dir) = dir else {
        return Ok(Vec::new());
    };

    let dir = dir.to_path_buf();
    let extensions: Vec<String> =
        extensions.iter().map(|ext| ext.trim_start_matches('.').to_string()).collect();

    // walkdir is synchronous
    let root = dir.clone();
    tokio::task::spawn_blocking(move || find_files_with_extensions(&root, &extensions))
        .await
        .map_err(|e| EngineError::DirectoryRead {
            path: dir,
            source: std::io::Error::other(e),
        })?
}

fn find_files_with_extensions(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| EngineError::DirectoryRead {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext));

        if matches {
            tracing::trace!("Discovered {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    tracing::debug!("Found {} file(s) under {}", files.len(), dir.display());
    Ok(files)
}
