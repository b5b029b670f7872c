//! Path resolution for configured directories.

use std::path::{Path, PathBuf};

use crate::core::{EngineError, Result};

/// Resolve a configured path.
///
/// `~` and environment variables are expanded first; a path that is still
/// relative afterwards is joined onto `base` (normally the process working
/// directory).
///
/// # Errors
///
/// Returns [`EngineError::Config`] if expansion refers to an undefined
/// variable or the path is not valid UTF-8.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use web_tera::utils::fs::resolve_path;
///
/// let resolved = resolve_path(Path::new("workspace/utils/filters"), Path::new("/srv/site")).unwrap();
/// assert_eq!(resolved, Path::new("/srv/site/workspace/utils/filters"));
/// ```
pub fn resolve_path(path: &Path, base: &Path) -> Result<PathBuf> {
    let raw = path.to_str().ok_or_else(|| EngineError::Config {
        message: format!("path is not valid UTF-8: {}", path.display()),
    })?;

    let expanded = shellexpand::full(raw).map_err(|e| EngineError::Config {
        message: format!("cannot expand path '{raw}': {e}"),
    })?;

    let expanded = PathBuf::from(expanded.as_ref());
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Resolve a configured path against the current working directory.
///
/// # Errors
///
/// See [`resolve_path`]; also fails when the working directory is unavailable.
pub fn resolve_from_cwd(path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| EngineError::Config {
        message: format!("cannot determine working directory: {e}"),
    })?;
    resolve_path(path, &cwd)
}
