//! Concurrent file reads.
//!
//! Reads run concurrently on the Tokio runtime and the batch fails fast: the
//! first error is returned and the contents that were already read are
//! dropped.

use futures::future::try_join_all;
use std::path::PathBuf;

use crate::core::{EngineError, Result};

/// Read several text files concurrently.
///
/// # Arguments
///
/// * `paths` - Files to read
///
/// # Returns
///
/// `(path, content)` pairs in the same order as `paths`.
///
/// # Errors
///
/// Returns [`EngineError::FileRead`] for the first file that cannot be read.
/// No partial results are returned.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use web_tera::utils::fs::read_files_parallel;
///
/// # async fn example() -> web_tera::core::Result<()> {
/// let files = vec![PathBuf::from("routes/about.tera"), PathBuf::from("routes/faq.tera")];
/// for (path, content) in read_files_parallel(&files).await? {
///     println!("{}: {} bytes", path.display(), content.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn read_files_parallel(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let reads = paths.iter().cloned().map(|path| async move {
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok((path, content)),
            Err(source) => Err(EngineError::FileRead {
                path,
                source,
            }),
        }
    });

    // try_join_all keeps input order and stops at the first error
    try_join_all(reads).await
}
