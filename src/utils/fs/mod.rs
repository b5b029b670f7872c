//! File system helpers used while loading templates and filters.
//!
//! - [`discovery`] - recursive, extension-filtered directory scans
//! - [`parallel`] - concurrent, fail-fast file reads
//! - [`paths`] - resolution of configured directories

pub mod discovery;
pub mod parallel;
pub mod paths;

pub use discovery::scan_directory;
pub use parallel::read_files_parallel;
pub use paths::{resolve_from_cwd, resolve_path};
