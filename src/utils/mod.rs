//! Supporting utilities
//!
//! # Modules
//!
//! - [`fs`] - Directory scanning, parallel reads and path resolution
//! - [`json`] - JSON value helpers used by the configuration layer

pub mod fs;
pub mod json;

pub use fs::{read_files_parallel, resolve_path, scan_directory};
pub use json::{deep_merge_json, lookup_dotted};
