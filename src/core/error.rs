//! Error handling for the engine
//!
//! Every fallible operation returns [`EngineError`] through the crate-wide
//! [`Result`] alias. Errors are propagated, never recovered locally: a single
//! failing file aborts the whole operation that touched it, and presenting the
//! failure to an end user is the host's job.
//!
//! # Error Categories
//!
//! - **File system**: [`EngineError::DirectoryRead`], [`EngineError::FileRead`]
//! - **Compilation**: [`EngineError::TemplateCompile`], [`EngineError::FilterLoad`]
//! - **Lookup and rendering**: [`EngineError::TemplateNotFound`], [`EngineError::Render`]
//! - **Lifecycle and configuration**: [`EngineError::NotInitialised`],
//!   [`EngineError::AlreadyInitialised`], [`EngineError::Config`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use web_tera::core::EngineError;
//!
//! fn status_for(error: &EngineError) -> u16 {
//!     match error {
//!         EngineError::TemplateNotFound { .. } => 404,
//!         _ => 500,
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// The error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Enumerating a configured directory failed
    ///
    /// Raised while scanning the partials, pages, helpers or filters
    /// directory. Aborts `initialise`.
    #[error("Failed to read directory {}", .path.display())]
    DirectoryRead {
        /// The directory (or entry beneath it) that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Reading a single template file failed
    #[error("Failed to read template file {}", .path.display())]
    FileRead {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Template source is malformed
    #[error("Failed to compile template '{name}': {message}")]
    TemplateCompile {
        /// Template name, without extension
        name: String,
        /// Flattened backend error message
        message: String,
    },

    /// A filter module could not be loaded
    #[error("Failed to load filter '{name}' from {}: {message}", .path.display())]
    FilterLoad {
        /// Filter name (file stem of the module)
        name: String,
        /// Path of the filter module
        path: PathBuf,
        /// Reason the module was rejected
        message: String,
    },

    /// No search path holds the requested template
    #[error("Template '{name}' not found{}", format_suggestions(.suggestions))]
    TemplateNotFound {
        /// Template name, without extension
        name: String,
        /// Directories that were searched, in order
        searched: Vec<PathBuf>,
        /// Names of loaded templates that look similar
        suggestions: Vec<String>,
    },

    /// Template evaluation failed
    #[error("Failed to render template '{name}': {message}")]
    Render {
        /// Template name, without extension
        name: String,
        /// Flattened backend error message
        message: String,
    },

    /// Engine configuration is missing or has the wrong shape
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// `register`, `render` or `load_additional_templates` called before a
    /// successful `initialise`
    #[error("Template engine is not initialised")]
    NotInitialised,

    /// `initialise` called on an instance that already completed it
    #[error("Template engine is already initialised")]
    AlreadyInitialised,
}

impl EngineError {
    /// Whether the error means the requested template does not exist.
    ///
    /// Hosts typically map this to a 404 and everything else to a 500.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Flatten a Tera error and its source chain into one readable message.
///
/// The useful part of a Tera failure is usually a few levels down the
/// chain, below a generic "Failed to render" link. Links are joined with
/// `: ` and duplicates dropped.
pub fn describe_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages: Vec<String> = Vec::new();
    let mut current: Option<&(dyn Error + 'static)> = Some(error);

    while let Some(err) = current {
        let message = err.to_string().trim().to_string();
        if !message.is_empty() && !messages.contains(&message) {
            messages.push(message);
        }
        current = err.source();
    }

    if messages.is_empty() {
        "unknown template error".to_string()
    } else {
        messages.join(": ")
    }
}

/// Find the name of a missing template anywhere in a Tera error chain.
pub fn missing_template_in(error: &tera::Error) -> Option<String> {
    use std::error::Error;

    let mut current: Option<&(dyn Error + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(tera_error) = err.downcast_ref::<tera::Error>()
            && let tera::ErrorKind::TemplateNotFound(name) = &tera_error.kind
        {
            // includes report every candidate as `[a, b]`
            let first = name.trim_matches(|c| c == '[' || c == ']').split(", ").next()?;
            return Some(first.trim_matches('"').to_string());
        }
        current = err.source();
    }
    None
}
