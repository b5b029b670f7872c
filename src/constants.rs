//! Constants shared across the engine.
//!
//! The handle and extensions are part of the contract with the host: the host
//! matches template files to engines by extension and reads engine
//! configuration under `engines.<handle>`.

/// Unique identifier of this engine among the engines registered with a host.
pub const ENGINE_HANDLE: &str = "tera";

/// File suffix of template files handled by this engine.
pub const TEMPLATE_EXTENSION: &str = ".tera";

/// File suffix of filter modules loaded from the filters directory.
pub const FILTER_EXTENSION: &str = ".lua";

/// Default helpers directory, relative to the working directory.
pub const DEFAULT_HELPERS_PATH: &str = "workspace/utils/helpers";

/// Default filters directory, relative to the working directory.
pub const DEFAULT_FILTERS_PATH: &str = "workspace/utils/filters";

/// Default partials directory, relative to the working directory.
pub const DEFAULT_PARTIALS_PATH: &str = "workspace/pages/partials";

/// Maximum number of "did you mean" suggestions attached to a not-found error.
pub const MAX_SUGGESTIONS: usize = 3;

/// Maximum allowed Levenshtein distance as a percentage of the requested name length.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;
