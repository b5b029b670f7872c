//! Static engine metadata and configuration schema.

use serde_json::{Map, Value};

use crate::constants::{
    DEFAULT_FILTERS_PATH, DEFAULT_HELPERS_PATH, DEFAULT_PARTIALS_PATH, ENGINE_HANDLE,
    TEMPLATE_EXTENSION,
};

/// Default value of a schema option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    /// Filesystem path, relative to the working directory unless absolute
    Path(&'static str),
    /// Boolean switch
    Bool(bool),
    /// Nested group of options
    Group(&'static [ConfigOption]),
}

/// One documented configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigOption {
    pub key: &'static str,
    pub doc: &'static str,
    pub default: OptionDefault,
}

impl ConfigOption {
    /// The default as a JSON value; groups become objects.
    pub fn default_value(&self) -> Value {
        match self.default {
            OptionDefault::Path(path) => Value::String(path.to_string()),
            OptionDefault::Bool(flag) => Value::Bool(flag),
            OptionDefault::Group(options) => options_to_value(options),
        }
    }
}

/// Configuration keys an engine reads from `engines.<handle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSchema {
    pub options: &'static [ConfigOption],
}

impl ConfigSchema {
    /// Render the defaults as a JSON document, ready to merge under
    /// `engines.<handle>` in host configuration.
    ///
    /// ```rust
    /// use web_tera::METADATA;
    ///
    /// let defaults = METADATA.config.defaults();
    /// assert_eq!(defaults["paths"]["filters"], "workspace/utils/filters");
    /// assert_eq!(defaults["watch"], true);
    /// ```
    pub fn defaults(&self) -> Value {
        options_to_value(self.options)
    }

    /// Find an option by dotted key, e.g. `paths.helpers`.
    pub fn option(&self, key: &str) -> Option<&'static ConfigOption> {
        let mut options = self.options;
        let mut segments = key.split('.').peekable();

        while let Some(segment) = segments.next() {
            let option = options.iter().find(|option| option.key == segment)?;
            if segments.peek().is_none() {
                return Some(option);
            }
            match option.default {
                OptionDefault::Group(children) => options = children,
                _ => return None,
            }
        }
        None
    }
}

fn options_to_value(options: &[ConfigOption]) -> Value {
    let map: Map<String, Value> =
        options.iter().map(|option| (option.key.to_string(), option.default_value())).collect();
    Value::Object(map)
}

/// What a host needs to know about an engine before instantiating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// File suffixes the engine claims, with leading dot
    pub extensions: &'static [&'static str],
    /// Unique engine identifier, also the config namespace under `engines.`
    pub handle: &'static str,
    /// Recognised configuration keys
    pub config: ConfigSchema,
}

impl Metadata {
    /// Whether `extension` is one of ours. The leading dot is optional.
    #[must_use]
    pub fn supports_extension(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        self.extensions.iter().any(|ext| ext.trim_start_matches('.') == wanted)
    }
}

const PATH_OPTIONS: &[ConfigOption] = &[
    ConfigOption {
        key: "helpers",
        doc: "Directory of helper templates (macros and fragments invoked by name)",
        default: OptionDefault::Path(DEFAULT_HELPERS_PATH),
    },
    ConfigOption {
        key: "filters",
        doc: "Directory of filter modules, one filter per file",
        default: OptionDefault::Path(DEFAULT_FILTERS_PATH),
    },
    ConfigOption {
        key: "partials",
        doc: "Directory of partial templates",
        default: OptionDefault::Path(DEFAULT_PARTIALS_PATH),
    },
];

const OPTIONS: &[ConfigOption] = &[
    ConfigOption {
        key: "paths",
        doc: "Paths required by Tera",
        default: OptionDefault::Group(PATH_OPTIONS),
    },
    ConfigOption {
        key: "watch",
        doc: "Recompile templates whose files changed since they were loaded",
        default: OptionDefault::Bool(true),
    },
    ConfigOption {
        key: "autoescape",
        doc: "Escape HTML in rendered expressions",
        default: OptionDefault::Bool(true),
    },
];

/// Metadata of the Tera engine.
pub static METADATA: Metadata = Metadata {
    extensions: &[TEMPLATE_EXTENSION],
    handle: ENGINE_HANDLE,
    config: ConfigSchema {
        options: OPTIONS,
    },
};
