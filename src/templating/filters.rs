//! Script filters for templates.
//!
//! Every `.lua` file in the filters directory defines one Tera filter, named
//! after the file stem. The chunk must evaluate to a function taking the piped
//! value and a table of keyword arguments:
//!
//! ```lua
//! -- filters/shout.lua
//! return function(value, args)
//!   return string.upper(value) .. (args.mark or "!")
//! end
//! ```
//!
//! ```text
//! {{ product.name | shout }}            → SUPER THING 3000!
//! {{ product.name | shout(mark="?") }}  → SUPER THING 3000?
//! ```
//!
//! Values cross the boundary as JSON: strings, numbers, booleans, arrays and
//! objects map to their Lua counterparts and back. Each filter owns its own
//! Lua state, so filters cannot see each other's globals.

use mlua::{Function, Lua, LuaSerdeExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tera::Value;

use crate::core::{EngineError, Result};

struct ScriptRuntime {
    lua: Lua,
    function: Function,
}

/// A Tera filter backed by a Lua function.
pub struct ScriptFilter {
    name: String,
    path: PathBuf,
    runtime: Mutex<ScriptRuntime>,
}

impl std::fmt::Debug for ScriptFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptFilter").field("name", &self.name).field("path", &self.path).finish()
    }
}

impl ScriptFilter {
    /// Read and compile the filter module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FileRead`] if the file cannot be read, or
    /// [`EngineError::FilterLoad`] if it does not evaluate to a function.
    pub async fn load(name: &str, path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path).await.map_err(|source| {
            EngineError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_source(name, path, &source)
    }

    /// Compile a filter module from source.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FilterLoad`] on a syntax error, an error raised
    /// while the chunk runs, or a chunk that returns anything but a function.
    pub fn from_source(name: &str, path: &Path, source: &str) -> Result<Self> {
        let load_error = |message: String| EngineError::FilterLoad {
            name: name.to_string(),
            path: path.to_path_buf(),
            message,
        };

        let lua = Lua::new();
        let function = lua
            .load(source)
            .set_name(format!("@{}", path.display()))
            .eval::<Function>()
            .map_err(|e| load_error(e.to_string()))?;

        tracing::debug!("Compiled filter '{}' from {}", name, path.display());

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            runtime: Mutex::new(ScriptRuntime {
                lua,
                function,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn call(&self, value: &Value, args: &HashMap<String, Value>) -> mlua::Result<Value> {
        let runtime = self
            .runtime
            .lock()
            .map_err(|_| mlua::Error::runtime("filter state poisoned by an earlier panic"))?;

        let lua_value = runtime.lua.to_value(value)?;
        let lua_args = runtime.lua.to_value(args)?;
        let result: mlua::Value = runtime.function.call((lua_value, lua_args))?;
        runtime.lua.from_value(result)
    }
}

impl tera::Filter for ScriptFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.call(value, args)
            .map_err(|e| tera::Error::msg(format!("filter '{}' failed: {e}", self.name)))
    }
}
