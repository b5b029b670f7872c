//! Tera-backed template engine.
//!
//! # Overview
//!
//! [`TeraEngine`] loads templates from four places, in this order:
//!
//! 1. the partials directory (`engines.tera.paths.partials`)
//! 2. the pages directory supplied by the host
//! 3. the helpers directory (`engines.tera.paths.helpers`, or the host's
//!    `helpers` option)
//! 4. the filters directory (`engines.tera.paths.filters`), whose `.lua`
//!    modules become Tera filters
//!
//! Templates are named by their path relative to the scanned directory,
//! without the `.tera` extension: `pages/products.tera` is `products`,
//! `pages/admin/users.tera` is `admin/users`. When two files produce the same
//! name the later one is kept and a warning is logged.
//!
//! Template lookups go through the search paths `[pages, partials, helpers]`,
//! so `{% include "header.tera" %}` in a page finds `partials/header.tera`
//! unless the pages directory has its own `header.tera`.
//!
//! # Example templates
//!
//! ```text
//! {# pages/products.tera #}
//! {% include "header.tera" %}
//! <ul>
//!   {% for product in products %}<li>{{ product.name }} - £{{ product.price }}</li>{% endfor %}
//! </ul>
//!
//! {# helpers/helpers.tera #}
//! {% macro item(product) %}helper: {{ product.name }} - £{{ product.price }}{% endmacro item %}
//!
//! {# pages/products-with-helpers.tera #}
//! {% import "helpers.tera" as helpers %}
//! {% for product in products %}<li>{{ helpers::item(product=product) }}</li>{% endfor %}
//! ```
//!
//! # Modules
//!
//! - `engine` - [`TeraEngine`] and its factory
//! - [`environment`] - the owned Tera instance, search paths and reloading
//! - [`filters`] - Lua-backed filters
//! - [`dependencies`] - `extends`/`import`/`include` extraction
//! - [`utils`] - template naming and "did you mean" suggestions

mod engine;

pub mod dependencies;
pub mod environment;
pub mod filters;
pub mod utils;

pub use engine::{CompiledTemplate, TeraEngine, TeraEngineFactory, factory};
pub use environment::Environment;
pub use filters::ScriptFilter;
