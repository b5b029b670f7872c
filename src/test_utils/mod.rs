//! Test utilities for the Tera engine
//!
//! This module provides helpers for writing tests against a realistic site
//! layout without touching the checked-in fixtures:
//! - Logging initialisation that is safe to call from every test
//! - [`TestWorkspace`], a temporary copy of the fixture workspace with the
//!   matching configuration
//! - Sample render locals and an HTML normaliser for comparing output
//!
//! # Example
//!
//! ```rust,no_run
//! use web_tera::engine::TemplateEngine;
//! use web_tera::test_utils::{TestWorkspace, normalize_html, sample_products};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let workspace = TestWorkspace::new()?;
//! let mut engine = workspace.engine();
//! engine.initialise().await?;
//!
//! let html = engine.render("products", None, &sample_products(), None).await?;
//! assert!(normalize_html(&html).contains("<li>Super Thing 3000 - £5000</li>"));
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::{TestWorkspace, fixture_root, normalize_html, sample_products};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. The provided level wins over
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=web_tera=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
