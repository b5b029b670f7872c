//! Integration test suite for the Tera engine
//!
//! These tests drive the engine through its public lifecycle against a
//! temporary copy of `tests/fixtures/workspace`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=web_tera=debug cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **lifecycle**: metadata, factory, initialise and register
//! - **rendering**: pages with locals, helpers, filters and errors
//! - **additional_templates**: fail-fast loading of host-supplied templates
//! - **reload**: picking up edited templates when watch is enabled
//! - **host_config**: configuration defaults and overrides

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod additional_templates;
mod host_config;
mod lifecycle;
mod reload;
mod rendering;
