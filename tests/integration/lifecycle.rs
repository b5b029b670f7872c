//! Metadata, factory and the initialise/register lifecycle.

use std::sync::Arc;

use web_tera::engine::{EngineFactory, TemplateEngine};
use web_tera::test_utils::TestWorkspace;
use web_tera::{EngineError, METADATA, factory};

use crate::common::initialised_site;

#[test]
fn test_metadata_block_has_handle_and_extensions() {
    let first = factory();
    let second = factory();

    assert!(!first.metadata().handle.is_empty());
    assert!(!first.metadata().extensions.is_empty());
    assert_eq!(first.metadata(), second.metadata());
    assert!(std::ptr::eq(first.metadata(), &METADATA));
}

#[test]
fn test_declares_tera_extension() {
    assert!(factory().metadata().extensions.contains(&".tera"));
}

#[tokio::test]
async fn test_loads_pages() {
    let site = initialised_site().await.unwrap();

    site.engine.register("products", None, None).await.unwrap();

    let products = site.engine.template("products").expect("products should be registered");
    assert_eq!(products.name, "products");
    assert_eq!(products.key, "products.tera");
    assert_eq!(products.path, Some(site.workspace.pages().join("products.tera")));
}

#[tokio::test]
async fn test_initialise_registers_every_directory() {
    let site = initialised_site().await.unwrap();
    let names = site.engine.template_names();

    for expected in [
        "header",
        "footer",
        "products",
        "products-with-helpers",
        "products-with-filters",
        "partials/header",
        "helpers",
    ] {
        assert!(names.iter().any(|name| name == expected), "missing {expected} in {names:?}");
    }

    let environment = site.engine.environment().unwrap();
    assert_eq!(environment.filter_names().await, vec!["shout", "uppercase"]);
    assert_eq!(
        environment.search_paths(),
        &[site.workspace.pages(), site.workspace.partials(), site.workspace.helpers()]
    );
}

#[tokio::test]
async fn test_register_twice_recompiles() {
    let site = initialised_site().await.unwrap();

    site.engine.register("products", None, None).await.unwrap();
    let first = site.engine.template("products").unwrap();

    site.engine.register("products", None, None).await.unwrap();
    let second = site.engine.template("products").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.path, second.path);
    assert!(second.compiled_at >= first.compiled_at);
}

#[tokio::test]
async fn test_register_unknown_template_suggests_names() {
    let site = initialised_site().await.unwrap();

    let err = site.engine.register("prodcts", None, None).await.unwrap_err();
    match err {
        EngineError::TemplateNotFound {
            name,
            searched,
            suggestions,
        } => {
            assert_eq!(name, "prodcts");
            assert_eq!(searched.len(), 3);
            assert_eq!(suggestions.first().map(String::as_str), Some("products"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_factory_creates_boxed_engine() {
    let workspace = TestWorkspace::new().unwrap();
    let mut engine = factory().create(workspace.options());

    assert!(engine.core().is_none());
    engine.initialise().await.unwrap();
    assert!(engine.core().is_some());
    assert_eq!(engine.info().engine, METADATA.handle);
}

#[tokio::test]
async fn test_empty_directories_initialise_cleanly() {
    let workspace = TestWorkspace::empty().unwrap();
    let mut engine = workspace.engine();

    engine.initialise().await.unwrap();
    assert!(engine.template_names().is_empty());
}
