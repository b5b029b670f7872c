//! Reloading templates that changed on disk.

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use web_tera::engine::TemplateEngine;
use web_tera::test_utils::{TestWorkspace, normalize_html, sample_products};
use web_tera::{EngineError, TeraEngine};

/// Rewrite `path` and move its modification time forward, so the change is
/// visible even on filesystems with coarse timestamps.
fn rewrite(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();
}

#[tokio::test]
async fn test_watch_reloads_edited_partials() {
    let workspace = TestWorkspace::new().unwrap();
    let mut engine = workspace.engine();
    engine.initialise().await.unwrap();

    let before = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert!(before.contains("My online store"));

    rewrite(&workspace.partials().join("header.tera"), "<header>Closing down sale</header>\n");

    let after = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert!(normalize_html(&after).starts_with("<header>Closing down sale</header>"), "{after}");
}

#[tokio::test]
async fn test_watch_disabled_keeps_compiled_templates() {
    let workspace = TestWorkspace::new().unwrap();
    let mut config = workspace.config();
    config.set("engines.tera.watch", false);

    let mut engine = TeraEngine::new(workspace.options_with(config));
    engine.initialise().await.unwrap();

    rewrite(&workspace.pages().join("products.tera"), "replaced");

    let output = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert!(output.contains("Super Thing 3000"));
    assert!(!output.contains("replaced"));

    // an explicit register still picks up the new file
    engine.register("products", None, None).await.unwrap();
    let output = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert_eq!(output, "replaced");
}

#[tokio::test]
async fn test_deleted_file_keeps_last_compiled_version() {
    let workspace = TestWorkspace::new().unwrap();
    let mut engine = workspace.engine();
    engine.initialise().await.unwrap();

    std::fs::remove_file(workspace.partials().join("footer.tera")).unwrap();

    let output = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert!(output.contains("Made by JIM"));
}

#[tokio::test]
async fn test_edit_importing_new_template_reloads_with_its_dependency() {
    let workspace = TestWorkspace::new().unwrap();
    let mut engine = workspace.engine();
    engine.initialise().await.unwrap();
    engine.render("products", None, &sample_products(), None).await.unwrap();

    workspace
        .write("pages/partials/greetings.tera", "{% macro hi() %}hello{% endmacro hi %}")
        .unwrap();
    rewrite(
        &workspace.pages().join("products.tera"),
        r#"{% import "greetings.tera" as greetings %}{{ greetings::hi() }}"#,
    );

    let output = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert_eq!(output, "hello");

    let other = engine.render("products-with-filters", None, &sample_products(), None).await.unwrap();
    assert!(other.contains("SUPER THING 3000"));
}

#[tokio::test]
async fn test_broken_edit_only_fails_the_edited_template() {
    let workspace = TestWorkspace::new().unwrap();
    let mut engine = workspace.engine();
    engine.initialise().await.unwrap();

    let products = workspace.pages().join("products.tera");
    rewrite(&products, "{% if %}");

    let err = engine.render("products", None, &sample_products(), None).await.unwrap_err();
    assert!(matches!(err, EngineError::TemplateCompile { .. }), "got: {err:?}");

    // unrelated pages keep rendering
    let other = engine.render("products-with-filters", None, &sample_products(), None).await.unwrap();
    assert!(other.contains("SUPER THING 3000"));

    // fixing the file recovers without an explicit register
    std::fs::write(&products, "fixed").unwrap();
    let file = File::options().write(true).open(&products).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(20)).unwrap();

    let output = engine.render("products", None, &sample_products(), None).await.unwrap();
    assert_eq!(output, "fixed");
}
