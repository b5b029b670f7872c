//! Rendering pages with locals, helpers and filters.

use serde_json::json;
use web_tera::EngineError;
use web_tera::engine::TemplateEngine;
use web_tera::test_utils::{TestWorkspace, normalize_html, sample_products};

use crate::common::{expected_product_page, initialised_site};

#[tokio::test]
async fn test_renders_pages_with_locals() {
    let site = initialised_site().await.unwrap();
    site.engine.register("products", None, None).await.unwrap();

    let output = site.engine.render("products", None, &sample_products(), None).await.unwrap();

    assert_eq!(normalize_html(&output), expected_product_page("", false));
    assert_eq!(output.matches("<li>").count(), 2);
}

#[tokio::test]
async fn test_renders_pages_with_helpers() {
    let workspace = TestWorkspace::new().unwrap();
    let options = workspace.options().with_helpers(workspace.helpers());
    let mut engine = web_tera::TeraEngine::new(options);
    engine.initialise().await.unwrap();

    engine.register("products-with-helpers", None, None).await.unwrap();
    let output =
        engine.render("products-with-helpers", None, &sample_products(), None).await.unwrap();

    assert_eq!(normalize_html(&output), expected_product_page("helper: ", false));
}

#[tokio::test]
async fn test_renders_pages_with_filters() {
    let site = initialised_site().await.unwrap();
    site.engine.register("products-with-filters", None, None).await.unwrap();

    let output =
        site.engine.render("products-with-filters", None, &sample_products(), None).await.unwrap();

    assert_eq!(normalize_html(&output), expected_product_page("filter: ", true));
}

#[tokio::test]
async fn test_filters_receive_arguments() {
    let site = initialised_site().await.unwrap();

    let output =
        site.engine.render("products-shouting", None, &sample_products(), None).await.unwrap();

    assert_eq!(
        normalize_html(&output),
        "<ul><li>SUPER THING 3000! SUPER THING 3000?</li><li>MEGA THANG XL! MEGA THANG XL?</li></ul>"
    );
}

#[tokio::test]
async fn test_render_without_register_loads_on_demand() {
    let site = initialised_site().await.unwrap();
    site.workspace
        .write("pages/late.tera", r#"{% include "header.tera" %}<p>{{ note }}</p>"#)
        .unwrap();

    let output = site.engine.render("late", None, &json!({ "note": "added later" }), None).await.unwrap();
    assert_eq!(normalize_html(&output), "<header>My online store</header><p>added later</p>");
}

#[tokio::test]
async fn test_render_unknown_template_is_not_found() {
    let site = initialised_site().await.unwrap();

    let err = site.engine.render("missing-page", None, &json!({}), None).await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

#[tokio::test]
async fn test_render_failure_is_render_error() {
    let site = initialised_site().await.unwrap();

    // products without locals iterates an undefined variable
    let err = site.engine.render("products", None, &json!({}), None).await.unwrap_err();
    match err {
        EngineError::Render {
            name,
            message,
        } => {
            assert_eq!(name, "products");
            assert!(message.contains("products"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_locals_are_escaped() {
    let site = initialised_site().await.unwrap();
    let locals = json!({ "products": [{ "name": "<script>", "price": 1 }] });

    let output = site.engine.render("products", None, &locals, None).await.unwrap();
    assert!(output.contains("&lt;script&gt;"), "output: {output}");
    assert!(!output.contains("<script>"));
}

#[tokio::test]
async fn test_filter_pages_need_the_script_filter() {
    let workspace = TestWorkspace::new().unwrap();
    std::fs::remove_file(workspace.filters().join("uppercase.lua")).unwrap();

    let mut engine = workspace.engine();
    engine.initialise().await.unwrap();

    let err =
        engine.render("products-with-filters", None, &sample_products(), None).await.unwrap_err();
    match err {
        EngineError::Render {
            message,
            ..
        } => assert!(message.contains("uppercase"), "message: {message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
