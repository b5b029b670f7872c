//! Loading host-supplied additional templates.

use serde_json::json;
use web_tera::engine::TemplateEngine;
use web_tera::test_utils::{TestWorkspace, normalize_html};
use web_tera::{EngineError, TeraEngine};

#[tokio::test]
async fn test_additional_templates_are_registered_from_source() {
    let workspace = TestWorkspace::new().unwrap();
    let about = workspace
        .write("pages/routes/about.tera", r#"{% include "header.tera" %}<p>About</p>"#)
        .unwrap();
    let helpers = workspace.helpers().join("helpers.tera");

    let options = workspace.options().with_additional_templates(vec![about, helpers]);
    let mut engine = TeraEngine::new(options);
    engine.initialise().await.unwrap();

    let names = engine.load_additional_templates().await.unwrap();
    assert_eq!(names, vec!["routes/about", "helpers"]);

    let output = engine.render("routes/about", None, &json!({}), None).await.unwrap();
    assert_eq!(normalize_html(&output), "<header>My online store</header><p>About</p>");
}

#[tokio::test]
async fn test_additional_templates_fail_fast() {
    let workspace = TestWorkspace::new().unwrap();
    let present = workspace.write("routes/present.tera", "present").unwrap();
    let missing = workspace.root().join("routes/missing.tera");

    let options =
        workspace.options().with_additional_templates(vec![present, missing.clone()]);
    let mut engine = TeraEngine::new(options);
    engine.initialise().await.unwrap();

    let err = engine.load_additional_templates().await.unwrap_err();
    match err {
        EngineError::FileRead {
            path,
            ..
        } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }

    // nothing from the failed batch was registered
    assert!(engine.template("present").is_none());
    assert!(!engine.environment().unwrap().has_template("present").await);
}

#[tokio::test]
async fn test_additional_templates_require_initialise() {
    let workspace = TestWorkspace::new().unwrap();
    let engine = workspace.engine();

    assert!(matches!(
        engine.load_additional_templates().await,
        Err(EngineError::NotInitialised)
    ));
}

#[tokio::test]
async fn test_malformed_additional_template_registers_nothing() {
    let workspace = TestWorkspace::new().unwrap();
    let good = workspace.write("routes/good.tera", "good").unwrap();
    let bad = workspace.write("routes/bad.tera", "{% if %}").unwrap();

    let options = workspace.options().with_additional_templates(vec![good, bad]);
    let mut engine = TeraEngine::new(options);
    engine.initialise().await.unwrap();
    let before = engine.template_names();

    let err = engine.load_additional_templates().await.unwrap_err();
    assert!(matches!(err, EngineError::TemplateCompile { .. }), "got: {err:?}");

    assert_eq!(engine.template_names(), before);
    assert!(engine.template("good").is_none());
    assert!(!engine.environment().unwrap().has_template("good").await);
}
