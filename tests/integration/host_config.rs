//! Configuration handed over by the host.

use serde_json::json;
use web_tera::config::{Config, ConfigSource, EnginePaths};
use web_tera::engine::TemplateEngine;
use web_tera::test_utils::TestWorkspace;
use web_tera::{EngineError, METADATA, TeraEngine};

#[tokio::test]
async fn test_config_file_drives_engine_paths() {
    let workspace = TestWorkspace::new().unwrap();
    let config_path = workspace
        .write(
            "config.toml",
            &format!(
                "[engines.tera.paths]\nhelpers = {:?}\nfilters = {:?}\npartials = {:?}\n",
                workspace.helpers().display().to_string(),
                workspace.filters().display().to_string(),
                workspace.partials().display().to_string(),
            ),
        )
        .unwrap();

    let config = Config::load(&config_path).await.unwrap().with_engine_defaults(&METADATA);
    assert_eq!(config.get("engines.tera.watch"), Some(json!(true)));

    let mut engine = TeraEngine::new(workspace.options_with(config));
    engine.initialise().await.unwrap();

    let paths = engine.paths().unwrap();
    assert_eq!(paths.filters, workspace.filters());
    assert!(engine.template("header").is_some());
}

#[tokio::test]
async fn test_malformed_paths_fail_initialise() {
    let workspace = TestWorkspace::new().unwrap();
    let mut config = workspace.config();
    config.set("engines.tera.paths", json!(["not", "an", "object"]));

    let mut engine = TeraEngine::new(workspace.options_with(config));
    let err = engine.initialise().await.unwrap_err();
    assert!(matches!(err, EngineError::Config { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_autoescape_can_be_disabled() {
    let workspace = TestWorkspace::new().unwrap();
    let mut config = workspace.config();
    config.set("engines.tera.autoescape", false);

    let mut engine = TeraEngine::new(workspace.options_with(config));
    engine.initialise().await.unwrap();

    let locals = json!({ "products": [{ "name": "<em>Bold</em>", "price": 1 }] });
    let output = engine.render("products", None, &locals, None).await.unwrap();
    assert!(output.contains("<em>Bold</em>"), "output: {output}");
}

#[test]
fn test_defaults_match_schema() {
    let config = Config::new().with_engine_defaults(&METADATA);
    let paths = EnginePaths::from_config(&config, METADATA.handle).unwrap();
    assert_eq!(paths, EnginePaths::default());
}
