//! Common test utilities for the integration suite
//!
//! Builds initialised engines over a temporary copy of the fixture workspace
//! and the markup the product pages are expected to render.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::Result;
use web_tera::TeraEngine;
use web_tera::engine::TemplateEngine;
use web_tera::test_utils::{TestWorkspace, init_test_logging, normalize_html};

/// A fixture workspace and an engine initialised over it.
pub struct InitialisedSite {
    pub workspace: TestWorkspace,
    pub engine: TeraEngine,
}

/// Copy the fixtures and initialise an engine with the default options.
pub async fn initialised_site() -> Result<InitialisedSite> {
    init_test_logging(None);

    let workspace = TestWorkspace::new()?;
    let mut engine = workspace.engine();
    engine.initialise().await?;

    Ok(InitialisedSite {
        workspace,
        engine,
    })
}

/// Normalised markup of a product page whose list items read
/// `<prefix><name> - £<price>`.
pub fn expected_product_page(prefix: &str, upper_case_names: bool) -> String {
    let items: String = [("Super Thing 3000", 5000), ("Mega Thang XL", 8000)]
        .iter()
        .map(|(name, price)| {
            let name = if upper_case_names {
                name.to_uppercase()
            } else {
                name.to_string()
            };
            format!("<li>{prefix}{name} - £{price}</li>\n")
        })
        .collect();

    normalize_html(&format!(
        r#"
        <header>My online store</header>

        <h1>Products:</h1>

        <ul>
          {items}
        </ul>

        <footer>Made by JIM</footer>
        "#
    ))
}
