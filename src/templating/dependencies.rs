//! Template reference extraction.
//!
//! Tera resolves `extends` parents and `import`ed macro files when a template
//! is added, so they have to be loaded first. `include` targets are only
//! needed at render time but are loaded eagerly too when they can be found.

use regex::Regex;
use std::sync::OnceLock;

/// How one template refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Extends,
    Import,
    Include,
}

impl ReferenceKind {
    /// Whether the target must exist before the referencing template compiles.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Extends | Self::Import)
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "extends" => Some(Self::Extends),
            "import" => Some(Self::Import),
            "include" => Some(Self::Include),
            _ => None,
        }
    }
}

/// A reference to another template, by backend key (`header.tera`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReference {
    pub kind: ReferenceKind,
    pub target: String,
}

fn reference_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r#"\{%-?\s*(extends|import|include)\s+(?:"([^"]+)"|'([^']+)')"#).ok()
        })
        .as_ref()
}

fn ignored_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?s)\{#.*?#\}|\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\}").ok()
        })
        .as_ref()
}

/// Find the templates `source` extends, imports or includes, in source order.
///
/// Comments and `raw` blocks are skipped. A target referenced more than once
/// is reported once, with its first kind.
///
/// ```rust
/// use web_tera::templating::dependencies::{ReferenceKind, extract_references};
///
/// let refs = extract_references(r#"{% import "helpers.tera" as helpers %}{% include "header.tera" %}"#);
/// assert_eq!(refs[0].kind, ReferenceKind::Import);
/// assert_eq!(refs[1].target, "header.tera");
/// ```
pub fn extract_references(source: &str) -> Vec<TemplateReference> {
    let Some(pattern) = reference_pattern() else {
        return Vec::new();
    };

    let cleaned = match ignored_pattern() {
        Some(ignored) => ignored.replace_all(source, ""),
        None => source.into(),
    };

    let mut references: Vec<TemplateReference> = Vec::new();
    for captures in pattern.captures_iter(&cleaned) {
        let Some(kind) = captures.get(1).and_then(|tag| ReferenceKind::from_tag(tag.as_str()))
        else {
            continue;
        };
        let Some(target) = captures.get(2).or_else(|| captures.get(3)) else {
            continue;
        };

        if references.iter().any(|existing| existing.target == target.as_str()) {
            continue;
        }
        references.push(TemplateReference {
            kind,
            target: target.as_str().to_string(),
        });
    }
    references
}
