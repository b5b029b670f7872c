//! Template naming helpers.

use std::path::{Component, Path};
use strsim::levenshtein;

use crate::constants::{MAX_SUGGESTIONS, SIMILARITY_THRESHOLD_PERCENT, TEMPLATE_EXTENSION};

/// Backend key of a template name: `products` → `products.tera`.
pub fn template_key(name: &str) -> String {
    format!("{name}{TEMPLATE_EXTENSION}")
}

/// Template name of a backend key: `products.tera` → `products`.
pub fn template_name(key: &str) -> &str {
    key.strip_suffix(TEMPLATE_EXTENSION).unwrap_or(key)
}

/// Name of a file found under `root`: its relative path with `/` separators
/// and the extension removed.
///
/// Returns `None` when `file` does not live under `root`.
///
/// ```rust
/// use std::path::Path;
/// use web_tera::templating::utils::name_relative_to;
///
/// let name = name_relative_to(Path::new("/site/pages/admin/users.tera"), Path::new("/site/pages"));
/// assert_eq!(name.as_deref(), Some("admin/users"));
/// ```
pub fn name_relative_to(file: &Path, root: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");

    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Name of a file without directory context: its stem.
pub fn file_stem_name(file: &Path) -> Option<String> {
    file.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

/// Up to three known names close to `target` by edit distance, closest first.
pub fn find_similar_names<'a, I>(target: &str, available: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, usize)> =
        available.into_iter().map(|name| (name, levenshtein(target, name))).collect();

    scored.sort_by(|(a_name, a_dist), (b_name, b_dist)| {
        a_dist.cmp(b_dist).then_with(|| a_name.cmp(b_name))
    });

    let threshold = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= threshold)
        .take(MAX_SUGGESTIONS)
        .map(|(name, _)| name.to_string())
        .collect()
}
