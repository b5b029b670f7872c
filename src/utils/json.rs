//! JSON value helpers.

use serde_json::{Map, Value};

/// Perform a deep merge of two JSON values.
///
/// Recursively merges `overrides` into `base`. For objects, fields from `overrides`
/// are added or replace fields in `base`. For arrays and primitives, `overrides`
/// completely replaces `base`.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use web_tera::utils::deep_merge_json;
///
/// let defaults = json!({ "paths": { "helpers": "a", "filters": "b" }, "watch": true });
/// let explicit = json!({ "paths": { "filters": "custom" } });
///
/// let merged = deep_merge_json(defaults, &explicit);
/// assert_eq!(merged, json!({ "paths": { "helpers": "a", "filters": "custom" }, "watch": true }));
/// ```
pub fn deep_merge_json(mut base: Value, overrides: &Value) -> Value {
    match (base.as_object_mut(), overrides.as_object()) {
        (Some(base_obj), Some(override_obj)) => {
            for (key, override_value) in override_obj {
                match base_obj.get_mut(key) {
                    Some(base_value) if base_value.is_object() && override_value.is_object() => {
                        let merged = deep_merge_json(base_value.take(), override_value);
                        *base_value = merged;
                    }
                    _ => {
                        base_obj.insert(key.clone(), override_value.clone());
                    }
                }
            }
            base
        }
        (_, _) => overrides.clone(),
    }
}

/// Look up a dotted path (`engines.tera.paths`) in a JSON tree.
///
/// Empty segments are ignored, so `"engines..tera"` behaves like
/// `"engines.tera"`. Array elements can be addressed by index.
pub fn lookup_dotted<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').filter(|segment| !segment.is_empty()).try_fold(root, |node, segment| {
        match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Set a value at a dotted path, creating intermediate objects as needed.
///
/// Non-object nodes on the way are replaced by objects.
pub fn set_dotted(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').filter(|segment| !segment.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };
        node = map.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), value);
    }
}
