//! Dotted-path matching over arbitrary JSON payloads.
//!
//! Paths are dot-separated object keys (`"data.reviews.content"`), optionally prefixed with
//! `$.` (JSONPath style). Arrays are never named in a path: whenever the walk meets an array
//! it continues independently into every element, so the path above matches the `content`
//! field of every review. That broadcast is the only implicit rule; a missing key or a scalar
//! where an object is expected simply ends that branch with no match.

use serde_json::Value;

/// Path mapper error
#[derive(Debug, thiserror::Error)]
pub enum PathMapperError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Cannot set value at path: {0}")]
    CannotSetValue(String),
}

/// One string field found by [`collect_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// JSON pointer (RFC 6901) of the object holding the field.
    pub container: String,
    pub field: String,
    pub value: String,
}

impl PathMatch {
    /// JSON pointer of the field itself.
    pub fn pointer(&self) -> String {
        format!("{}/{}", self.container, escape_token(&self.field))
    }
}

/// Split a dotted path into segments; `None` if any segment is empty.
pub fn parse_path(path: &str) -> Option<Vec<&str>> {
    let normalized = path.trim();
    let normalized = normalized.strip_prefix("$.").unwrap_or(normalized);
    if normalized.is_empty() {
        return None;
    }
    let segments: Vec<&str> = normalized.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Every non-empty string field reached by `path`, in document order.
pub fn collect_matches(root: &Value, path: &str) -> Vec<PathMatch> {
    let mut out = Vec::new();
    if let Some(segments) = parse_path(path) {
        walk(root, String::new(), &segments, &mut out);
    }
    out
}

fn walk(node: &Value, pointer: String, segments: &[&str], out: &mut Vec<PathMatch>) {
    match node {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, format!("{}/{}", pointer, i), segments, out);
            }
        }
        Value::Object(map) => {
            let Some((head, rest)) = segments.split_first() else {
                return;
            };
            let Some(child) = map.get(*head) else {
                return;
            };
            if rest.is_empty() {
                if let Value::String(s) = child {
                    if !s.is_empty() {
                        out.push(PathMatch {
                            container: pointer,
                            field: head.to_string(),
                            value: s.clone(),
                        });
                    }
                }
            } else {
                walk(child, format!("{}/{}", pointer, escape_token(head)), rest, out);
            }
        }
        _ => {}
    }
}

/// Replace the string at `m` with `value`. The field must still hold a string.
pub fn write_back(root: &mut Value, m: &PathMatch, value: String) -> Result<(), PathMapperError> {
    let container = root
        .pointer_mut(&m.container)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| PathMapperError::InvalidPath(m.container.clone()))?;
    match container.get_mut(&m.field) {
        Some(slot @ Value::String(_)) => {
            *slot = Value::String(value);
            Ok(())
        }
        _ => Err(PathMapperError::CannotSetValue(m.pointer())),
    }
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
