//! Path resolution and mutation
//!
//! Descends a [`QuestionPath`] through a JSON object and writes a value at
//! the leaf. Intermediate containers are never created: every parent
//! segment must already resolve to an object or array.

use serde_json::{Map, Value};

use crate::path::{PathSegment, PathSyntaxError, QuestionPath};

/// JSON object used as payload root
pub type JsonObject = Map<String, Value>;

/// Parse `path` and write `value` at that location, returning the payload
///
/// Consumes the caller's working copy. On failure the copy is dropped; the
/// caller keeps whatever payload it held before.
///
/// # Errors
/// - [`PathResolutionError::Syntax`] if `path` does not parse
/// - any other [`PathResolutionError`] if a parent segment does not resolve
pub fn resolve_and_set(
    mut payload: JsonObject,
    path: &str,
    value: Value,
) -> Result<JsonObject, PathResolutionError> {
    let parsed: QuestionPath = path.parse()?;
    set_in_place(&mut payload, &parsed, value)?;
    Ok(payload)
}

/// Write `value` at `path` inside `payload`
///
/// All lookups complete before the single write, so an error leaves
/// `payload` unchanged.
///
/// # Errors
/// Returns error if a segment does not resolve to the expected container
pub fn set_in_place(
    payload: &mut JsonObject,
    path: &QuestionPath,
    value: Value,
) -> Result<(), PathResolutionError> {
    let mut current = payload;
    let mut walked = Vec::with_capacity(path.len());

    for segment in path.parents() {
        walked.push(segment.to_string());
        let target = descend(current, segment, &walked)?;
        let found = kind_of(target);
        current = target
            .as_object_mut()
            .ok_or_else(|| PathResolutionError::NotAnObject {
                at: walked.join("."),
                found,
            })?;
    }

    let leaf = path.leaf();
    walked.push(leaf.to_string());

    match leaf.indices().split_last() {
        None => {
            current.insert(leaf.name().to_string(), value);
        }
        Some((&last, leading)) => {
            let member = current
                .get_mut(leaf.name())
                .ok_or_else(|| PathResolutionError::MissingKey {
                    at: walked.join("."),
                    key: leaf.name().to_string(),
                })?;
            let array = index_through(member, leading, &walked)?;
            let slot = element_mut(array, last, &walked)?;
            *slot = value;
        }
    }

    Ok(())
}

/// Read the value at `path`, if every segment resolves
#[must_use]
pub fn resolve<'a>(payload: &'a JsonObject, path: &QuestionPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = lookup(payload, first)?;
    for segment in rest {
        current = lookup(current.as_object()?, segment)?;
    }
    Some(current)
}

fn lookup<'a>(object: &'a JsonObject, segment: &PathSegment) -> Option<&'a Value> {
    let mut current = object.get(segment.name())?;
    for &index in segment.indices() {
        current = current.as_array()?.get(index)?;
    }
    Some(current)
}

/// Resolve a full segment (member plus every index) for further descent
fn descend<'a>(
    object: &'a mut JsonObject,
    segment: &PathSegment,
    walked: &[String],
) -> Result<&'a mut Value, PathResolutionError> {
    let member = object
        .get_mut(segment.name())
        .ok_or_else(|| PathResolutionError::MissingKey {
            at: walked.join("."),
            key: segment.name().to_string(),
        })?;

    match segment.indices().split_last() {
        None => Ok(member),
        Some((&last, leading)) => {
            let array = index_through(member, leading, walked)?;
            element_mut(array, last, walked)
        }
    }
}

/// Apply `indices` and return the array the final index will address
fn index_through<'a>(
    mut current: &'a mut Value,
    indices: &[usize],
    walked: &[String],
) -> Result<&'a mut Vec<Value>, PathResolutionError> {
    for &index in indices {
        let array = as_array_mut(current, walked)?;
        current = element_mut(array, index, walked)?;
    }
    as_array_mut(current, walked)
}

fn as_array_mut<'a>(
    value: &'a mut Value,
    walked: &[String],
) -> Result<&'a mut Vec<Value>, PathResolutionError> {
    let found = kind_of(value);
    value
        .as_array_mut()
        .ok_or_else(|| PathResolutionError::NotAnArray {
            at: walked.join("."),
            found,
        })
}

fn element_mut<'a>(
    array: &'a mut [Value],
    index: usize,
    walked: &[String],
) -> Result<&'a mut Value, PathResolutionError> {
    let len = array.len();
    array
        .get_mut(index)
        .ok_or_else(|| PathResolutionError::IndexOutOfRange {
            at: walked.join("."),
            index,
            len,
        })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Errors raised when a path does not fit the payload's shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathResolutionError {
    /// Path text could not be parsed
    #[error("invalid path: {0}")]
    Syntax(#[from] PathSyntaxError),

    /// Member missing from object
    #[error("no member '{key}' at '{at}'")]
    MissingKey { at: String, key: String },

    /// Index beyond array bounds
    #[error("index {index} out of range at '{at}' (length {len})")]
    IndexOutOfRange { at: String, index: usize, len: usize },

    /// Expected an object to continue descending
    #[error("expected object at '{at}', found {found}")]
    NotAnObject { at: String, found: &'static str },

    /// Expected an array for an indexed segment
    #[error("expected array at '{at}', found {found}")]
    NotAnArray { at: String, found: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture is not an object: {other}"),
        }
    }

    #[test]
    fn single_segment_writes_into_root() {
        let payload = resolve_and_set(JsonObject::new(), "mode", json!("auto")).unwrap();
        assert_eq!(Value::Object(payload), json!({"mode": "auto"}));
    }

    #[test]
    fn nested_write_through_objects() {
        let payload = object(json!({"cluster": {"network": {}}}));
        let payload = resolve_and_set(payload, "cluster.network.mtu", json!(9000)).unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({"cluster": {"network": {"mtu": 9000}}})
        );
    }

    #[test]
    fn write_through_array_element() {
        let payload = object(json!({"nodes": [{"cpu": 1}, {"cpu": 2}]}));
        let payload = resolve_and_set(payload, "nodes[1].cpu", json!(8)).unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({"nodes": [{"cpu": 1}, {"cpu": 8}]})
        );
    }

    #[test]
    fn write_replaces_array_element() {
        let payload = object(json!({"zones": ["a", "b"]}));
        let payload = resolve_and_set(payload, "zones[0]", json!("c")).unwrap();
        assert_eq!(Value::Object(payload), json!({"zones": ["c", "b"]}));
    }

    #[test]
    fn write_through_nested_indices() {
        let payload = object(json!({"grid": [[0, 0], [0, {"x": 1}]]}));
        let payload = resolve_and_set(payload, "grid[1][1].x", json!(5)).unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({"grid": [[0, 0], [0, {"x": 5}]]})
        );
    }

    #[test]
    fn missing_intermediate_key_fails() {
        let err = resolve_and_set(JsonObject::new(), "cluster.mode", json!(1)).unwrap_err();
        assert_eq!(
            err,
            PathResolutionError::MissingKey {
                at: "cluster".into(),
                key: "cluster".into()
            }
        );
    }

    #[test]
    fn index_out_of_range_fails() {
        let payload = object(json!({"nodes": [{"cpu": 1}]}));
        let err = resolve_and_set(payload, "nodes[3].cpu", json!(2)).unwrap_err();
        assert!(matches!(
            err,
            PathResolutionError::IndexOutOfRange { index: 3, len: 1, .. }
        ));
    }

    #[test]
    fn leaf_index_out_of_range_fails() {
        let payload = object(json!({"zones": []}));
        let err = resolve_and_set(payload, "zones[0]", json!("a")).unwrap_err();
        assert!(matches!(err, PathResolutionError::IndexOutOfRange { .. }));
    }

    #[test]
    fn scalar_parent_fails() {
        let payload = object(json!({"cluster": "kafka"}));
        let err = resolve_and_set(payload, "cluster.size", json!(3)).unwrap_err();
        assert_eq!(
            err,
            PathResolutionError::NotAnObject {
                at: "cluster".into(),
                found: "string"
            }
        );
    }

    #[test]
    fn index_on_object_fails() {
        let payload = object(json!({"nodes": {"cpu": 1}}));
        let err = resolve_and_set(payload, "nodes[0].cpu", json!(2)).unwrap_err();
        assert!(matches!(
            err,
            PathResolutionError::NotAnArray { found: "object", .. }
        ));
    }

    #[test]
    fn syntax_error_is_surfaced() {
        let err = resolve_and_set(JsonObject::new(), "a[x]", json!(1)).unwrap_err();
        assert!(matches!(err, PathResolutionError::Syntax(_)));
    }

    #[test]
    fn failed_set_in_place_leaves_payload_unchanged() {
        let original = object(json!({"nodes": [{"cpu": 1}], "mode": "auto"}));
        let mut working = original.clone();
        let path: QuestionPath = "nodes[0].disks[0]".parse().unwrap();
        assert!(set_in_place(&mut working, &path, json!(100)).is_err());
        assert_eq!(working, original);
    }

    #[test]
    fn resolve_reads_back() {
        let payload = object(json!({"nodes": [{"cpu": 4}]}));
        let path: QuestionPath = "nodes[0].cpu".parse().unwrap();
        assert_eq!(resolve(&payload, &path), Some(&json!(4)));

        let missing: QuestionPath = "nodes[1].cpu".parse().unwrap();
        assert_eq!(resolve(&payload, &missing), None);
    }
}
