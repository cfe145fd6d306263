use serde::Serialize;
use serde_json::{Map, Value};

/// The two accepted wire encodings of a record list, plus everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadShape {
    /// `[record, record, ...]`
    Flat(Vec<Value>),
    /// `[[record, ...], [record, ...], ...]`; outer elements that were not
    /// sequences have already been dropped.
    Nested(Vec<Vec<Value>>),
    Anomalous(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Flat,
    Nested,
    Anomalous,
}

impl PayloadShape {
    /// Single classification step: nesting is decided by the first element only.
    #[must_use]
    pub fn classify(raw: Value) -> Self {
        match raw {
            Value::Array(items) => {
                if matches!(items.first(), Some(Value::Array(_))) {
                    let segments = items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Array(inner) => Some(inner),
                            _ => None,
                        })
                        .collect();
                    Self::Nested(segments)
                } else {
                    Self::Flat(items)
                }
            }
            other => Self::Anomalous(other),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Flat(_) => ShapeKind::Flat,
            Self::Nested(_) => ShapeKind::Nested,
            Self::Anomalous(_) => ShapeKind::Anomalous,
        }
    }

    /// First mapping element in payload order, used for batch-wide key resolution.
    #[must_use]
    pub fn first_record_like(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Flat(items) => items.iter().find_map(Value::as_object),
            Self::Nested(segments) => segments.iter().flatten().find_map(Value::as_object),
            Self::Anomalous(value) => value.as_object(),
        }
    }
}

/// Borrowing variant of [`PayloadShape::classify`] for diagnostics.
#[must_use]
pub fn classify_ref(raw: &Value) -> ShapeKind {
    match raw {
        Value::Array(items) if matches!(items.first(), Some(Value::Array(_))) => ShapeKind::Nested,
        Value::Array(_) => ShapeKind::Flat,
        _ => ShapeKind::Anomalous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_array_is_flat() {
        assert_eq!(PayloadShape::classify(json!([])), PayloadShape::Flat(vec![]));
    }

    #[test]
    fn first_element_decides_nesting() {
        let shape =
            PayloadShape::classify(json!([[{"title": "a"}], {"title": "b"}, [{"title": "c"}]]));
        match shape {
            PayloadShape::Nested(segments) => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[1][0]["title"], "c");
            }
            other => panic!("expected nested, got {other:?}"),
        }

        let shape = PayloadShape::classify(json!([{"title": "a"}, [{"title": "b"}]]));
        assert_eq!(shape.kind(), ShapeKind::Flat);
    }

    #[test]
    fn empty_first_segment_is_still_nested() {
        let raw = json!([[], [{"title": "a"}]]);
        assert_eq!(classify_ref(&raw), ShapeKind::Nested);
        let shape = PayloadShape::classify(raw);
        assert_eq!(
            shape.first_record_like().and_then(|m| m.get("title")),
            Some(&json!("a"))
        );
    }

    #[test]
    fn non_sequences_are_anomalous() {
        assert_eq!(classify_ref(&json!({"title": "a"})), ShapeKind::Anomalous);
        assert_eq!(PayloadShape::classify(json!(null)).kind(), ShapeKind::Anomalous);
        assert_eq!(PayloadShape::classify(json!("text")).kind(), ShapeKind::Anomalous);
    }
}
