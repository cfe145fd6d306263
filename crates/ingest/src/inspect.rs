use crate::normalizer::{pick, TOPIC_KEYS};
use crate::shape::{classify_ref, ShapeKind};
use serde::Serialize;
use serde_json::Value;

/// Segments described individually in a report; the rest only count toward totals.
const SAMPLED_SEGMENTS: usize = 3;

/// Structural summary of a parsed payload, for operator diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadReport {
    pub shape: ShapeKind,
    /// JSON type of the top-level value.
    pub value_type: &'static str,
    pub outer_len: usize,
    /// Lengths of the first nested segments.
    pub segment_lengths: Vec<usize>,
    /// Outer elements dropped because they were not sequences.
    pub skipped_outer: usize,
    pub total_entries: usize,
    pub topic_key: Option<&'static str>,
}

#[must_use]
pub fn inspect_payload(raw: &Value) -> PayloadReport {
    let shape = classify_ref(raw);
    let items: &[Value] = raw.as_array().map(Vec::as_slice).unwrap_or_default();

    let mut report = PayloadReport {
        shape,
        value_type: value_type(raw),
        outer_len: items.len(),
        segment_lengths: Vec::new(),
        skipped_outer: 0,
        total_entries: 0,
        topic_key: None,
    };

    let first_record = match shape {
        ShapeKind::Nested => {
            for item in items {
                match item.as_array() {
                    Some(segment) => {
                        if report.segment_lengths.len() < SAMPLED_SEGMENTS {
                            report.segment_lengths.push(segment.len());
                        }
                        report.total_entries += segment.len();
                    }
                    None => report.skipped_outer += 1,
                }
            }
            items
                .iter()
                .filter_map(Value::as_array)
                .flatten()
                .find_map(Value::as_object)
        }
        ShapeKind::Flat => {
            report.total_entries = items.len();
            items.iter().find_map(Value::as_object)
        }
        ShapeKind::Anomalous => raw.as_object(),
    };
    report.topic_key = first_record.and_then(|sample| pick(sample, TOPIC_KEYS));
    report
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
