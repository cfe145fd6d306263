use crate::shape::PayloadShape;
use log::{debug, warn};
use review_protocol::Record;
use serde_json::{Map, Value};

const URL_KEYS: &[&str] = &["url", "URL", "Url"];
const TITLE_KEYS: &[&str] = &["title", "Title"];
const AUTHORS_KEYS: &[&str] = &["authors", "Authors", "author", "Author"];
pub(crate) const TOPIC_KEYS: &[&str] = &["topic", "Topic"];
const DATE_KEYS: &[&str] = &["date", "Date"];

/// What to do with a payload that is not a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnomalyPolicy {
    /// Yield no records.
    #[default]
    Empty,
    /// Hand the value through; a single mapping becomes one record.
    Passthrough,
}

/// Source spellings of the canonical fields, resolved once per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldKeys {
    pub url: Option<&'static str>,
    pub title: Option<&'static str>,
    pub authors: Option<&'static str>,
    pub topic: Option<&'static str>,
    pub date: Option<&'static str>,
}

impl FieldKeys {
    #[must_use]
    pub fn resolve(sample: Option<&Map<String, Value>>) -> Self {
        let Some(sample) = sample else {
            return Self::default();
        };
        Self {
            url: pick(sample, URL_KEYS),
            title: pick(sample, TITLE_KEYS),
            authors: pick(sample, AUTHORS_KEYS),
            topic: pick(sample, TOPIC_KEYS),
            date: pick(sample, DATE_KEYS),
        }
    }

    fn record(&self, item: &Map<String, Value>) -> Record {
        let field = |key: Option<&'static str>| key.and_then(|k| item.get(k)).and_then(scalar_text);
        Record {
            url: field(self.url).unwrap_or_default(),
            title: field(self.title).unwrap_or_default(),
            authors: field(self.authors).unwrap_or_default(),
            topic: field(self.topic),
            date: field(self.date).unwrap_or_default(),
        }
    }
}

pub(crate) fn pick(
    sample: &Map<String, Value>,
    candidates: &[&'static str],
) -> Option<&'static str> {
    candidates
        .iter()
        .copied()
        .find(|key| sample.contains_key(*key))
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Classify and normalize a parsed payload. Never fails.
#[must_use]
pub fn normalize(raw: Value, policy: AnomalyPolicy) -> Vec<Record> {
    normalize_shape(PayloadShape::classify(raw), policy)
}

#[must_use]
pub fn normalize_shape(shape: PayloadShape, policy: AnomalyPolicy) -> Vec<Record> {
    let keys = FieldKeys::resolve(shape.first_record_like());
    if keys.topic.is_none() && shape.first_record_like().is_some() {
        warn!("No topic key found in payload; topics will be absent");
    }

    match shape {
        PayloadShape::Flat(items) => records_from(&keys, items.iter()),
        PayloadShape::Nested(segments) => {
            debug!("Flattening {} nested segments", segments.len());
            records_from(&keys, segments.iter().flatten())
        }
        PayloadShape::Anomalous(value) => match (policy, value.as_object()) {
            (AnomalyPolicy::Passthrough, Some(item)) => vec![keys.record(item)],
            _ => {
                warn!("Payload is not a sequence; yielding no records");
                Vec::new()
            }
        },
    }
}

fn records_from<'a>(keys: &FieldKeys, items: impl Iterator<Item = &'a Value>) -> Vec<Record> {
    let mut skipped = 0usize;
    let records: Vec<Record> = items
        .filter_map(|item| match item.as_object() {
            Some(map) => Some(keys.record(map)),
            None => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        debug!("Skipped {skipped} elements that were not records");
    }
    records
}
