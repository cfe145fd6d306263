use crate::normalizer::{pick, scalar_text, TOPIC_KEYS};
use log::{debug, error};
use review_protocol::Record;
use serde_json::Value;
use std::collections::HashSet;

/// Distinct topics in first-seen order. Records without a topic are skipped.
#[must_use]
pub fn extract_topics(records: &[Record]) -> Vec<String> {
    let topics = unique_in_order(records.iter().filter_map(Record::topic));
    debug!("Extracted {} topics from {} records", topics.len(), records.len());
    topics
}

/// Distinct topics straight from un-normalized elements.
///
/// The topic key is detected on the first element (`topic` before `Topic`)
/// and applied to all of them. Empty when the input is empty or the first
/// element carries neither spelling.
#[must_use]
pub fn extract_raw_topics(items: &[Value]) -> Vec<String> {
    let Some(first) = items.first() else {
        return Vec::new();
    };
    let Some(key) = first.as_object().and_then(|sample| pick(sample, TOPIC_KEYS)) else {
        error!("No topic key found");
        return Vec::new();
    };

    let values: Vec<String> = items
        .iter()
        .filter_map(|item| item.get(key).and_then(scalar_text))
        .collect();
    let topics = unique_in_order(values.iter().map(String::as_str));
    debug!("Extracted {} topics using key {key:?}", topics.len());
    topics
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
