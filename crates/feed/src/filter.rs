use review_protocol::{Record, TopicSelector};

/// Records matching `selector`, in original order. `All` is the identity.
#[must_use]
pub fn filter<'a>(records: &'a [Record], selector: &TopicSelector) -> Vec<&'a Record> {
    records.iter().filter(|r| selector.matches(r)).collect()
}

/// Positions of the matching records; the view the window keeps instead of copies.
#[must_use]
pub fn matching_indices(records: &[Record], selector: &TopicSelector) -> Vec<usize> {
    match selector {
        TopicSelector::All => (0..records.len()).collect(),
        TopicSelector::Topic(_) => records
            .iter()
            .enumerate()
            .filter(|(_, r)| selector.matches(r))
            .map(|(idx, _)| idx)
            .collect(),
    }
}

#[must_use]
pub fn matching_count(records: &[Record], selector: &TopicSelector) -> usize {
    match selector {
        TopicSelector::All => records.len(),
        TopicSelector::Topic(_) => records.iter().filter(|r| selector.matches(r)).count(),
    }
}
