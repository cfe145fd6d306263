use crate::filter::matching_indices;
use log::debug;
use review_protocol::{FeedSnapshot, Record, TopicSelector, SNAPSHOT_SCHEMA_VERSION};
use std::sync::Arc;

/// Identifies one accepted advance. Completing a ticket that is no longer
/// pending (the filter changed meanwhile) has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    seq: u64,
}

impl AdvanceTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Grew { added: usize, visible_count: usize },
    /// The window already covered every matching record.
    Exhausted,
    /// Issued under a filter that has since been replaced.
    Stale,
}

/// Monotonically growing prefix over the filtered record set.
///
/// Idle until [`request_advance`](Self::request_advance) hands out a ticket,
/// Advancing until that ticket is completed or a filter change supersedes it.
#[derive(Debug, Clone)]
pub struct FeedWindow {
    records: Arc<[Record]>,
    page_size: usize,
    selector: TopicSelector,
    matching: Vec<usize>,
    visible_count: usize,
    generation: u64,
    next_seq: u64,
    pending: Option<AdvanceTicket>,
}

impl FeedWindow {
    pub fn new(records: Arc<[Record]>, page_size: usize) -> Self {
        let mut window = Self {
            records,
            page_size: page_size.max(1),
            selector: TopicSelector::All,
            matching: Vec::new(),
            visible_count: 0,
            generation: 0,
            next_seq: 0,
            pending: None,
        };
        window.reset();
        window
    }

    /// Switch the active topic; the window restarts at one page.
    pub fn change_filter(&mut self, selector: TopicSelector) {
        if self.pending.take().is_some() {
            debug!("Filter change supersedes a pending advance");
        }
        self.generation += 1;
        self.selector = selector;
        self.reset();
    }

    pub fn clear_filter(&mut self) {
        self.change_filter(TopicSelector::All);
    }

    /// Accept an advance unless one is already in flight.
    pub fn request_advance(&mut self) -> Option<AdvanceTicket> {
        if self.pending.is_some() {
            return None;
        }
        let ticket = AdvanceTicket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Apply a settled advance: reveal the next page of matching records.
    pub fn complete_advance(&mut self, ticket: AdvanceTicket) -> AdvanceOutcome {
        if self.pending != Some(ticket) {
            return AdvanceOutcome::Stale;
        }
        self.pending = None;

        let total = self.matching.len();
        if self.visible_count >= total {
            return AdvanceOutcome::Exhausted;
        }
        let next = (self.visible_count + self.page_size).min(total);
        let added = next - self.visible_count;
        self.visible_count = next;
        AdvanceOutcome::Grew {
            added,
            visible_count: next,
        }
    }

    fn reset(&mut self) {
        self.matching = matching_indices(&self.records, &self.selector);
        self.visible_count = self.page_size.min(self.matching.len());
    }

    pub fn visible(&self) -> impl Iterator<Item = &Record> + '_ {
        self.matching[..self.visible_count]
            .iter()
            .map(|&idx| &self.records[idx])
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    #[must_use]
    pub fn matching_count(&self) -> usize {
        self.matching.len()
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn selector(&self) -> &TopicSelector {
        &self.selector
    }

    #[must_use]
    pub fn is_advancing(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.visible_count < self.matching.len()
    }

    #[must_use]
    pub fn snapshot(&self, topics: &[String]) -> FeedSnapshot {
        FeedSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            total_records: self.total_records(),
            matching_count: self.matching_count(),
            visible_count: self.visible_count,
            selector: self.selector.clone(),
            topics: topics.to_vec(),
            visible: self.visible().cloned().collect(),
            has_more: self.has_more(),
            advancing: self.is_advancing(),
        }
    }
}
