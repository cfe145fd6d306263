use review_ingest::{LoadStats, PayloadReport};
use review_protocol::{format_date, FeedSnapshot, Record};
use std::fmt::Write;

pub fn record(out: &mut String, record: &Record) {
    let _ = writeln!(out, "{}", record.title);
    if !record.authors.is_empty() {
        let _ = writeln!(out, "  {}", record.authors);
    }
    let topic = record.topic().unwrap_or("-");
    let _ = writeln!(out, "  {topic} | {}", format_date(&record.date));
    if !record.url.is_empty() {
        let _ = writeln!(out, "  {}", record.url);
    }
}

pub fn feed(snapshot: &FeedSnapshot) -> String {
    let mut out = String::new();
    if let Some(topic) = snapshot.selector.as_topic() {
        let _ = writeln!(
            out,
            "{} Cochrane Reviews matching {topic} in Cochrane Topic\n",
            snapshot.matching_count
        );
    }

    if snapshot.visible.is_empty() {
        match snapshot.selector.as_topic() {
            Some(topic) => out.push_str(&format!("No reviews found for topic: {topic}.")),
            None => out.push_str("No reviews found."),
        }
        return out;
    }

    for item in &snapshot.visible {
        record(&mut out, item);
        out.push('\n');
    }
    out.push_str(if snapshot.has_more {
        "Loading more..."
    } else {
        "No more reviews to load."
    });
    out
}

pub fn inspection(location: &str, report: Option<&PayloadReport>, stats: &LoadStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "source: {location}");
    match report {
        Some(report) => {
            let _ = writeln!(out, "shape: {:?} ({})", report.shape, report.value_type);
            let _ = writeln!(out, "outer length: {}", report.outer_len);
            if !report.segment_lengths.is_empty() {
                let _ = writeln!(out, "first segments: {:?}", report.segment_lengths);
            }
            if report.skipped_outer > 0 {
                let _ = writeln!(out, "skipped outer elements: {}", report.skipped_outer);
            }
            let _ = writeln!(out, "entries: {}", report.total_entries);
            let _ = writeln!(out, "topic key: {}", report.topic_key.unwrap_or("(none)"));
        }
        None => {
            let _ = writeln!(out, "document unavailable");
        }
    }
    let _ = writeln!(out, "origin: {:?}", stats.origin);
    let _ = writeln!(out, "records: {} ({} topics)", stats.records, stats.topics);
    for error in &stats.errors {
        let _ = writeln!(out, "recovered: {error}");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_protocol::TopicSelector;

    fn snapshot(visible: Vec<Record>, selector: TopicSelector, has_more: bool) -> FeedSnapshot {
        FeedSnapshot {
            matching_count: visible.len(),
            visible_count: visible.len(),
            visible,
            selector,
            has_more,
            ..FeedSnapshot::default()
        }
    }

    #[test]
    fn empty_filtered_feed_names_the_topic() {
        let text = feed(&snapshot(vec![], TopicSelector::topic("Neurology"), false));
        assert!(text.contains("0 Cochrane Reviews matching Neurology"));
        assert!(text.ends_with("No reviews found for topic: Neurology."));
    }

    #[test]
    fn record_lines_use_display_date() {
        let item = Record {
            url: "http://example.org/r".to_string(),
            title: "Cancer therapy outcomes".to_string(),
            authors: "Thomas Anderson".to_string(),
            topic: Some("Oncology".to_string()),
            date: "2021-02-02".to_string(),
        };
        let text = feed(&snapshot(vec![item], TopicSelector::All, true));
        assert!(text.starts_with("Cancer therapy outcomes\n"));
        assert!(text.contains("  Oncology | February 2, 2021\n"));
        assert!(text.ends_with("Loading more..."));
    }
}
