use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod date;

pub use date::format_date;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// A canonical bibliographic review entry.
///
/// Field names are fixed and lower-case regardless of how the source payload
/// spelled them. `topic` is absent when the batch carried no recognizable topic
/// field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default, JsonSchema)]
pub struct Record {
    pub url: String,
    pub title: String,
    /// Free-form, possibly several comma-separated names.
    pub authors: String,
    pub topic: Option<String>,
    /// Source representation; not guaranteed to be a calendar date.
    pub date: String,
}

impl Record {
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Individual author names, split on commas.
    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// At most one active topic; `All` means no filter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum TopicSelector {
    #[default]
    All,
    Topic(String),
}

impl TopicSelector {
    pub fn topic(topic: impl Into<String>) -> Self {
        Self::Topic(topic.into())
    }

    /// Exact, case-sensitive topic equality. `All` matches every record.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Topic(topic) => record.topic() == Some(topic.as_str()),
        }
    }

    #[must_use]
    pub fn as_topic(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Topic(topic) => Some(topic),
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Option<String>> for TopicSelector {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::All, Self::Topic)
    }
}

impl From<TopicSelector> for Option<String> {
    fn from(value: TopicSelector) -> Self {
        match value {
            TopicSelector::All => None,
            TopicSelector::Topic(topic) => Some(topic),
        }
    }
}

/// Everything the presentation layer reads from the feed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default, JsonSchema)]
pub struct FeedSnapshot {
    pub schema_version: u32,
    pub total_records: usize,
    /// Records matching the active selector ("N results" readout).
    pub matching_count: usize,
    pub visible_count: usize,
    #[schemars(with = "Option<String>")]
    pub selector: TopicSelector,
    pub topics: Vec<String>,
    pub visible: Vec<Record>,
    /// True while the visible window is shorter than the matching set.
    pub has_more: bool,
    /// True while an advance is settling.
    pub advancing: bool,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(topic: Option<&str>) -> Record {
        Record {
            title: "t".to_string(),
            topic: topic.map(str::to_string),
            ..Record::default()
        }
    }

    #[test]
    fn selector_all_matches_everything() {
        assert!(TopicSelector::All.matches(&record(None)));
        assert!(TopicSelector::All.matches(&record(Some("Oncology"))));
    }

    #[test]
    fn selector_topic_is_case_sensitive() {
        let selector = TopicSelector::topic("Oncology");
        assert!(selector.matches(&record(Some("Oncology"))));
        assert!(!selector.matches(&record(Some("oncology"))));
        assert!(!selector.matches(&record(None)));
    }

    #[test]
    fn selector_serializes_as_optional_string() {
        assert_eq!(serialize_json(&TopicSelector::All).unwrap(), "null");
        assert_eq!(
            serialize_json(&TopicSelector::topic("Neurology")).unwrap(),
            "\"Neurology\""
        );
        let parsed: TopicSelector = serde_json::from_str("\"Neurology\"").unwrap();
        assert_eq!(parsed, TopicSelector::topic("Neurology"));
    }

    #[test]
    fn author_names_split_on_commas() {
        let record = Record {
            authors: "Heather E Elphick, Kevin W Southern,".to_string(),
            ..Record::default()
        };
        let names: Vec<&str> = record.author_names().collect();
        assert_eq!(names, vec!["Heather E Elphick", "Kevin W Southern"]);
    }
}
