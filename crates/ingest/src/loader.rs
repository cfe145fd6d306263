use crate::{
    extract_topics, inspect_payload, normalize, AnomalyPolicy, DocumentSource, Fallback,
    LoadStats, PayloadReport, RecordOrigin, Result,
};
use log::{debug, error, info, warn};
use review_protocol::Record;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Result of a load. Always usable, possibly empty.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: Arc<[Record]>,
    pub topics: Vec<String>,
    /// Present when the primary document parsed.
    pub report: Option<PayloadReport>,
    pub stats: LoadStats,
}

/// Loads the review document, degrading to fallback data and finally to an
/// empty set instead of failing.
pub struct ReviewLoader {
    source: Box<dyn DocumentSource>,
    fallback: Fallback,
    policy: AnomalyPolicy,
}

impl ReviewLoader {
    pub fn new(source: Box<dyn DocumentSource>) -> Self {
        Self {
            source,
            fallback: Fallback::Builtin,
            policy: AnomalyPolicy::Passthrough,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AnomalyPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn location(&self) -> &str {
        self.source.location()
    }

    pub async fn load(&self) -> LoadOutcome {
        let start = Instant::now();
        let mut stats = LoadStats::new();

        let (records, report) = match self.load_primary().await {
            Ok((records, report)) => {
                stats.origin = RecordOrigin::Primary;
                (records, Some(report))
            }
            Err(err) => {
                warn!(
                    "Failed to load reviews from {} ({}): {err}",
                    self.location(),
                    err.kind().as_str()
                );
                stats.add_error(err.to_string());
                match self.load_fallback().await {
                    Ok(records) => {
                        stats.origin = RecordOrigin::Fallback;
                        (records, None)
                    }
                    Err(err) => {
                        error!("Failed to load fallback data ({}): {err}", err.kind().as_str());
                        stats.add_error(err.to_string());
                        stats.origin = RecordOrigin::Empty;
                        (Vec::new(), None)
                    }
                }
            }
        };

        let topics = extract_topics(&records);
        stats.records = records.len();
        stats.topics = topics.len();
        stats.time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Loaded {} reviews ({} topics) from {:?} in {} ms",
            stats.records, stats.topics, stats.origin, stats.time_ms
        );

        LoadOutcome {
            records: records.into(),
            topics,
            report,
            stats,
        }
    }

    async fn load_primary(&self) -> Result<(Vec<Record>, PayloadReport)> {
        let bytes = self.source.fetch().await?;
        debug!("Raw data size: {} bytes", bytes.len());
        let value: Value = serde_json::from_slice(&bytes)?;

        let report = inspect_payload(&value);
        debug!("Payload structure: {report:?}");

        Ok((normalize(value, self.policy), report))
    }

    async fn load_fallback(&self) -> Result<Vec<Record>> {
        info!("Falling back to {} data", self.fallback);
        let value = self.fallback.payload().await?;
        Ok(normalize(value, self.policy))
    }
}
