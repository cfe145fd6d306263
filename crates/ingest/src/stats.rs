use serde::{Deserialize, Serialize};

/// Which data ended up in the canonical record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Primary,
    Fallback,
    Empty,
}

/// Statistics about a load operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadStats {
    /// Canonical records produced
    pub records: usize,

    /// Distinct topics among them
    pub topics: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    pub origin: RecordOrigin,

    /// Failures recovered from along the way
    pub errors: Vec<String>,
}

impl LoadStats {
    pub fn new() -> Self {
        Self {
            records: 0,
            topics: 0,
            time_ms: 0,
            origin: RecordOrigin::Empty,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

impl Default for LoadStats {
    fn default() -> Self {
        Self::new()
    }
}
