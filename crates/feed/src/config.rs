use crate::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;
pub const DEFAULT_SOURCE: &str = "cochrane_reviews.json";

const ENV_PAGE_SIZE: &str = "REVIEWS_PAGE_SIZE";
const ENV_SETTLE_DELAY_MS: &str = "REVIEWS_SETTLE_DELAY_MS";
const ENV_SOURCE: &str = "REVIEWS_SOURCE";
const ENV_FALLBACK: &str = "REVIEWS_FALLBACK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub page_size: usize,
    pub settle_delay_ms: u64,
    pub proximity_margin_px: f64,
    /// Visible fraction of the sentinel that counts as near, in `[0, 1]`.
    pub proximity_threshold: f64,
    /// Filesystem path or `http(s)://` URL of the review document.
    pub source: String,
    /// `builtin`, `none`, or a path to a fallback document.
    pub fallback: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            proximity_margin_px: 20.0,
            proximity_threshold: 0.1,
            source: DEFAULT_SOURCE.to_string(),
            fallback: "builtin".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Overlay `REVIEWS_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = parse_env(ENV_PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SETTLE_DELAY_MS) {
            self.settle_delay_ms = parse_env(ENV_SETTLE_DELAY_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SOURCE).filter(|v| !v.trim().is_empty()) {
            self.source = raw;
        }
        if let Some(raw) = lookup(ENV_FALLBACK).filter(|v| !v.trim().is_empty()) {
            self.fallback = raw;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FeedError::InvalidConfig(
                "page_size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.proximity_threshold) {
            return Err(FeedError::InvalidConfig(format!(
                "proximity_threshold {} is outside [0, 1]",
                self.proximity_threshold
            )));
        }
        if !self.proximity_margin_px.is_finite() || self.proximity_margin_px < 0.0 {
            return Err(FeedError::InvalidConfig(format!(
                "proximity_margin_px {} must be a non-negative number",
                self.proximity_margin_px
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| FeedError::InvalidConfig(format!("{key}={raw:?} is not a valid number")))
}
