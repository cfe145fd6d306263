//! # Review Feed
//!
//! Topic filtering and incremental reveal over a loaded record set.
//!
//! ```text
//! canonical records ──> filter(selector) ──> FeedWindow (visible prefix)
//!                                                 ▲
//!        ProximitySignal ── AdvanceTrigger ──> FeedHandle::request_advance
//!                                                 │ settling delay
//!                                                 └─> FeedSnapshot (watch)
//! ```

mod config;
mod driver;
mod error;
mod filter;
mod proximity;
mod suggest;
mod window;

pub use config::{FeedConfig, DEFAULT_PAGE_SIZE, DEFAULT_SETTLE_DELAY_MS, DEFAULT_SOURCE};
pub use driver::FeedHandle;
pub use error::{FeedError, Result};
pub use filter::{filter, matching_count, matching_indices};
pub use proximity::{AdvanceTrigger, ProximitySignal, Sentinel, Viewport};
pub use suggest::TopicSuggester;
pub use window::{AdvanceOutcome, AdvanceTicket, FeedWindow};

pub use review_protocol::{FeedSnapshot, Record, TopicSelector};
