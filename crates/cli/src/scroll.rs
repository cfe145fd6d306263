use anyhow::Result;
use review_feed::{FeedHandle, FeedSnapshot, ProximitySignal, Sentinel, Viewport};

const ROW_HEIGHT: f64 = 120.0;
const VIEWPORT_HEIGHT: f64 = 800.0;
const SENTINEL_HEIGHT: f64 = 24.0;

/// Scroll a virtual list to its end `pages - 1` times, letting the proximity
/// signal drive each advance.
pub async fn reveal_pages(
    feed: &FeedHandle,
    signal: &mut ProximitySignal,
    pages: usize,
) -> Result<FeedSnapshot> {
    signal.attach();
    let mut snapshot = feed.snapshot();

    for _ in 1..pages.max(1) {
        if !snapshot.has_more {
            break;
        }
        let sentinel = Sentinel {
            top: snapshot.visible_count as f64 * ROW_HEIGHT,
            height: SENTINEL_HEIGHT,
        };
        let viewport = Viewport {
            top: (sentinel.top + SENTINEL_HEIGHT - VIEWPORT_HEIGHT).max(0.0),
            height: VIEWPORT_HEIGHT,
        };
        if signal.observe(viewport, sentinel).is_none() {
            break;
        }
        if feed.request_advance().await? {
            snapshot = feed.settled().await?;
        }
        // The sentinel moved below the new rows.
        signal.attach();
    }

    signal.detach();
    Ok(snapshot)
}
