use crate::window::{AdvanceOutcome, AdvanceTicket, FeedWindow};
use crate::{FeedError, Result};
use log::{debug, info};
use review_protocol::{FeedSnapshot, TopicSelector};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time;

enum FeedCommand {
    ChangeFilter {
        selector: TopicSelector,
        reply: oneshot::Sender<FeedSnapshot>,
    },
    RequestAdvance {
        reply: oneshot::Sender<bool>,
    },
    Settled(AdvanceTicket),
    Shutdown,
}

/// Presentation-facing handle to a running feed.
///
/// All commands are serialized through a single task that owns the window,
/// so a filter change and a settling advance never interleave.
#[derive(Clone)]
pub struct FeedHandle {
    inner: Arc<FeedHandleInner>,
}

struct FeedHandleInner {
    command_tx: mpsc::Sender<FeedCommand>,
    snapshot_tx: watch::Sender<FeedSnapshot>,
}

impl FeedHandle {
    /// Spawn the feed task. Must be called within a tokio runtime.
    pub fn spawn(window: FeedWindow, topics: Vec<String>, settle_delay: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (snapshot_tx, _) = watch::channel(window.snapshot(&topics));

        spawn_feed_loop(
            window,
            topics,
            settle_delay,
            command_tx.clone(),
            command_rx,
            snapshot_tx.clone(),
        );

        Self {
            inner: Arc::new(FeedHandleInner {
                command_tx,
                snapshot_tx,
            }),
        }
    }

    pub async fn change_filter(&self, selector: TopicSelector) -> Result<FeedSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(FeedCommand::ChangeFilter { selector, reply }).await?;
        rx.await.map_err(|_| FeedError::Closed)
    }

    pub async fn clear_filter(&self) -> Result<FeedSnapshot> {
        self.change_filter(TopicSelector::All).await
    }

    /// Returns whether the advance was accepted; `false` while another one settles.
    pub async fn request_advance(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(FeedCommand::RequestAdvance { reply }).await?;
        rx.await.map_err(|_| FeedError::Closed)
    }

    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Wait until no advance is settling and return the resulting snapshot.
    pub async fn settled(&self) -> Result<FeedSnapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(|snapshot| !snapshot.advancing)
            .await
            .map_err(|_| FeedError::Closed)?;
        Ok(snapshot.clone())
    }

    pub async fn shutdown(&self) {
        let _ = self.inner.command_tx.send(FeedCommand::Shutdown).await;
    }

    async fn send(&self, command: FeedCommand) -> Result<()> {
        self.inner
            .command_tx
            .send(command)
            .await
            .map_err(|_| FeedError::Closed)
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(FeedCommand::Shutdown);
        }
    }
}

fn spawn_feed_loop(
    mut window: FeedWindow,
    topics: Vec<String>,
    settle_delay: Duration,
    command_tx: mpsc::Sender<FeedCommand>,
    mut command_rx: mpsc::Receiver<FeedCommand>,
    snapshot_tx: watch::Sender<FeedSnapshot>,
) {
    // The loop only keeps a weak sender for settle callbacks, so dropping every
    // handle still closes the channel.
    let settle_tx = command_tx.downgrade();
    drop(command_tx);

    tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            match command {
                FeedCommand::ChangeFilter { selector, reply } => {
                    debug!("Changing filter to {:?}", selector.as_topic());
                    window.change_filter(selector);
                    let snapshot = window.snapshot(&topics);
                    snapshot_tx.send_replace(snapshot.clone());
                    let _ = reply.send(snapshot);
                }
                FeedCommand::RequestAdvance { reply } => {
                    let Some(ticket) = window.request_advance() else {
                        debug!("Advance already in flight; ignoring trigger");
                        let _ = reply.send(false);
                        continue;
                    };
                    snapshot_tx.send_replace(window.snapshot(&topics));
                    let _ = reply.send(true);

                    if let Some(tx) = settle_tx.upgrade() {
                        tokio::spawn(async move {
                            time::sleep(settle_delay).await;
                            let _ = tx.send(FeedCommand::Settled(ticket)).await;
                        });
                    }
                }
                FeedCommand::Settled(ticket) => match window.complete_advance(ticket) {
                    AdvanceOutcome::Grew {
                        added,
                        visible_count,
                    } => {
                        debug!("Revealed {added} more records ({visible_count} visible)");
                        snapshot_tx.send_replace(window.snapshot(&topics));
                    }
                    AdvanceOutcome::Exhausted => {
                        debug!("No more records to reveal");
                        snapshot_tx.send_replace(window.snapshot(&topics));
                    }
                    AdvanceOutcome::Stale => {
                        debug!("Discarding advance issued under a replaced filter");
                    }
                },
                FeedCommand::Shutdown => break,
            }
        }
        info!("Feed task stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use review_protocol::Record;

    const SETTLE: Duration = Duration::from_millis(300);

    fn handle(topics: &[&str], page_size: usize) -> FeedHandle {
        let records: Arc<[Record]> = topics
            .iter()
            .enumerate()
            .map(|(idx, topic)| Record {
                title: format!("r{idx}"),
                topic: Some(topic.to_string()),
                ..Record::default()
            })
            .collect::<Vec<_>>()
            .into();
        let window = FeedWindow::new(records, page_size);
        FeedHandle::spawn(window, vec![], SETTLE)
    }

    #[tokio::test(start_paused = true)]
    async fn advance_applies_after_settling_delay() {
        let feed = handle(&["Oncology"; 12], 10);
        assert_eq!(feed.snapshot().visible_count, 10);

        assert!(feed.request_advance().await.unwrap());
        assert!(feed.snapshot().advancing);

        time::sleep(SETTLE / 2).await;
        assert_eq!(feed.snapshot().visible_count, 10);

        let snapshot = feed.settled().await.unwrap();
        assert_eq!(snapshot.visible_count, 12);
        assert!(!snapshot.has_more);

        assert!(feed.request_advance().await.unwrap());
        assert_eq!(feed.settled().await.unwrap().visible_count, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_triggers_coalesce_into_one_advance() {
        let feed = handle(&["A"; 40], 10);
        assert!(feed.request_advance().await.unwrap());
        assert!(!feed.request_advance().await.unwrap());
        assert!(!feed.request_advance().await.unwrap());

        assert_eq!(feed.settled().await.unwrap().visible_count, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_change_discards_in_flight_advance() {
        let feed = handle(&["A", "B", "A", "B", "A", "B", "A", "B"], 2);
        assert!(feed.request_advance().await.unwrap());

        let snapshot = feed.change_filter(TopicSelector::topic("B")).await.unwrap();
        assert_eq!(snapshot.visible_count, 2);
        assert_eq!(snapshot.matching_count, 4);
        assert!(!snapshot.advancing);

        time::sleep(SETTLE * 2).await;
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.visible_count, 2);
        let titles: Vec<&str> = snapshot.visible.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["r1", "r3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_filter_restores_full_set() {
        let feed = handle(&["A", "B", "A"], 1);
        feed.change_filter(TopicSelector::topic("B")).await.unwrap();
        let snapshot = feed.clear_filter().await.unwrap();
        assert_eq!(snapshot.selector, TopicSelector::All);
        assert_eq!(snapshot.matching_count, 3);
        assert_eq!(snapshot.visible_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn commands_fail_after_shutdown() {
        let feed = handle(&["A"], 1);
        feed.shutdown().await;
        time::sleep(Duration::from_millis(1)).await;
        assert!(matches!(feed.request_advance().await, Err(FeedError::Closed)));
    }
}
