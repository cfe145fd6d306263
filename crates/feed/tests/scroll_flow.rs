use review_feed::{
    FeedHandle, FeedWindow, ProximitySignal, Record, Sentinel, TopicSelector, Viewport,
};
use std::sync::Arc;
use std::time::Duration;

const ROW_HEIGHT: f64 = 100.0;

fn records(count: usize, topic: &str) -> Arc<[Record]> {
    (0..count)
        .map(|idx| Record {
            title: format!("review {idx}"),
            topic: Some(topic.to_string()),
            ..Record::default()
        })
        .collect::<Vec<_>>()
        .into()
}

fn sentinel_after(visible: usize) -> Sentinel {
    Sentinel {
        top: visible as f64 * ROW_HEIGHT,
        height: 20.0,
    }
}

#[tokio::test(start_paused = true)]
async fn scrolling_to_the_bottom_reveals_everything_once() {
    let feed = FeedHandle::spawn(
        FeedWindow::new(records(23, "Oncology"), 10),
        vec!["Oncology".to_string()],
        Duration::from_millis(300),
    );
    let mut signal = ProximitySignal::new(20.0, 0.1);
    signal.attach();

    let mut scroll_top = 0.0;
    let mut accepted = 0;
    for _ in 0..200 {
        let snapshot = feed.snapshot();
        let viewport = Viewport {
            top: scroll_top,
            height: 600.0,
        };
        if signal
            .observe(viewport, sentinel_after(snapshot.visible_count))
            .is_some()
            && feed.request_advance().await.expect("feed alive")
        {
            accepted += 1;
            let settled = feed.settled().await.expect("feed alive");
            if settled.visible_count != snapshot.visible_count {
                signal.attach();
            }
        }
        scroll_top += 50.0;
    }

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.visible_count, 23);
    assert!(!snapshot.has_more);
    assert_eq!(accepted, 3);
    let titles: Vec<&str> = snapshot.visible.iter().map(|r| r.title.as_str()).collect();
    let expected: Vec<String> = (0..23).map(|idx| format!("review {idx}")).collect();
    assert_eq!(titles, expected);
}

#[tokio::test(start_paused = true)]
async fn filter_change_readout() {
    let mut all: Vec<Record> = records(5, "Neurology").to_vec();
    all.extend(records(3, "Oncology").iter().cloned());
    let feed = FeedHandle::spawn(
        FeedWindow::new(all.into(), 2),
        vec![],
        Duration::from_millis(10),
    );

    let snapshot = feed
        .change_filter(TopicSelector::topic("Oncology"))
        .await
        .expect("feed alive");
    assert_eq!(snapshot.matching_count, 3);
    assert_eq!(snapshot.total_records, 8);
    assert_eq!(snapshot.visible_count, 2);

    assert!(feed.request_advance().await.expect("feed alive"));
    let snapshot = feed.settled().await.expect("feed alive");
    assert_eq!(snapshot.visible_count, 3);
}
