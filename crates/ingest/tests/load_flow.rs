use review_ingest::{
    extract_raw_topics, source_for, Fallback, RecordOrigin, ReviewLoader, ShapeKind,
};
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, value.to_string()).expect("write payload");
    path
}

#[tokio::test]
async fn flat_capitalized_document_loads_canonical_records() {
    let temp = TempDir::new().expect("tempdir");
    let items = vec![
        json!({"URL": "u1", "Topic": "Oncology", "Title": "t1", "Author": "A", "Date": "2020-01-01"}),
        json!({"URL": "u2", "Topic": "Neurology", "Title": "t2", "Author": "B", "Date": "2020-01-02"}),
        json!({"URL": "u3", "Topic": "Oncology", "Title": "t3", "Author": "C", "Date": "2020-01-03"}),
    ];
    let path = write_json(&temp, "reviews.json", &json!(items));

    let source = source_for(path.to_str().expect("utf8 path")).expect("source");
    let outcome = ReviewLoader::new(source).load().await;

    assert_eq!(outcome.stats.origin, RecordOrigin::Primary);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.records[1].authors, "B");
    assert_eq!(outcome.topics, extract_raw_topics(&items));
    let report = outcome.report.expect("report");
    assert_eq!(report.shape, ShapeKind::Flat);
    assert_eq!(report.topic_key, Some("Topic"));
}

#[tokio::test]
async fn missing_document_falls_back_to_fallback_file() {
    let temp = TempDir::new().expect("tempdir");
    let fallback = write_json(
        &temp,
        "fallback.json",
        &json!([[{"title": "spare", "topic": "Neurology"}]]),
    );

    let source = source_for(temp.path().join("absent.json").to_str().expect("utf8 path"))
        .expect("source");
    let outcome = ReviewLoader::new(source)
        .with_fallback(Fallback::File(fallback))
        .load()
        .await;

    assert_eq!(outcome.stats.origin, RecordOrigin::Fallback);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].title, "spare");
    assert_eq!(outcome.topics, vec!["Neurology"]);
}
