use chrono::{DateTime, TimeZone, Utc};
use monthlane::io::kv_store::{FileStore, KeyValueStore};
use monthlane::model::color::ColorSpec;
use monthlane::ops::tracker::Tracker;
use pretty_assertions::assert_eq;
use std::fs;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
}

fn pastel() -> ColorSpec {
    ColorSpec::new("hsl(200.0,50.0%,90.0%)")
}

#[test]
fn activities_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = FileStore::open(&path).unwrap();
        let mut tracker = Tracker::open(store, "items");
        let piano = tracker.add("Learn piano", pastel(), &at(2024, 3, 15)).unwrap();
        assert!(piano.persist_error.is_none());
        tracker.add("Run a marathon", pastel(), &at(2024, 3, 20)).unwrap();
        let done = tracker.finish(piano.id, &at(2024, 4, 10)).unwrap();
        assert!(done.persist_error.is_none());
    }

    let reopened = Tracker::open(FileStore::open(&path).unwrap(), "items");
    let labels: Vec<_> = reopened
        .activities()
        .iter()
        .map(|a| (a.label.as_str(), a.lane, a.end.is_some()))
        .collect();
    // the finished activity moved to the end of the stored order
    assert_eq!(
        labels,
        vec![("Run a marathon", 2, false), ("Learn piano", 1, true)]
    );
    assert_eq!(reopened.activities()[1].end, Some(at(2024, 4, 10)));
}

#[test]
fn other_keys_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut store = FileStore::open(&path).unwrap();
    store.set("theme", "\"dark\"".to_string()).unwrap();

    let mut tracker = Tracker::open(store, "items");
    tracker.add("Learn piano", pastel(), &at(2024, 3, 15)).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("\"dark\""));
    assert!(reopened.get("items").unwrap().is_some());
}

#[test]
fn reads_data_written_with_line_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let items = r#"[{"label":"Old","start":1704164645,"end":null,"color":"hsl(1,30%,90%)","line":3}]"#;
    let file = serde_json::json!({ "items": items });
    fs::write(&path, serde_json::to_string_pretty(&file).unwrap()).unwrap();

    let tracker = Tracker::open(FileStore::open(&path).unwrap(), "items");
    assert_eq!(tracker.activities().len(), 1);
    assert_eq!(tracker.activities()[0].lane, 3);
    assert_eq!(tracker.activities()[0].label, "Old");
}

#[test]
fn corrupt_file_is_set_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, "{ not json").unwrap();

    let tracker = Tracker::open(FileStore::open(&path).unwrap(), "items");
    assert!(tracker.activities().is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("store.json.bak")).unwrap(),
        "{ not json"
    );
}
