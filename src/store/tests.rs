use crate::config::Config;
use crate::store::{JsonFileStore, MemoryStore, RecordStore, ensure_layout};
use crate::types::{Signal, SignalStatus};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn signal(id: &str, score: u8) -> Signal {
    Signal {
        id: id.to_string(),
        topic: format!("topic {}", id),
        score,
        status: SignalStatus::New,
        report_file: PathBuf::from(format!("db/report_{}.md", id)),
        created_at: None,
    }
}

#[test]
fn test_missing_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store: JsonFileStore<Signal> = JsonFileStore::new(temp_dir.path().join("signals.json"));

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_zero_length_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    fs::write(&path, "").unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_corrupt_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    fs::write(&path, "[{\"id\": \"abc\", ").unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_wrong_shape_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    fs::write(&path, "{\"not\": \"an array\"}").unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_undecodable_record_is_skipped_not_the_whole_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    fs::write(
        &path,
        r#"[
            {"id": "good0001", "topic": "t", "score": 60, "status": "new", "report_file": "db/r.md"},
            {"id": "odd00001", "topic": "t", "status": "archived"}
        ]"#,
    )
    .unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "good0001");
}

#[test]
fn test_save_carries_undecodable_records_over() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    fs::write(
        &path,
        r#"[
            {"id": "good0001", "topic": "t", "score": 60, "status": "new", "report_file": "db/r.md"},
            {"id": "odd00001", "topic": "t", "status": "archived"}
        ]"#,
    )
    .unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    let mut records = store.load().unwrap();
    records.push(signal("fresh001", 70));
    store.save(&records).unwrap();
    store.save(&store.load().unwrap()).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let ids: Vec<&str> = raw
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["odd00001", "good0001", "fresh001"]);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].id, "fresh001");
}

#[test]
fn test_save_backs_up_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    fs::write(&path, "[{\"id\": \"abc\", ").unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_empty());
    store.save(&[signal("a", 1)]).unwrap();

    let backup = temp_dir.path().join("signals.json.corrupt");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "[{\"id\": \"abc\", ");
    assert_eq!(store.load().unwrap()[0].id, "a");
}

#[test]
fn test_save_then_load_preserves_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("db").join("signals.json");
    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);

    let records = vec![signal("c", 10), signal("a", 90), signal("b", 50)];
    store.save(&records).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, records);
    assert!(!temp_dir.path().join("db").join("signals.json.tmp").exists());
}

#[test]
fn test_save_overwrites_whole_collection() {
    let temp_dir = TempDir::new().unwrap();
    let store: JsonFileStore<Signal> = JsonFileStore::new(temp_dir.path().join("signals.json"));

    store.save(&[signal("a", 1), signal("b", 2)]).unwrap();
    store.save(&[signal("z", 3)]).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "z");
}

#[test]
fn test_saved_file_is_a_json_array() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("signals.json");
    let store: JsonFileStore<Signal> = JsonFileStore::new(&path);
    store.save(&[signal("a", 1)]).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["status"], "new");
}

#[test]
fn test_memory_store() {
    let store: MemoryStore<Signal> = MemoryStore::new();
    assert!(store.load().unwrap().is_empty());

    store.save(&[signal("a", 1)]).unwrap();
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn test_ensure_layout_seeds_empty_stores() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        db_dir: temp_dir.path().join("db"),
        products_dir: temp_dir.path().join("products"),
        templates_dir: temp_dir.path().join("templates"),
        ..Default::default()
    };

    ensure_layout(&config).unwrap();

    assert!(config.products_dir.is_dir());
    assert!(config.templates_dir.is_dir());
    assert_eq!(fs::read_to_string(config.signals_path()).unwrap(), "[]");
    assert_eq!(fs::read_to_string(config.products_path()).unwrap(), "[]");
}

#[test]
fn test_ensure_layout_keeps_existing_data() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        db_dir: temp_dir.path().join("db"),
        products_dir: temp_dir.path().join("products"),
        templates_dir: temp_dir.path().join("templates"),
        ..Default::default()
    };
    ensure_layout(&config).unwrap();

    let store: JsonFileStore<Signal> = JsonFileStore::new(config.signals_path());
    store.save(&[signal("keep", 42)]).unwrap();

    ensure_layout(&config).unwrap();
    assert_eq!(store.load().unwrap()[0].id, "keep");
}
