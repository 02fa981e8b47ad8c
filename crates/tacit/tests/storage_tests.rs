//! Integration tests for persistence and shared use of the memory
//!
//! Uses real files in temporary directories.

use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{TimeZone, Utc};
use tacit::PreferenceMemory;
use tacit::config::Config;
use tacit::memory::MemoryTier;
use tacit::storage::{InMemoryStateStore, JsonFileStore, StateStore};
use tacit::testing::fixture_model;
use tempfile::{TempDir, tempdir};

fn open_at(dir: &TempDir) -> PreferenceMemory {
    let path = dir.path().join("preferences.json");
    PreferenceMemory::open(
        Config::default(),
        Arc::new(fixture_model()),
        Box::new(JsonFileStore::new(path)),
    )
    .expect("Failed to open memory")
}

mod file_persistence_tests {
    use super::*;

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        // lastSeen is persisted with millisecond precision
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let snapshot = {
            let mut memory = open_at(&dir);
            memory
                .process_response("Draw a red box using TikZ", now)
                .unwrap();
            memory
                .process_response("Make a rectangle diagram", now)
                .unwrap();
            memory.snapshot()
        };

        let reopened = open_at(&dir);
        assert_eq!(reopened.snapshot(), snapshot);
        assert_eq!(reopened.history().len(), 2);
        assert_eq!(reopened.history().occurrences("box"), 1);
        assert_eq!(reopened.history().occurrences("diagram"), 1);
    }

    #[test]
    fn test_novelty_matches_single_process_across_reopens() {
        let dir = tempdir().unwrap();
        for _ in 0..2 {
            let mut memory = open_at(&dir);
            memory.process_response("box", Utc::now()).unwrap();
        }
        let reopened_weight = open_at(&dir).store().get("box").unwrap().weight;

        let mut single = PreferenceMemory::open(
            Config::default(),
            Arc::new(fixture_model()),
            Box::new(InMemoryStateStore::new()),
        )
        .unwrap();
        single.process_response("box", Utc::now()).unwrap();
        single.process_response("box", Utc::now()).unwrap();
        let single_weight = single.store().get("box").unwrap().weight;

        assert!((reopened_weight - single_weight).abs() < 1e-6);
        assert!((reopened_weight - 2.0492).abs() < 1e-3);
        assert!(dir.path().join("preferences.history.json").exists());
    }

    #[test]
    fn test_malformed_history_recovers_empty() {
        let dir = tempdir().unwrap();
        {
            let mut memory = open_at(&dir);
            memory.process_response("box", Utc::now()).unwrap();
        }
        std::fs::write(dir.path().join("preferences.history.json"), "[oops").unwrap();

        let memory = open_at(&dir);
        assert!(memory.history().is_empty());
        assert!(memory.store().contains("box"));
    }

    #[test]
    fn test_saved_file_format() {
        let dir = tempdir().unwrap();
        let mut memory = open_at(&dir);
        memory.process_response("Draw a box", Utc::now()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("preferences.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        let entry = &json["box"];

        assert_eq!(entry["value"], "box");
        assert_eq!(entry["tier"], "short-term");
        assert!(entry["weight"].is_f64());
        assert!(entry["lastSeen"].is_i64());
        assert_eq!(entry["embedding"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_malformed_file_recovers_and_is_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let mut memory = open_at(&dir);
        assert!(memory.store().is_empty());

        memory.process_response("Draw a box", Utc::now()).unwrap();
        let snapshot = JsonFileStore::new(&path).load_snapshot().unwrap();
        assert!(snapshot.contains_key("box"));
    }

    #[test]
    fn test_non_object_file_recovers_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("preferences.json"), "[\"box\"]").unwrap();
        assert!(open_at(&dir).store().is_empty());
    }

    #[test]
    fn test_legacy_type_key_loads() {
        let dir = tempdir().unwrap();
        let legacy = r#"{
            "tikz": {
                "value": "tikz",
                "weight": 2.4,
                "embedding": [0.5, 0.5, 0.1],
                "lastSeen": 1700000000000,
                "type": "long-term"
            }
        }"#;
        std::fs::write(dir.path().join("preferences.json"), legacy).unwrap();

        let memory = open_at(&dir);
        let entry = memory.store().get("tikz").unwrap();
        assert_eq!(entry.tier, MemoryTier::LongTerm);
        assert_eq!(entry.weight, 2.4);

        let results = memory.relevant_preferences("box", 0.75).unwrap();
        assert_eq!(results[0].key, "tikz");
    }
}

mod shared_memory_tests {
    use super::*;

    #[test]
    fn test_serialized_updates_from_threads() {
        let shared = Arc::new(Mutex::new(
            PreferenceMemory::open(
                Config::default(),
                Arc::new(fixture_model()),
                Box::new(InMemoryStateStore::new()),
            )
            .unwrap(),
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..5 {
                        let mut memory = shared.lock().unwrap();
                        memory.process_response("tikz box", Utc::now()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut sequential = PreferenceMemory::open(
            Config::default(),
            Arc::new(fixture_model()),
            Box::new(InMemoryStateStore::new()),
        )
        .unwrap();
        for _ in 0..20 {
            sequential.process_response("tikz box", Utc::now()).unwrap();
        }

        let memory = shared.lock().unwrap();
        assert_eq!(memory.history().len(), 20);
        for term in ["tikz", "box"] {
            let concurrent = memory.store().get(term).unwrap().weight;
            let expected = sequential.store().get(term).unwrap().weight;
            assert!((concurrent - expected).abs() < 1e-5);
        }
    }
}
