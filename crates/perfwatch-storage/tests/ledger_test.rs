//! JSONL ledger and SQLite store behaviour through the ResultStore trait.

use std::io::Write;

use chrono::{Duration, TimeZone, Utc};
use perfwatch_core::config::{StorageBackend, StorageConfig};
use perfwatch_core::types::{
    AggregateResult, AggregateStats, HistoryRecord, InsufficientData, InsufficientReason,
};
use perfwatch_storage::sqlite::{migrations, pragmas};
use perfwatch_storage::{open_store, JsonlLedger, ResultStore, SqliteStore};
use proptest::prelude::*;
use tempfile::TempDir;

fn record(operation: &str, mean: f64, seq: i64) -> HistoryRecord {
    let ts = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap() + Duration::seconds(seq);
    HistoryRecord::new(
        AggregateResult::Computed(AggregateStats {
            operation: operation.to_string(),
            count: 10,
            failures: 0,
            mean,
            median: mean,
            min: mean,
            max: mean,
            stddev: 0.0,
            failure_rate: 0.0,
        }),
        ts,
    )
}

fn insufficient(operation: &str, seq: i64) -> HistoryRecord {
    let ts = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap() + Duration::seconds(seq);
    HistoryRecord::new(
        AggregateResult::InsufficientData(InsufficientData {
            operation: operation.to_string(),
            count: 0,
            failures: 5,
            failure_rate: 1.0,
            reason: InsufficientReason::NoSuccessfulSamples,
        }),
        ts,
    )
}

fn stores(dir: &TempDir) -> Vec<(&'static str, Box<dyn ResultStore>)> {
    vec![
        (
            "jsonl",
            Box::new(JsonlLedger::new(dir.path().join("history.jsonl"))),
        ),
        (
            "sqlite",
            Box::new(SqliteStore::open(&dir.path().join("history.db")).unwrap()),
        ),
    ]
}

#[test]
fn interleaved_appends_keep_per_operation_order() {
    let dir = TempDir::new().unwrap();
    for (name, store) in stores(&dir) {
        for i in 0..6 {
            store.append(&record("auth", i as f64 + 1.0, i)).unwrap();
            store.append(&record("db_create", 100.0 + i as f64, i)).unwrap();
        }
        store.append(&insufficient("auth", 6)).unwrap();

        let auth = store.query("auth", 100).unwrap();
        assert_eq!(auth.len(), 7, "{name}");
        let means: Vec<Option<f64>> = auth.iter().map(|r| r.aggregate.mean()).collect();
        assert_eq!(
            means,
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(6.0), None],
            "{name}"
        );
        assert!(auth.iter().all(|r| r.operation == "auth"), "{name}");
        assert!(auth.windows(2).all(|w| w[0].timestamp < w[1].timestamp), "{name}");

        let last_two = store.query("db_create", 2).unwrap();
        let means: Vec<f64> = last_two.iter().filter_map(|r| r.aggregate.mean()).collect();
        assert_eq!(means, vec![104.0, 105.0], "{name}");

        assert!(store.query("unknown", 10).unwrap().is_empty(), "{name}");
        assert!(store.query("auth", 0).unwrap().is_empty(), "{name}");
    }
}

#[test]
fn records_round_trip_exactly() {
    let dir = TempDir::new().unwrap();
    let original = record("auth", 0.237, 0);
    for (name, store) in stores(&dir) {
        store.append(&original).unwrap();
        assert_eq!(store.query("auth", 1).unwrap(), vec![original.clone()], "{name}");
    }
}

#[test]
fn missing_ledger_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let ledger = JsonlLedger::new(dir.path().join("nested").join("history.jsonl"));
    assert!(ledger.read_all().unwrap().is_empty());
    ledger.append(&record("auth", 1.0, 0)).unwrap();
    assert_eq!(ledger.read_all().unwrap().len(), 1);
}

#[test]
fn torn_trailing_line_only_loses_that_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.jsonl");
    let ledger = JsonlLedger::new(&path);
    ledger.append(&record("auth", 1.0, 0)).unwrap();

    // Simulate a writer killed mid-record.
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(br#"{"operation":"auth","timestamp":"2026-"#).unwrap();
    drop(file);

    assert_eq!(ledger.read_all().unwrap().len(), 1);

    ledger.append(&record("auth", 3.0, 2)).unwrap();
    let means: Vec<f64> = ledger
        .query("auth", 10)
        .unwrap()
        .iter()
        .filter_map(|r| r.aggregate.mean())
        .collect();
    assert_eq!(means, vec![1.0, 3.0]);
}

#[test]
fn concurrent_appends_never_interleave() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 50;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.jsonl");

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let path = path.clone();
            std::thread::spawn(move || {
                let ledger = JsonlLedger::new(path);
                let operation = format!("op-{w}");
                for i in 0..PER_WRITER {
                    ledger
                        .append(&record(&operation, i as f64 + 1.0, i as i64))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), WRITERS * PER_WRITER);
    for line in raw.lines() {
        serde_json::from_str::<HistoryRecord>(line).unwrap();
    }

    let ledger = JsonlLedger::new(&path);
    assert_eq!(ledger.read_all().unwrap().len(), WRITERS * PER_WRITER);
    for w in 0..WRITERS {
        let runs = ledger.query(&format!("op-{w}"), PER_WRITER).unwrap();
        let means: Vec<f64> = runs.iter().map(|r| r.aggregate.mean().unwrap()).collect();
        let expected: Vec<f64> = (1..=PER_WRITER).map(|i| i as f64).collect();
        assert_eq!(means, expected);
    }
}

#[test]
fn open_store_honours_backend() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: Some(StorageBackend::Sqlite),
        history_path: Some(dir.path().join("runs.db")),
    };
    let store = open_store(&config).unwrap();
    store.append(&record("auth", 1.0, 0)).unwrap();
    assert_eq!(store.query("auth", 5).unwrap().len(), 1);

    let reopened = SqliteStore::open(&dir.path().join("runs.db")).unwrap();
    assert_eq!(reopened.count().unwrap(), 1);
}

#[test]
fn sqlite_schema_is_migrated_once() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.append(&record("auth", 1.0, 0)).unwrap();
    assert_eq!(store.count().unwrap(), 1);

    let conn = rusqlite::Connection::open_in_memory().unwrap();
    pragmas::apply_pragmas(&conn).unwrap();
    migrations::run_migrations(&conn).unwrap();
    migrations::run_migrations(&conn).unwrap();
    assert_eq!(migrations::current_version(&conn).unwrap(), 1);
}

#[test]
fn sqlite_file_uses_wal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wal.db");
    let _store = SqliteStore::open(&path).unwrap();
    let conn = rusqlite::Connection::open(&path).unwrap();
    assert!(pragmas::verify_wal_mode(&conn).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ledger_query_matches_filtered_append_order(ops in prop::collection::vec(0u8..3, 0..40)) {
        let dir = TempDir::new().unwrap();
        let ledger = JsonlLedger::new(dir.path().join("h.jsonl"));
        let names = ["a", "b", "c"];
        for (seq, op) in ops.iter().enumerate() {
            ledger.append(&record(names[*op as usize], seq as f64 + 1.0, seq as i64)).unwrap();
        }
        for (index, name) in names.iter().enumerate() {
            let expected: Vec<f64> = ops
                .iter()
                .enumerate()
                .filter(|(_, op)| **op as usize == index)
                .map(|(seq, _)| seq as f64 + 1.0)
                .collect();
            let got: Vec<f64> = ledger
                .query(name, usize::MAX)
                .unwrap()
                .iter()
                .filter_map(|r| r.aggregate.mean())
                .collect();
            prop_assert_eq!(got, expected);
        }
    }
}
