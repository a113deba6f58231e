use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tidemark_core::{CheckpointLayout, Error, MockStore, Reconciler, ReconciliationResult};

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    description: String,
    source: String,
    databases: Vec<DatabaseDef>,
    #[serde(default)]
    expected: Option<ExpectedResult>,
    #[serde(default)]
    expect_error: Option<String>,
    remaining: Vec<RemainingDef>,
    expected_deleted: u64,
}

#[derive(Debug, Deserialize)]
struct DatabaseDef {
    db: u32,
    #[serde(default)]
    fields: HashMap<String, String>,
    #[serde(default)]
    extra_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExpectedResult {
    run_id: String,
    offset: i64,
    db: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RemainingDef {
    db: u32,
    fields: Vec<String>,
}

fn build_store(fixture: &Fixture, layout: &CheckpointLayout) -> MockStore {
    let store = MockStore::new();
    for def in &fixture.databases {
        for (field, value) in &def.fields {
            store.set_field(def.db, layout.key(), field, value.as_str());
        }
        for key in &def.extra_keys {
            store.set_string(def.db, key, "x");
        }
    }
    store
}

fn check_error(fixture: &Fixture, err: &Error) {
    let kind = match err {
        Error::StoreQuery { .. } => "store_query",
        Error::StoreSelect { .. } => "store_select",
        Error::CheckpointCorrupt { .. } => "checkpoint_corrupt",
        Error::StoreWrite { .. } => "store_write",
    };
    assert_eq!(
        Some(kind),
        fixture.expect_error.as_deref(),
        "Fixture {} failed with unexpected error: {}",
        fixture.name,
        err
    );
}

fn check_remaining(fixture: &Fixture, store: &MockStore, layout: &CheckpointLayout) {
    for def in &fixture.databases {
        let mut expected: Vec<String> = fixture
            .remaining
            .iter()
            .find(|r| r.db == def.db)
            .map(|r| r.fields.clone())
            .unwrap_or_default();
        expected.sort();

        assert_eq!(
            store.field_names(def.db, layout.key()),
            expected,
            "Fixture {} db[{}] remaining fields mismatch",
            fixture.name,
            def.db
        );
    }
}

async fn load_and_run_fixture(path: &Path) {
    let content = fs::read_to_string(path).expect("Failed to read fixture file");
    let fixture: Fixture = serde_json::from_str(&content).expect("Failed to parse fixture");

    println!(
        "Running fixture: {} - {}",
        fixture.name, fixture.description
    );

    let layout = CheckpointLayout::default();
    let store = build_store(&fixture, &layout);

    match Reconciler::new(&store, &layout).reconcile(&fixture.source).await {
        Ok(result) => {
            let expected = fixture
                .expected
                .as_ref()
                .unwrap_or_else(|| panic!("Fixture {} expected an error", fixture.name));
            assert_eq!(
                result,
                ReconciliationResult {
                    run_id: expected.run_id.clone(),
                    offset: expected.offset,
                    db: expected.db,
                },
                "Fixture {} result mismatch",
                fixture.name
            );
        }
        Err(err) => check_error(&fixture, &err),
    }

    check_remaining(&fixture, &store, &layout);
    assert_eq!(
        store.deleted_fields(),
        fixture.expected_deleted,
        "Fixture {} deleted field count mismatch",
        fixture.name
    );

    println!("  PASSED");
}

#[tokio::test]
async fn test_all_fixtures() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");

    let mut fixture_count = 0;

    for entry in fs::read_dir(&fixtures_dir).expect("Failed to read fixtures directory") {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.extension().map_or(false, |ext| ext == "json") {
            load_and_run_fixture(&path).await;
            fixture_count += 1;
        }
    }

    assert!(
        fixture_count > 0,
        "No fixture files found in {:?}",
        fixtures_dir
    );
    println!("Ran {} fixture(s) successfully", fixture_count);
}

#[tokio::test]
async fn test_split_maxima_fixture() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    load_and_run_fixture(&fixtures_dir.join("split_maxima.json")).await;
}

#[tokio::test]
async fn test_corrupt_offset_fixture() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    load_and_run_fixture(&fixtures_dir.join("corrupt_offset.json")).await;
}
