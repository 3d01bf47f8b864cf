//! Filesystem tests for `JsonFileStore` and route persistence on disk.

use std::path::PathBuf;

use ttm_core::{KeyValueStore, OrderMode, Stop, STOPS_KEY};
use ttm_store::{JsonFileStore, RouteRepository};
use uuid::Uuid;

/// Fresh store path inside a unique temp directory.
fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("ttm-store-test-{}", Uuid::new_v4()))
        .join("nested")
        .join("ttm-store.json")
}

fn cleanup(path: &std::path::Path) {
    if let Some(root) = path.parent().and_then(std::path::Path::parent) {
        let _ = std::fs::remove_dir_all(root);
    }
}

#[test]
fn missing_file_reads_as_empty() {
    let path = temp_store_path();
    let store = JsonFileStore::new(&path);
    assert_eq!(store.get("anything").expect("read should succeed"), None);
    assert!(!path.exists(), "reading must not create the file");
}

#[test]
fn set_creates_parent_dirs_and_persists() {
    let path = temp_store_path();
    let mut store = JsonFileStore::new(&path);
    store.set("ttm:mode", "time").expect("write should succeed");
    assert!(path.exists());

    let reopened = JsonFileStore::new(&path);
    assert_eq!(
        reopened.get("ttm:mode").unwrap().as_deref(),
        Some("time")
    );
    cleanup(&path);
}

#[test]
fn handles_on_same_path_see_each_other() {
    let path = temp_store_path();
    let mut first = JsonFileStore::new(&path);
    let mut second = JsonFileStore::new(&path);
    first.set("a", "1").unwrap();
    second.set("b", "2").unwrap();
    assert_eq!(first.get("b").unwrap().as_deref(), Some("2"));
    assert_eq!(second.get("a").unwrap().as_deref(), Some("1"));

    second.remove("a").unwrap();
    assert_eq!(first.get("a").unwrap(), None);
    cleanup(&path);
}

#[test]
fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
    let path = temp_store_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{{{ definitely not json").unwrap();

    let mut store = JsonFileStore::new(&path);
    assert_eq!(store.get("ttm:mode").unwrap(), None);
    store.set("ttm:mode", "manual").unwrap();
    assert_eq!(store.get("ttm:mode").unwrap().as_deref(), Some("manual"));
    cleanup(&path);
}

#[test]
fn route_round_trips_through_file() {
    let path = temp_store_path();
    let stops = vec![
        Stop::new("21 Rue Haute", "Pleudihen").with_time(Some("20:20".to_string())),
        Stop::new("3 Rue Chanzy", "Verzenay").with_notes(Some("sans oignon".to_string())),
    ];

    let mut repo = RouteRepository::new(JsonFileStore::new(&path), "Rue de la Crayère, Verzenay");
    repo.save_stops(&stops).unwrap();
    repo.save_mode(OrderMode::Time).unwrap();

    let reopened = RouteRepository::new(JsonFileStore::new(&path), "unused");
    assert_eq!(reopened.load_stops().unwrap(), stops);
    assert_eq!(reopened.load_mode().unwrap(), OrderMode::Time);
    cleanup(&path);
}

#[test]
fn malformed_stops_value_on_disk_loads_empty() {
    let path = temp_store_path();
    let mut store = JsonFileStore::new(&path);
    store.set(STOPS_KEY, "[{\"address\": 12}]").unwrap();

    let repo = RouteRepository::new(store, "origin");
    assert!(repo.load_stops().unwrap().is_empty());
    cleanup(&path);
}
