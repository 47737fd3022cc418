use super::*;
use crate::kernel::services::ports::{
    load_selected_workspace, save_selected_workspace, SELECTED_WORKSPACE_KEY,
};

#[test]
fn missing_selection_falls_back_and_is_written_back() {
    let mut storage = MemoryStorage::new();

    let selected = load_selected_workspace(&mut storage, "workspace");

    assert_eq!(selected, "workspace");
    assert_eq!(
        storage.get(SELECTED_WORKSPACE_KEY).as_deref(),
        Some(r#"{"name":"workspace"}"#)
    );
}

#[test]
fn unreadable_selection_falls_back() {
    let mut storage = MemoryStorage::new();
    storage.set(SELECTED_WORKSPACE_KEY, "not json").unwrap();

    assert_eq!(load_selected_workspace(&mut storage, "workspace"), "workspace");
}

#[test]
fn file_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("storage.json");

    let mut storage = FileStorage::open(&path);
    save_selected_workspace(&mut storage, "demo").unwrap();
    drop(storage);

    let mut reopened = FileStorage::open(&path);
    assert_eq!(load_selected_workspace(&mut reopened, "workspace"), "demo");
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let storage = FileStorage::open(&path);
    assert_eq!(storage.get(SELECTED_WORKSPACE_KEY), None);
}
