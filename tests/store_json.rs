//! Store behavior against a real filesystem.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use thumbforge::model::{Category, GeneratedThumbnail};
use thumbforge::store::{JsonFileStore, STORE_FILENAME, ThumbnailStore};

static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn temp_dir(tag: &str) -> PathBuf {
    let n = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "thumbforge-store-{}-{}-{}",
        tag,
        std::process::id(),
        n
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn record(title: &str) -> GeneratedThumbnail {
    GeneratedThumbnail::new(
        "data:image/png;base64,AA==",
        "a prompt",
        title,
        Category::Gaming,
    )
}

#[test]
fn save_prepends_and_list_is_most_recent_first() {
    let dir = temp_dir("order");
    let store = JsonFileStore::in_dir(&dir);

    let a = record("a");
    let b = record("b");
    let c = record("c");
    store.save(&a).unwrap();
    store.save(&b).unwrap();
    store.save(&c).unwrap();

    let titles: Vec<_> = store.list().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, ["c", "b", "a"]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn delete_removes_only_the_named_id() {
    let dir = temp_dir("delete");
    let store = JsonFileStore::in_dir(&dir);

    let a = record("a");
    let b = record("b");
    let c = record("c");
    store.save(&a).unwrap();
    store.save(&b).unwrap();
    store.save(&c).unwrap();

    store.delete_by_id(&b.id).unwrap();
    let ids: Vec<_> = store.list().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, [c.id.clone(), a.id.clone()]);

    // unknown id is a no-op, not an error
    store.delete_by_id("no-such-id").unwrap();
    assert_eq!(store.list().len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn find_by_id_round_trips_the_full_record() {
    let dir = temp_dir("find");
    let store = JsonFileStore::in_dir(&dir);

    let a = record("wanted");
    store.save(&a).unwrap();
    store.save(&record("other")).unwrap();

    let found = store.find_by_id(&a.id).unwrap();
    assert_eq!(found, a);
    assert!(store.find_by_id("missing").is_none());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_lists_empty() {
    let dir = temp_dir("missing");
    let store = JsonFileStore::in_dir(&dir);
    assert!(store.list().is_empty());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn corrupt_blob_lists_empty_and_save_recovers() {
    init_tracing();
    let dir = temp_dir("corrupt");
    std::fs::write(dir.join(STORE_FILENAME), "{not json").unwrap();

    let store = JsonFileStore::in_dir(&dir);
    assert!(store.list().is_empty());

    // a save replaces the corrupt blob with a valid one
    let a = record("fresh");
    store.save(&a).unwrap();
    assert_eq!(store.list(), [a]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn records_survive_a_store_reopen() {
    let dir = temp_dir("reopen");
    let a = record("persisted");
    {
        let store = JsonFileStore::in_dir(&dir);
        store.save(&a).unwrap();
    }
    let reopened = JsonFileStore::in_dir(&dir);
    assert_eq!(reopened.list(), [a]);

    std::fs::remove_dir_all(&dir).unwrap();
}
