//! Listing and lookup of saved crawls on disk

use kodegen_tools_seo_spider::database::{CrawlDatabase, EntryKind};
use kodegen_tools_seo_spider::error::ErrorKind;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn add_crawl_dir(root: &Path, name: &str, bytes: usize, age: Duration) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("crawl.db"), vec![0u8; bytes]).unwrap();
    set_age(&dir, age);
}

fn set_age(path: &Path, age: Duration) {
    let when = SystemTime::now() - age;
    File::open(path).unwrap().set_modified(when).unwrap();
}

#[test]
fn test_missing_directory_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let db = CrawlDatabase::new(dir.path().join("ProjectInstanceData"));
    assert!(db.list_crawls().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn test_most_recent_first_with_name_tiebreak() {
    let dir = TempDir::new().unwrap();
    add_crawl_dir(dir.path(), "old", 10, Duration::from_secs(3600));
    add_crawl_dir(dir.path(), "newest", 20, Duration::from_secs(10));
    add_crawl_dir(dir.path(), "tie-b", 30, Duration::from_secs(600));
    add_crawl_dir(dir.path(), "tie-a", 40, Duration::from_secs(600));
    let tie = SystemTime::now() - Duration::from_secs(600);
    File::open(dir.path().join("tie-a")).unwrap().set_modified(tie).unwrap();
    File::open(dir.path().join("tie-b")).unwrap().set_modified(tie).unwrap();

    let ids: Vec<String> = CrawlDatabase::new(dir.path())
        .list_crawls()
        .unwrap()
        .into_iter()
        .map(|e| e.crawl_id)
        .collect();

    assert_eq!(ids, vec!["newest", "tie-a", "tie-b", "old"]);
}

#[test]
fn test_hidden_entries_and_stray_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".lock")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
    std::fs::create_dir(dir.path().join("site-a")).unwrap();
    std::fs::write(dir.path().join("client.seospider"), vec![0u8; 5]).unwrap();

    let entries = CrawlDatabase::new(dir.path()).list_crawls().unwrap();
    let mut ids: Vec<&str> = entries.iter().map(|e| e.crawl_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["client.seospider", "site-a"]);

    let file = entries.iter().find(|e| e.crawl_id == "client.seospider").unwrap();
    assert_eq!(file.kind, EntryKind::CrawlFile);
    assert_eq!(file.size_bytes, 5);
    assert_eq!(file.load_target(), file.path.to_string_lossy());
}

#[test]
fn test_find_reports_size_and_kind() {
    let dir = TempDir::new().unwrap();
    add_crawl_dir(dir.path(), "site-a", 128, Duration::ZERO);
    let db = CrawlDatabase::new(dir.path());

    let entry = db.find("site-a").unwrap();
    assert_eq!(entry.kind, EntryKind::Database);
    assert_eq!(entry.size_bytes, 128);
    assert_eq!(entry.load_target(), "site-a");

    assert_eq!(db.find("site-b").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(db.find("../etc").unwrap_err().kind(), ErrorKind::InvalidArgument);
}

#[cfg(unix)]
#[test]
fn test_save_detection_ignores_older_entries() {
    let dir = TempDir::new().unwrap();
    add_crawl_dir(dir.path(), "old", 10, Duration::from_secs(3600));
    let db = CrawlDatabase::new(dir.path());

    let started = SystemTime::now() - Duration::from_secs(60);
    assert!(!db.has_save_since(started));

    add_crawl_dir(dir.path(), "fresh", 10, Duration::ZERO);
    assert!(db.has_save_since(started));
}
