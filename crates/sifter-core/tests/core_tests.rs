use sifter_core::{
    ContentHash, Entry, ScanConfig, ScanError, ScanStats, ScanWarning, WarningKind, sort_entries,
};
use std::path::PathBuf;

#[test]
fn test_content_hash_equality_and_hex() {
    let hash = ContentHash::new(0x779A65E7023CD2E7);
    let hex = hash.to_hex();

    assert_eq!(hex, "779A65E7023CD2E7");
    assert_eq!(hex.len(), 16);
    assert!(
        hex.chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
    );

    assert_eq!(hash, ContentHash::new(0x779A65E7023CD2E7));
    assert_ne!(hash, ContentHash::new(0));
    assert_eq!(ContentHash::new(0).to_hex(), "0000000000000000");
}

#[test]
fn test_entry_constructors() {
    let file = Entry::file("/data/report.pdf", 2048);
    assert!(!file.is_dir());
    assert!(!file.is_parent());
    assert!(file.hash().is_none());
    assert!(!file.is_duplicate());
    assert!(file.needs_hash());
    assert!(!file.is_groupable());

    let hashed = file.clone().with_hash(ContentHash::new(42));
    assert!(hashed.is_groupable());

    let empty = Entry::file("/data/empty", 0);
    assert!(empty.is_empty_file());
    assert!(!empty.needs_hash());

    let dir = Entry::directory("/data");
    assert!(dir.is_dir());
    assert!(!dir.needs_hash());
    assert!(!dir.is_empty_file());
}

#[test]
fn test_directory_never_holds_hash() {
    let dir = Entry::directory("/data").with_hash(ContentHash::new(1));
    assert!(dir.hash().is_none());
    assert!(!dir.is_groupable());
}

#[test]
fn test_duplicate_flag_mutation() {
    let mut entry = Entry::file("/a", 10);
    entry.set_duplicate(true);
    assert!(entry.is_duplicate());
    entry.set_duplicate(false);
    assert!(!entry.is_duplicate());
}

#[test]
fn test_sort_is_case_sensitive() {
    let mut entries = vec![
        Entry::file("/x/apple.txt", 1),
        Entry::file("/x/Zebra.txt", 1),
        Entry::file("/x/banana.txt", 1),
    ];
    sort_entries(&mut entries);

    let names: Vec<String> = entries.iter().map(Entry::display_name).collect();
    // Uppercase sorts before lowercase in byte order.
    assert_eq!(names, vec!["Zebra.txt", "apple.txt", "banana.txt"]);
}

#[test]
fn test_sort_directories_before_files() {
    let mut entries = vec![
        Entry::file("/x/a.txt", 1),
        Entry::directory("/x/z"),
        Entry::parent("/"),
        Entry::file("/x/b.txt", 1),
        Entry::directory("/x/m"),
    ];
    sort_entries(&mut entries);

    assert!(entries[0].is_parent());
    assert!(entries[1].is_dir() && entries[2].is_dir());
    assert!(!entries[3].is_dir() && !entries[4].is_dir());
}

#[test]
fn test_scan_config_recursive_drops_parent() {
    let config = ScanConfig::builder()
        .root("/data")
        .recursive(true)
        .include_parent(true)
        .build()
        .unwrap();
    assert!(!config.wants_parent_entry());

    let listing = ScanConfig::builder()
        .root("/data")
        .include_parent(true)
        .build()
        .unwrap();
    assert!(listing.wants_parent_entry());
}

#[test]
fn test_scan_error_classification() {
    let denied = ScanError::io(
        "/root/secret",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );
    assert_eq!(denied.warning_kind(), WarningKind::PermissionDenied);

    let other = ScanError::io("/dev/sda", std::io::Error::other("boom"));
    assert!(matches!(other, ScanError::Io { .. }));
    assert_eq!(other.warning_kind(), WarningKind::ReadError);
}

#[test]
fn test_scan_warning_constructors() {
    let warning = ScanWarning::broken_symlink("/data/link");
    assert_eq!(warning.kind, WarningKind::BrokenSymlink);
    assert_eq!(warning.path, PathBuf::from("/data/link"));

    let missing = ScanWarning::missing_root("/nope");
    assert_eq!(missing.kind, WarningKind::NotFound);
}

#[test]
fn test_entry_serializes() {
    let entry = Entry::file("/data/a.bin", 5).with_hash(ContentHash::new(255));
    let json = serde_json::to_string(&entry).unwrap();
    let back: Entry = serde_json::from_str(&json).unwrap();
    assert_eq!(entry, back);

    let mut stats = ScanStats::new();
    stats.record(&back);
    assert_eq!(stats.hashed_files, 1);
}
