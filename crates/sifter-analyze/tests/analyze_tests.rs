use sifter_analyze::{
    ContentHash, DuplicateFinder, DuplicateGroup, DuplicateReport, Entry, calculate_wasted_space,
    find_empty_files,
};
use sifter_scan::{DirectoryScanner, ScanConfig};
use std::fs;
use tempfile::TempDir;

fn hashed(path: &str, size: u64, hash: u64) -> Entry {
    Entry::file(path, size).with_hash(ContentHash::new(hash))
}

#[test]
fn test_find_duplicates_empty_input() {
    let mut entries: Vec<Entry> = Vec::new();
    let groups = DuplicateFinder::new().find_duplicates(&mut entries);

    assert!(groups.is_empty());
    assert_eq!(calculate_wasted_space(&groups), 0);
}

#[test]
fn test_find_duplicates_unique_hashes() {
    let mut entries = vec![
        hashed("/tmp/file1.txt", 100, 0xAAAA),
        hashed("/tmp/file2.txt", 200, 0xBBBB),
    ];

    let groups = DuplicateFinder::new().find_duplicates(&mut entries);

    assert!(groups.is_empty());
    assert!(entries.iter().all(|e| !e.is_duplicate()));
}

#[test]
fn test_find_duplicates_basic_scenario() {
    let x = 0x58;
    let y = 0x59;
    let mut entries = vec![hashed("/A", 100, x), hashed("/B", 100, x), hashed("/C", 100, y)];

    let groups = DuplicateFinder::new().find_duplicates(&mut entries);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].hash, ContentHash::new(x));
    assert_eq!(groups[0].count(), 2);
    assert_eq!(groups[0].wasted_space, 100);
    assert!(entries[0].is_duplicate());
    assert!(entries[1].is_duplicate());
    assert!(!entries[2].is_duplicate());

    // A second pass over the unchanged, already-marked set emits the same groups.
    let again = DuplicateFinder::new().find_duplicates(&mut entries);
    assert_eq!(again, groups);
    assert!(entries[0].is_duplicate() && entries[1].is_duplicate());
    assert!(!entries[2].is_duplicate());
}

#[test]
fn test_wasted_space_three_copies() {
    let mut entries = vec![
        hashed("/tmp/file1.txt", 100, 0xAAAA),
        hashed("/tmp/file2.txt", 100, 0xAAAA),
        hashed("/tmp/file3.txt", 100, 0xAAAA),
    ];

    let groups = DuplicateFinder::new().find_duplicates(&mut entries);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].wasted_space, 200);
    assert_eq!(calculate_wasted_space(&groups), 200);
}

#[test]
fn test_directories_are_excluded() {
    let mut entries = vec![
        Entry::directory("/tmp/dir").with_hash(ContentHash::new(0xAAAA)),
        hashed("/tmp/file.txt", 100, 0xAAAA),
    ];

    let groups = DuplicateFinder::new().find_duplicates(&mut entries);
    assert!(groups.is_empty());
}

#[test]
fn test_zero_byte_and_unhashed_are_excluded() {
    let mut entries = vec![
        hashed("/tmp/empty1", 0, 0xAAAA),
        hashed("/tmp/empty2", 0, 0xAAAA),
        Entry::file("/tmp/unhashed1", 100),
        Entry::file("/tmp/unhashed2", 100),
    ];

    let groups = DuplicateFinder::new().find_duplicates(&mut entries);

    assert!(groups.is_empty());
    assert!(entries.iter().all(|e| !e.is_duplicate()));
}

#[test]
fn test_owned_variant_returns_entries() {
    let entries = vec![hashed("/a", 7, 1), hashed("/b", 7, 1)];
    let (entries, groups) = DuplicateFinder::new().find_duplicates_owned(entries);

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(Entry::is_duplicate));
    let paths: Vec<_> = groups[0].paths(&entries).collect();
    assert_eq!(paths.len(), 2);
}

#[test]
fn test_report_sorted_by_wasted_space() {
    let mut entries = vec![
        hashed("/small1", 10, 1),
        hashed("/small2", 10, 1),
        hashed("/big1", 1000, 2),
        hashed("/big2", 1000, 2),
        hashed("/mid1", 100, 3),
        hashed("/mid2", 100, 3),
        hashed("/mid3", 100, 3),
        hashed("/lonely", 5, 4),
    ];

    let report = DuplicateFinder::new().report(&mut entries);

    assert!(report.has_duplicates());
    assert_eq!(report.group_count, 3);
    assert_eq!(report.files_with_duplicates, 7);
    assert_eq!(report.total_wasted_space, 10 + 1000 + 200);
    let wasted: Vec<u64> = report.groups.iter().map(|g| g.wasted_space).collect();
    assert_eq!(wasted, vec![1000, 200, 10]);
    assert!(!entries[7].is_duplicate());
}

#[test]
fn test_report_truncate_keeps_totals() {
    let groups = vec![
        DuplicateGroup {
            hash: ContentHash::new(1),
            size: 50,
            members: vec![0, 1],
            wasted_space: 50,
        },
        DuplicateGroup {
            hash: ContentHash::new(2),
            size: 70,
            members: vec![2, 3],
            wasted_space: 70,
        },
    ];
    let mut report = DuplicateReport::new(groups);
    report.truncate(1);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].wasted_space, 70);
    assert_eq!(report.total_wasted_space, 120);
}

#[test]
fn test_scan_then_group_real_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let content = "This is duplicate content";
    fs::write(root.join("file1.txt"), content).unwrap();
    fs::write(root.join("file2.txt"), content).unwrap();
    fs::write(root.join("unique.txt"), "unique content").unwrap();
    fs::write(root.join("empty-a"), "").unwrap();
    fs::write(root.join("empty-b"), "").unwrap();
    fs::create_dir(root.join("subdir")).unwrap();
    fs::write(root.join("subdir/file3.txt"), content).unwrap();

    let mut entries = DirectoryScanner::new()
        .scan(&ScanConfig::recursive(root))
        .into_entries();
    let report = DuplicateFinder::new().report(&mut entries);

    assert_eq!(report.group_count, 1);
    assert_eq!(report.groups[0].count(), 3);
    assert_eq!(report.total_wasted_space, content.len() as u64 * 2);

    let marked: Vec<_> = entries.iter().filter(|e| e.is_duplicate()).collect();
    assert_eq!(marked.len(), 3);
    assert!(marked.iter().all(|e| e.display_name().ends_with("txt")));

    // Zero-byte files are reported separately, never as duplicates.
    let empties = find_empty_files(&entries);
    assert_eq!(empties.len(), 2);
    assert!(empties.iter().all(|&i| !entries[i].is_duplicate()));
}
