//! Filesystem removal.
//!
//! These functions do not consult the safety classifier; go through
//! [`DeletionGate`](crate::DeletionGate) for user-facing deletions.

use std::fs;
use std::path::Path;

use jwalk::WalkDir;

use crate::error::{DeleteError, FailedItem};
use crate::progress::{DeletionProgress, DeletionSummary};

/// Remove a single file, symlink or empty directory.
pub fn delete_file(path: &Path) -> Result<DeletionSummary, DeleteError> {
    let meta = fs::symlink_metadata(path).map_err(|e| DeleteError::io(path, e))?;

    if meta.is_dir() {
        fs::remove_dir(path).map_err(|e| DeleteError::io(path, e))?;
    } else {
        fs::remove_file(path).map_err(|e| DeleteError::io(path, e))?;
    }

    tracing::info!(path = %path.display(), "deleted");
    Ok(DeletionSummary {
        path: path.to_path_buf(),
        deleted: 1,
        bytes_freed: if meta.is_file() { meta.len() } else { 0 },
    })
}

/// Remove a directory.
///
/// Without `recursive` only an empty directory can be removed. With it, the
/// tree is counted first, then removed deepest-first with `on_progress`
/// called after every item. Failures do not stop the pass; if any occur the
/// result is [`DeleteError::Incomplete`].
pub fn delete_directory<F>(
    path: &Path,
    recursive: bool,
    mut on_progress: F,
) -> Result<DeletionSummary, DeleteError>
where
    F: FnMut(&DeletionProgress),
{
    let meta = fs::symlink_metadata(path).map_err(|e| DeleteError::io(path, e))?;
    if !meta.is_dir() {
        return Err(DeleteError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    if !recursive {
        fs::remove_dir(path).map_err(|e| DeleteError::io(path, e))?;
        let mut progress = DeletionProgress::new(1);
        progress.record(path.to_path_buf(), 0, true);
        on_progress(&progress);
        tracing::info!(path = %path.display(), "deleted empty directory");
        return Ok(DeletionSummary {
            path: path.to_path_buf(),
            deleted: 1,
            bytes_freed: 0,
        });
    }

    let mut progress = DeletionProgress::new(count_items(path));
    let mut failures = Vec::new();

    // Collect everything first so removal never races the walker.
    let mut children = Vec::new();
    for entry in walker(path).min_depth(1) {
        match entry {
            Ok(entry) => {
                let bytes = match entry.metadata() {
                    Ok(m) if m.is_file() => m.len(),
                    _ => 0,
                };
                let is_dir = entry.file_type().is_dir();
                children.push((entry.depth, entry.path(), is_dir, bytes));
            }
            Err(err) => {
                let failed = err.path().unwrap_or(path).to_path_buf();
                failures.push(FailedItem::new(&failed, err.to_string()));
                progress.record(failed, 0, false);
                on_progress(&progress);
            }
        }
    }

    children.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, child, is_dir, bytes) in children {
        let result = if is_dir {
            fs::remove_dir(&child)
        } else {
            fs::remove_file(&child)
        };
        match result {
            Ok(()) => progress.record(child, bytes, true),
            Err(err) => {
                tracing::debug!(path = %child.display(), error = %err, "failed to delete");
                failures.push(FailedItem::new(&child, err.to_string()));
                progress.record(child, 0, false);
            }
        }
        on_progress(&progress);
    }

    match fs::remove_dir(path) {
        Ok(()) => progress.record(path.to_path_buf(), 0, true),
        Err(err) => {
            failures.push(FailedItem::new(path, err.to_string()));
            progress.record(path.to_path_buf(), 0, false);
        }
    }
    on_progress(&progress);

    if !failures.is_empty() {
        tracing::warn!(
            path = %path.display(),
            deleted = progress.deleted,
            failed = failures.len(),
            "recursive deletion incomplete"
        );
        return Err(DeleteError::Incomplete {
            path: path.to_path_buf(),
            deleted: progress.deleted,
            failures,
        });
    }

    tracing::info!(
        path = %path.display(),
        items = progress.deleted,
        "deleted directory tree"
    );
    Ok(DeletionSummary {
        path: path.to_path_buf(),
        deleted: progress.deleted,
        bytes_freed: progress.bytes_freed,
    })
}

/// Number of items a recursive deletion of `path` would remove, `path` included.
///
/// Symlinks are counted but never followed. Unreadable subtrees count only
/// what could be enumerated. A missing path counts as zero.
pub fn count_items(path: &Path) -> u64 {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            walker(path).into_iter().filter(Result::is_ok).count() as u64
        }
        Ok(_) => 1,
        Err(_) => 0,
    }
}

fn walker(path: &Path) -> WalkDir {
    WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_count_items() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tree");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/f.txt"), "x").unwrap();
        fs::write(root.join(".hidden"), "x").unwrap();

        // tree, a, a/b, a/b/f.txt, .hidden
        assert_eq!(count_items(&root), 5);
        assert_eq!(count_items(&root.join(".hidden")), 1);
        assert_eq!(count_items(&root.join("missing")), 0);
    }

    #[test]
    fn test_delete_file_reports_bytes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.bin");
        fs::write(&file, [1u8; 42]).unwrap();

        let summary = delete_file(&file).unwrap();
        assert_eq!(summary.bytes_freed, 42);
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_file_missing() {
        let temp = TempDir::new().unwrap();
        let err = delete_file(&temp.path().join("ghost")).unwrap_err();
        assert!(matches!(err, DeleteError::NotFound { .. }));
    }
}
