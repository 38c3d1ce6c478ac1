//! Safety-checked, user-confirmed deletion.

use std::fs;
use std::path::{Path, PathBuf};

use sifter_core::Entry;

use crate::delete::{count_items, delete_directory, delete_file};
use crate::error::DeleteError;
use crate::progress::{DeletionProgress, DeletionSummary};
use crate::safety::{DeletionStatus, SafetyClassifier, status_message};

/// What the user is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    pub path: PathBuf,
    pub status: DeletionStatus,
    pub is_directory: bool,
    /// Items that will be removed, the target included.
    pub item_count: u64,
    /// The target is on removable media.
    pub removable_warning: bool,
}

impl DeletionRequest {
    /// One-line question suitable for a prompt.
    pub fn prompt(&self) -> String {
        let what = if self.is_directory && self.item_count > 1 {
            format!(
                "directory {} and its {} items",
                self.path.display(),
                self.item_count - 1
            )
        } else if self.is_directory {
            format!("empty directory {}", self.path.display())
        } else {
            self.path.display().to_string()
        };
        format!("Delete {what}?")
    }
}

/// Asks the user whether a deletion should go ahead.
pub trait ConfirmDeletion {
    fn confirm(&mut self, request: &DeletionRequest) -> bool;
}

impl<F> ConfirmDeletion for F
where
    F: FnMut(&DeletionRequest) -> bool,
{
    fn confirm(&mut self, request: &DeletionRequest) -> bool {
        self(request)
    }
}

/// How a gated deletion ended.
#[derive(Debug)]
pub enum DeletionOutcome {
    Deleted(DeletionSummary),
    /// The classifier refused the path; the user was not asked.
    Rejected {
        status: DeletionStatus,
        message: String,
    },
    /// The user declined.
    Cancelled { path: PathBuf },
    /// Removal was attempted and failed.
    Failed(DeleteError),
}

impl DeletionOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }

    /// Human-readable description of the outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Deleted(summary) => summary.message(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Cancelled { path } => format!("Deletion cancelled: {}", path.display()),
            Self::Failed(err) => format!("Failed to delete {}: {err}", err.path().display()),
        }
    }
}

/// Runs the safety check, asks for confirmation, then removes.
pub struct DeletionGate<C> {
    classifier: SafetyClassifier,
    confirm: C,
}

impl<C: ConfirmDeletion> DeletionGate<C> {
    pub fn new(classifier: SafetyClassifier, confirm: C) -> Self {
        Self {
            classifier,
            confirm,
        }
    }

    pub fn classifier(&self) -> &SafetyClassifier {
        &self.classifier
    }

    /// Delete a scanned entry.
    pub fn delete_entry(&mut self, entry: &Entry) -> DeletionOutcome {
        self.delete(entry.path())
    }

    /// Delete `path` without progress reporting.
    pub fn delete(&mut self, path: &Path) -> DeletionOutcome {
        self.delete_with_progress(path, |_| {})
    }

    /// Delete `path`, reporting recursive progress to `on_progress`.
    ///
    /// Blocked paths are rejected before the user is asked. Files and empty
    /// directories are removed directly; other directories recursively.
    pub fn delete_with_progress<F>(&mut self, path: &Path, on_progress: F) -> DeletionOutcome
    where
        F: FnMut(&DeletionProgress),
    {
        let status = self.classifier.check_deletion(path);
        if status.is_blocked() {
            let message = status_message(status, path);
            tracing::warn!(path = %path.display(), %status, "deletion rejected");
            return DeletionOutcome::Rejected { status, message };
        }

        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(err) => return DeletionOutcome::Failed(DeleteError::io(path, err)),
        };
        let is_directory = meta.is_dir();
        let item_count = if is_directory { count_items(path) } else { 1 };

        let request = DeletionRequest {
            path: path.to_path_buf(),
            status,
            is_directory,
            item_count,
            removable_warning: status.is_warning(),
        };
        if !self.confirm.confirm(&request) {
            tracing::debug!(path = %path.display(), "deletion cancelled");
            return DeletionOutcome::Cancelled {
                path: path.to_path_buf(),
            };
        }

        let result = if is_directory {
            delete_directory(path, item_count > 1, on_progress)
        } else {
            delete_file(path)
        };
        match result {
            Ok(summary) => DeletionOutcome::Deleted(summary),
            Err(err) => DeletionOutcome::Failed(err),
        }
    }
}
