//! Deletion safety for sifter.
//!
//! This crate classifies paths by how dangerous deleting them would be
//! (system directories, the home directory, virtual filesystems, mount
//! points, removable media) and removes files and directory trees behind a
//! safety check plus a user confirmation.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sifter_ops::{DeletionGate, DeletionRequest, SafetyClassifier};
//!
//! let mut gate = DeletionGate::new(SafetyClassifier::new(), |req: &DeletionRequest| {
//!     println!("{}", req.prompt());
//!     true
//! });
//! let outcome = gate.delete(Path::new("/data/old-copy.iso"));
//! println!("{}", outcome.message());
//! ```

mod delete;
mod error;
mod gate;
mod mounts;
mod progress;
mod safety;

pub use delete::{count_items, delete_directory, delete_file};
pub use error::{DeleteError, FailedItem};
pub use gate::{ConfirmDeletion, DeletionGate, DeletionOutcome, DeletionRequest};
pub use mounts::{MountInfo, MountTable};
pub use progress::{DeletionProgress, DeletionSummary};
pub use safety::{
    DeletionStatus, SafetyClassifier, SafetyConfig, SafetyConfigBuilder, block_device_name,
    status_message,
};
