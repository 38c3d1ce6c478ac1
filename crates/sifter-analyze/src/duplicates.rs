//! Duplicate file detection over scanned entries.
//!
//! Entries are bucketed by content hash. Only non-directory entries with a
//! non-zero size and a hash take part, so directories, empty files and
//! unhashed files never end up in a group. Groups refer to members by index
//! into the caller's entry slice.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use sifter_core::{ContentHash, Entry};

/// A group of entries sharing the same content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content hash shared by all members.
    pub hash: ContentHash,

    /// Size of each member in bytes.
    pub size: u64,

    /// Indices of the members in the scanned entry slice, ascending.
    pub members: Vec<usize>,

    /// Reclaimable bytes: size * (count - 1).
    pub wasted_space: u64,
}

impl DuplicateGroup {
    /// Get the number of duplicate files.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Check if keeping one file, how many could be deleted.
    pub fn deletable_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Resolve member paths against the entry slice the group was built from.
    ///
    /// Indices that no longer exist in `entries` are skipped.
    pub fn paths<'e>(&self, entries: &'e [Entry]) -> impl Iterator<Item = &'e Path> {
        self.members
            .iter()
            .filter_map(|&i| entries.get(i))
            .map(Entry::path)
    }
}

/// Sum of the wasted space of every group.
pub fn calculate_wasted_space(groups: &[DuplicateGroup]) -> u64 {
    groups
        .iter()
        .fold(0u64, |total, g| total.saturating_add(g.wasted_space))
}

/// Presentation-ready summary of a grouping pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Groups sorted by wasted space descending.
    pub groups: Vec<DuplicateGroup>,

    /// Total wasted space (could be reclaimed).
    pub total_wasted_space: u64,

    /// Number of files that belong to a group.
    pub files_with_duplicates: u64,

    /// Number of groups.
    pub group_count: usize,
}

impl DuplicateReport {
    /// Build a report, sorting groups by wasted space (ties by first member).
    pub fn new(mut groups: Vec<DuplicateGroup>) -> Self {
        groups.sort_by(|a, b| {
            b.wasted_space
                .cmp(&a.wasted_space)
                .then_with(|| a.members.first().cmp(&b.members.first()))
        });

        let total_wasted_space = calculate_wasted_space(&groups);
        let files_with_duplicates = groups.iter().map(|g| g.count() as u64).sum();
        let group_count = groups.len();

        Self {
            groups,
            total_wasted_space,
            files_with_duplicates,
            group_count,
        }
    }

    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Keep only the `n` most wasteful groups. Totals are left as computed.
    pub fn truncate(&mut self, n: usize) {
        self.groups.truncate(n);
    }
}

/// Duplicate finder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateFinder;

impl DuplicateFinder {
    pub fn new() -> Self {
        Self
    }

    /// Group entries by hash and mark members as duplicates.
    ///
    /// Every entry's duplicate flag is reset first, so the flags always
    /// describe the current pass. Group order is unspecified; use
    /// [`DuplicateReport::new`] for a sorted view.
    pub fn find_duplicates(&self, entries: &mut [Entry]) -> Vec<DuplicateGroup> {
        let mut buckets: HashMap<ContentHash, Vec<usize>> = HashMap::new();

        for (index, entry) in entries.iter_mut().enumerate() {
            entry.set_duplicate(false);
            if !entry.is_groupable() {
                continue;
            }
            if let Some(hash) = entry.hash() {
                buckets.entry(hash).or_default().push(index);
            }
        }

        let mut groups = Vec::new();
        for (hash, members) in buckets {
            if members.len() < 2 {
                continue;
            }
            for &index in &members {
                entries[index].set_duplicate(true);
            }
            let size = entries[members[0]].size();
            let copies = (members.len() as u64).saturating_sub(1);
            let wasted_space = size.saturating_mul(copies);
            groups.push(DuplicateGroup {
                hash,
                size,
                members,
                wasted_space,
            });
        }

        tracing::debug!(
            entries = entries.len(),
            groups = groups.len(),
            wasted = calculate_wasted_space(&groups),
            "duplicate pass finished"
        );

        groups
    }

    /// Owned variant: takes the entries, marks them and hands them back.
    pub fn find_duplicates_owned(
        &self,
        mut entries: Vec<Entry>,
    ) -> (Vec<Entry>, Vec<DuplicateGroup>) {
        let groups = self.find_duplicates(&mut entries);
        (entries, groups)
    }

    /// Run a pass and build a sorted report.
    pub fn report(&self, entries: &mut [Entry]) -> DuplicateReport {
        DuplicateReport::new(self.find_duplicates(entries))
    }
}
