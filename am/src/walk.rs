//! Directory walks shared by discovery and cleanup
//!
//! Two walks live here: a read-only usage tally and the retention prune that
//! deletes aged files. Both count every non-directory entry (symlinks below the
//! root are not followed and count as themselves) and skip entries that fail
//! to read. Only the usage tally follows a symlinked root; the prune never
//! descends through one.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

use crate::error::{Error, Result};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Disk usage of a directory tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    /// Root of the walk
    pub path: PathBuf,
    /// Sum of entry sizes in bytes
    pub size_bytes: u64,
    /// Number of non-directory entries
    pub files: u64,
    /// Newest modification time seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Tally size and file count under `root`
///
/// Fails only when `root` itself cannot be read; unreadable entries below it
/// are skipped.
pub fn disk_usage(root: &Path) -> Result<DiskUsage> {
    if let Err(e) = fs::metadata(root) {
        return Err(match e.kind() {
            ErrorKind::NotFound => Error::PathNotFound {
                path: root.to_path_buf(),
            },
            _ => Error::Io(e),
        });
    }

    let mut usage = DiskUsage {
        path: root.to_path_buf(),
        ..Default::default()
    };

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        usage.size_bytes += meta.len();
        usage.files += 1;

        if let Ok(modified) = meta.modified() {
            let modified: DateTime<Utc> = modified.into();
            if usage.last_modified.is_none_or(|newest| modified > newest) {
                usage.last_modified = Some(modified);
            }
        }
    }

    Ok(usage)
}

/// Options for a retention prune
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
    /// Files older than this many days are eligible
    pub days: u32,
    /// Tally eligible files without removing them
    pub dry_run: bool,
}

/// Tally of a retention prune
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneOutcome {
    pub files_deleted: u64,
    pub bytes_freed: u64,
    /// Entries that could not be inspected or removed
    pub errors: u64,
}

impl PruneOutcome {
    /// Fold another outcome into this one
    pub fn absorb(&mut self, other: PruneOutcome) {
        self.files_deleted += other.files_deleted;
        self.bytes_freed += other.bytes_freed;
        self.errors += other.errors;
    }
}

/// The instant `days` days before `now`, clamped to the epoch
pub fn cutoff_for(days: u32, now: SystemTime) -> SystemTime {
    now.checked_sub(Duration::from_secs(u64::from(days) * SECS_PER_DAY))
        .unwrap_or(UNIX_EPOCH)
}

/// Remove every file under `root` older than `options.days` days
pub fn prune_older_than(root: &Path, options: PruneOptions) -> PruneOutcome {
    prune_with_cutoff(root, cutoff_for(options.days, SystemTime::now()), options.dry_run)
}

/// Remove every non-directory entry under `root` modified strictly before `cutoff`
///
/// Directories are never removed. Counts accumulate only for entries that were
/// actually removed (or would be, under `dry_run`). A symlinked `root` is left
/// alone along with whatever it points at.
pub fn prune_with_cutoff(root: &Path, cutoff: SystemTime, dry_run: bool) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();

    for entry in WalkDir::new(root).follow_root_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                outcome.errors += 1;
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.depth() == 0 && entry.path_is_symlink() {
            debug!("Not pruning through symlinked root {}", root.display());
            break;
        }

        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Skipping {}: {}", entry.path().display(), e);
                outcome.errors += 1;
                continue;
            }
        };
        let modified = match meta.modified() {
            Ok(modified) => modified,
            Err(e) => {
                debug!("No modification time for {}: {}", entry.path().display(), e);
                outcome.errors += 1;
                continue;
            }
        };
        let size = meta.len();

        if modified >= cutoff {
            continue;
        }

        if dry_run {
            debug!("Would delete {} ({} bytes)", entry.path().display(), size);
        } else if let Err(e) = fs::remove_file(entry.path()) {
            debug!("Failed to delete {}: {}", entry.path().display(), e);
            outcome.errors += 1;
            continue;
        } else {
            debug!("Deleted {} ({} bytes)", entry.path().display(), size);
        }

        outcome.files_deleted += 1;
        outcome.bytes_freed += size;
    }

    outcome
}
