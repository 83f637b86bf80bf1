//! Retention-based cleanup of tool temp directories

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{Config, RetentionClass, RetentionPolicy, Tool};
use crate::error::Result;
use crate::fsutil::is_symlink;
use crate::walk::{PruneOptions, PruneOutcome, prune_older_than};

/// Result of cleaning one tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupResult {
    pub key: String,
    pub tool: String,
    /// Expanded base directory
    pub path: PathBuf,
    /// Temp directories that were walked
    pub paths_cleaned: Vec<PathBuf>,
    pub files_deleted: u64,
    pub space_freed: u64,
    /// Entries skipped because they could not be read or removed
    pub errors: u64,
    pub duration_ms: u64,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Deletes aged files under each enabled tool's temp directories
pub struct Cleaner<'a> {
    config: &'a Config,
    retention: RetentionPolicy,
    dry_run: bool,
}

impl<'a> Cleaner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            retention: config.retention,
            dry_run: false,
        }
    }

    /// Use a single window for every kind of temp file
    pub fn with_days(mut self, days: u32) -> Self {
        self.retention = RetentionPolicy::uniform(days);
        self
    }

    /// Report what would be deleted without deleting
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Clean every enabled tool, in key order
    pub fn cleanup_all(&self) -> Vec<CleanupResult> {
        self.config
            .enabled_tools()
            .map(|(key, tool)| self.clean(key, tool))
            .collect()
    }

    /// Clean one tool by key
    pub fn cleanup_tool(&self, key: &str) -> Result<CleanupResult> {
        let tool = self.config.tool(key)?;
        Ok(self.clean(key, tool))
    }

    /// Prune each existing temp directory of `tool` with its retention window
    pub fn clean(&self, key: &str, tool: &Tool) -> CleanupResult {
        let started = Instant::now();
        let base = tool.base_path();
        let mut result = CleanupResult {
            key: key.to_string(),
            tool: tool.name.clone(),
            path: base.clone(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        match fs::metadata(&base) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not installed at {}, nothing to clean", tool.name, base.display());
                return result;
            }
            Err(e) => {
                warn!("Cannot read {}: {}", base.display(), e);
                result.error = Some(format!("Cannot read {}: {}", base.display(), e));
                return result;
            }
        }

        let mut total = PruneOutcome::default();
        for (name, dir) in tool.temp_dirs(&base) {
            if !dir.exists() {
                debug!("Skipping missing temp path {}", dir.display());
                continue;
            }
            if is_symlink(&dir) {
                warn!("Refusing to clean {}: it is a symlink", dir.display());
                result.error = Some(format!("Refused temp path {}: symlink", dir.display()));
                continue;
            }
            if contains_base(&dir, &base) {
                warn!("Refusing to clean {}: it contains the tool directory", dir.display());
                result.error = Some(format!("Refused temp path {}: contains {}", dir.display(), base.display()));
                continue;
            }

            let days = self.retention.days_for(RetentionClass::classify(name));
            let outcome = prune_older_than(
                &dir,
                PruneOptions {
                    days,
                    dry_run: self.dry_run,
                },
            );
            debug!(
                "{}: {} files, {} bytes older than {} days",
                dir.display(),
                outcome.files_deleted,
                outcome.bytes_freed,
                days
            );

            total.absorb(outcome);
            result.paths_cleaned.push(dir);
        }

        result.files_deleted = total.files_deleted;
        result.space_freed = total.bytes_freed;
        result.errors = total.errors;

        result.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            "{}: {} files, {} bytes {}",
            tool.name,
            result.files_deleted,
            result.space_freed,
            if self.dry_run { "eligible" } else { "deleted" }
        );
        result
    }
}

/// True when `dir` is the tool's base directory or one of its ancestors
fn contains_base(dir: &Path, base: &Path) -> bool {
    match (fs::canonicalize(dir), fs::canonicalize(base)) {
        (Ok(dir), Ok(base)) => base.starts_with(dir),
        _ => base.starts_with(dir),
    }
}
