//! ai-manager - unified management for local AI developer tools
//!
//! Discovers configured tools (Claude Code, Gemini CLI, OpenCode, ...) on the
//! local machine, reports their disk usage and health, and deletes aged
//! temporary files under per-kind retention windows.
//!
//! # Layout
//!
//! ```text
//! ~/.ai-manager/
//! └── config.yaml      # tool table, models, defaults, retention
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ai_manager::{Cleaner, Config, Scanner};
//!
//! let config = Config::load(None)?;
//! let scan = Scanner::new(&config).scan();
//! let results = Cleaner::new(&config).dry_run(true).cleanup_all();
//! ```

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fsutil;
pub mod health;
pub mod paths;
pub mod render;
pub mod walk;

pub use cleanup::{CleanupResult, Cleaner};
pub use config::{Config, Model, RetentionClass, RetentionPolicy, Tool};
pub use discovery::{ScanResult, Scanner, StatsReport, ToolInfo, ToolStatus, ToolUsage};
pub use error::{Error, Result};
pub use health::{HealthReport, ToolHealth};
pub use walk::{DiskUsage, PruneOptions, PruneOutcome};

/// Version reported by `ai-mgr version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
