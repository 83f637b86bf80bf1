//! Tool discovery: presence, config health and disk usage per tool

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::{Config, Tool};
use crate::error::Result;
use crate::walk::{DiskUsage, disk_usage};

/// Health of a discovered tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// Base directory and config file present
    Ok,
    /// Base directory present, config file missing
    Warning,
    /// Base directory present but unreadable
    Error,
    /// Base directory missing
    NotFound,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// What discovery learned about one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub key: String,
    pub name: String,
    /// Expanded base directory
    pub path: PathBuf,
    pub found: bool,
    pub enabled: bool,
    /// Resolved config file, if the tool declares one
    pub config_path: Option<PathBuf>,
    /// Resolved data directory, if the tool declares one
    pub data_path: Option<PathBuf>,
    pub disk_usage: DiskUsage,
    /// Newest modification under the base directory
    pub last_used: Option<DateTime<Utc>>,
    pub status: ToolStatus,
}

/// Result of a discovery pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub tools: Vec<ToolInfo>,
    /// Tools present on disk
    pub total_found: usize,
    /// Enabled tools that were scanned
    pub enabled_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    fn from_tools(tools: Vec<ToolInfo>) -> Self {
        Self {
            total_found: tools.iter().filter(|t| t.found).count(),
            enabled_count: tools.iter().filter(|t| t.enabled).count(),
            tools,
            timestamp: Utc::now(),
        }
    }
}

/// Disk usage of one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUsage {
    pub key: String,
    pub name: String,
    pub found: bool,
    pub usage: DiskUsage,
}

/// Disk usage across all enabled tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub tools: Vec<ToolUsage>,
    pub total_bytes: u64,
    pub total_files: u64,
    pub tool_count: usize,
}

/// Scans the system for configured tools
pub struct Scanner<'a> {
    config: &'a Config,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Discover every enabled tool, in key order
    pub fn scan(&self) -> ScanResult {
        let tools = self
            .config
            .enabled_tools()
            .map(|(key, tool)| self.discover(key, tool))
            .collect();
        let result = ScanResult::from_tools(tools);
        info!("Scan found {} of {} enabled tools", result.total_found, result.enabled_count);
        result
    }

    /// Discover a single tool by key, even when it is disabled
    pub fn scan_tool(&self, key: &str) -> Result<ScanResult> {
        let tool = self.config.tool(key)?;
        Ok(ScanResult::from_tools(vec![self.discover(key, tool)]))
    }

    /// Inspect one tool's base directory, config file and disk usage
    pub fn discover(&self, key: &str, tool: &Tool) -> ToolInfo {
        let base = tool.base_path();
        let mut info = ToolInfo {
            key: key.to_string(),
            name: tool.name.clone(),
            path: base.clone(),
            found: false,
            enabled: tool.enabled,
            config_path: tool.config_file(&base),
            data_path: tool.data_dir(&base),
            disk_usage: DiskUsage {
                path: base.clone(),
                ..Default::default()
            },
            last_used: None,
            status: ToolStatus::NotFound,
        };

        match fs::metadata(&base) {
            Ok(_) => info.found = true,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found at {}", tool.name, base.display());
                return info;
            }
            Err(e) => {
                warn!("Cannot read {} at {}: {}", tool.name, base.display(), e);
                info.found = true;
                info.status = ToolStatus::Error;
                return info;
            }
        }

        info.status = match &info.config_path {
            Some(config_file) if !config_file.exists() => ToolStatus::Warning,
            _ => ToolStatus::Ok,
        };

        match disk_usage(&base) {
            Ok(usage) => {
                info.last_used = usage.last_modified;
                info.disk_usage = usage;
            }
            Err(e) => {
                warn!("Failed to measure {}: {}", base.display(), e);
                info.status = ToolStatus::Error;
            }
        }

        info
    }

    /// Disk usage for every enabled tool plus totals
    pub fn stats(&self) -> StatsReport {
        let mut report = StatsReport {
            tools: Vec::new(),
            total_bytes: 0,
            total_files: 0,
            tool_count: 0,
        };

        for (key, tool) in self.config.enabled_tools() {
            let base = tool.base_path();
            let (found, usage) = match disk_usage(&base) {
                Ok(usage) => (true, usage),
                Err(e) => {
                    debug!("No usage for {}: {}", tool.name, e);
                    (
                        false,
                        DiskUsage {
                            path: base,
                            ..Default::default()
                        },
                    )
                }
            };

            report.total_bytes += usage.size_bytes;
            report.total_files += usage.files;
            report.tool_count += 1;
            report.tools.push(ToolUsage {
                key: key.to_string(),
                name: tool.name.clone(),
                found,
                usage,
            });
        }

        report
    }
}
