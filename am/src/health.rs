//! Health checks for configured tools

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Config;
use crate::fsutil::{check_symlink, is_symlink};

/// Where a symlinked base directory points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub target: PathBuf,
    pub valid: bool,
}

/// Health of one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolHealth {
    pub key: String,
    pub name: String,
    pub path: PathBuf,
    pub path_exists: bool,
    pub config_path: Option<PathBuf>,
    pub config_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symlink: Option<LinkStatus>,
    pub issues: Vec<String>,
}

impl ToolHealth {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Health of every enabled tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub tools: Vec<ToolHealth>,
    /// Total issue count
    pub issues: usize,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.issues == 0
    }
}

/// Check every enabled tool's base directory, symlink and config file
pub fn check(config: &Config) -> HealthReport {
    let tools: Vec<ToolHealth> = config
        .enabled_tools()
        .map(|(key, tool)| {
            let base = tool.base_path();
            let config_path = tool.config_file(&base);
            let mut health = ToolHealth {
                key: key.to_string(),
                name: tool.name.clone(),
                path: base.clone(),
                path_exists: false,
                config_path: config_path.clone(),
                config_exists: false,
                symlink: None,
                issues: Vec::new(),
            };

            if is_symlink(&base) {
                match check_symlink(&base) {
                    Ok((valid, target)) => {
                        if !valid {
                            health
                                .issues
                                .push(format!("Broken symlink: {} -> {}", base.display(), target.display()));
                        }
                        health.symlink = Some(LinkStatus { target, valid });
                    }
                    Err(e) => health.issues.push(format!("Unreadable symlink {}: {}", base.display(), e)),
                }
            }

            if !base.exists() {
                // a broken link already accounts for the missing path
                let reported = health.symlink.as_ref().is_some_and(|link| !link.valid);
                if !reported {
                    health.issues.push(format!("Tool path not found: {}", base.display()));
                }
                return health;
            }
            health.path_exists = true;

            if let Some(config_file) = &config_path {
                health.config_exists = config_file.exists();
                if !health.config_exists {
                    health
                        .issues
                        .push(format!("Config file missing: {}", config_file.display()));
                }
            } else {
                health.config_exists = true;
            }

            debug!("{}: {} issue(s)", tool.name, health.issues.len());
            health
        })
        .collect();

    let issues = tools.iter().map(|t| t.issues.len()).sum();
    HealthReport { tools, issues }
}
