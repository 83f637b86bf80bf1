//! Configuration for ai-manager
//!
//! The config is a YAML file (default `~/.ai-manager/config.yaml`) holding the
//! tool table, the model table, defaults and the retention policy. Every
//! section falls back to the built-in defaults when omitted.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fsutil::ensure_parent_dir;
use crate::paths::{expand_path, home_dir, resolve_under};

/// Directory name of the manager's own files under the home directory
pub const MANAGER_DIR: &str = ".ai-manager";

/// Config file name inside [`MANAGER_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Main ai-manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Config schema version
    pub version: String,

    /// The manager's own directory
    pub home_dir: String,

    /// Known tools keyed by identifier
    pub tools: BTreeMap<String, Tool>,

    /// Known models keyed by identifier
    pub models: BTreeMap<String, Model>,

    pub defaults: Defaults,

    pub retention: RetentionPolicy,
}

/// A configured AI developer tool and where it keeps its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tool {
    /// Display name
    pub name: String,

    /// Base directory; may use `~` and `$VAR`
    pub path: String,

    /// Settings file, relative to the base directory unless absolute
    pub config_path: String,

    /// Data directory, relative to the base directory
    pub data_path: String,

    /// Temporary directories eligible for cleanup, relative to the base directory
    pub temp_paths: Vec<String>,

    pub enabled: bool,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            config_path: String::new(),
            data_path: String::new(),
            temp_paths: Vec::new(),
            enabled: true,
        }
    }
}

impl Tool {
    fn new(name: &str, path: &str, config_path: &str, data_path: &str, temp_paths: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            config_path: config_path.to_string(),
            data_path: data_path.to_string(),
            temp_paths: temp_paths.iter().map(|p| p.to_string()).collect(),
            enabled: true,
        }
    }

    /// Expanded base directory
    pub fn base_path(&self) -> PathBuf {
        expand_path(&self.path)
    }

    /// Settings file location, if the tool declares one
    pub fn config_file(&self, base: &Path) -> Option<PathBuf> {
        if self.config_path.trim().is_empty() {
            return None;
        }
        Some(resolve_under(base, &self.config_path))
    }

    /// Data directory location, if the tool declares one
    pub fn data_dir(&self, base: &Path) -> Option<PathBuf> {
        if self.data_path.trim().is_empty() {
            return None;
        }
        Some(resolve_under(base, &self.data_path))
    }

    /// Temporary directories paired with their configured names
    pub fn temp_dirs(&self, base: &Path) -> Vec<(&str, PathBuf)> {
        self.temp_paths
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| (p.as_str(), resolve_under(base, p)))
            .collect()
    }
}

/// A model endpoint the tools can be pointed at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub name: String,
    pub provider: String,
    pub api_endpoint: String,
    pub model_id: String,

    /// Extra environment for the model
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Model {
    fn new(name: &str, provider: &str, api_endpoint: &str, model_id: &str) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.to_string(),
            api_endpoint: api_endpoint.to_string(),
            model_id: model_id.to_string(),
            environment: BTreeMap::new(),
        }
    }
}

/// Default selections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Key into the model table
    pub model: String,

    /// Default cleanup window in days
    #[serde(rename = "cleanup_days")]
    pub cleanup: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4".to_string(),
            cleanup: 7,
        }
    }
}

/// Retention windows in days, per kind of temporary file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    #[serde(rename = "debug_logs_days")]
    pub debug_logs: u32,

    #[serde(rename = "temp_files_days")]
    pub temp_files: u32,

    #[serde(rename = "shell_snapshots_days")]
    pub shell_snapshots: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            debug_logs: 7,
            temp_files: 7,
            shell_snapshots: 30,
        }
    }
}

/// Which retention window applies to a temporary directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionClass {
    DebugLogs,
    ShellSnapshots,
    TempFiles,
}

impl RetentionClass {
    /// Classify a temp path by its final component
    pub fn classify(temp_path: &str) -> Self {
        let name = Path::new(temp_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(temp_path);
        match name {
            "debug" => Self::DebugLogs,
            "shell-snapshots" => Self::ShellSnapshots,
            _ => Self::TempFiles,
        }
    }
}

impl RetentionPolicy {
    /// Window in days for the given class
    pub fn days_for(&self, class: RetentionClass) -> u32 {
        match class {
            RetentionClass::DebugLogs => self.debug_logs,
            RetentionClass::ShellSnapshots => self.shell_snapshots,
            RetentionClass::TempFiles => self.temp_files,
        }
    }

    /// A policy applying the same window everywhere
    pub fn uniform(days: u32) -> Self {
        Self {
            debug_logs: days,
            temp_files: days,
            shell_snapshots: days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let tools = BTreeMap::from([
            (
                "claude".to_string(),
                Tool::new(
                    "Claude Code",
                    "~/.claude",
                    "settings.json",
                    "projects",
                    &["debug", "shell-snapshots"],
                ),
            ),
            (
                "gemini".to_string(),
                Tool::new("Gemini CLI", "~/.gemini", "settings.json", "tmp", &["tmp"]),
            ),
            (
                "opencode".to_string(),
                Tool::new(
                    "OpenCode",
                    "~/.config/opencode",
                    "settings.json",
                    "projects",
                    &["node_modules", ".cache"],
                ),
            ),
        ]);

        let models = BTreeMap::from([
            (
                "claude-sonnet-4".to_string(),
                Model::new(
                    "Claude Sonnet 4",
                    "anthropic",
                    "https://api.anthropic.com",
                    "claude-sonnet-4-20250514",
                ),
            ),
            (
                "minimax-m2.1".to_string(),
                Model::new(
                    "MiniMax M2.1",
                    "minimax",
                    "https://api.minimaxi.com/anthropic",
                    "miniMax-M2.1-200k",
                ),
            ),
            (
                "glm-4.7".to_string(),
                Model::new("GLM-4.7", "zhipu", "https://open.bigmodel.cn/api/anthropic", "glm-4.7"),
            ),
        ]);

        Self {
            version: "1.0.0".to_string(),
            home_dir: format!("~/{}", MANAGER_DIR),
            tools,
            models,
            defaults: Defaults::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl Config {
    /// Default config location: `~/.ai-manager/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(MANAGER_DIR).join(CONFIG_FILE))
    }

    /// Load configuration with fallback chain
    ///
    /// An explicit path must exist. Otherwise the default location is used
    /// when present, and the built-in defaults when it is not.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        if let Some(path) = Self::default_path()
            && path.exists()
        {
            return Self::load_from_file(&path);
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save config to file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };

        ensure_parent_dir(path).map_err(write_err)?;
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).map_err(write_err)?;

        info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Write the built-in defaults to `path`
    pub fn create_default(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(Error::ConfigExists {
                path: path.to_path_buf(),
            });
        }
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Check the invariants the rest of the crate relies on
    pub fn validate(&self) -> Result<()> {
        for (key, tool) in self.enabled_tools() {
            if tool.path.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("tool '{}' is enabled but has no path", key)));
            }
        }

        if !self.defaults.model.is_empty() && !self.models.contains_key(&self.defaults.model) {
            return Err(Error::InvalidConfig(format!(
                "default model '{}' is not a configured model",
                self.defaults.model
            )));
        }

        Ok(())
    }

    /// Look up a tool by key
    pub fn tool(&self, key: &str) -> Result<&Tool> {
        self.tools.get(key).ok_or_else(|| Error::UnknownTool { key: key.to_string() })
    }

    /// Enabled tools in key order
    pub fn enabled_tools(&self) -> impl Iterator<Item = (&str, &Tool)> {
        self.tools
            .iter()
            .filter(|(_, tool)| tool.enabled)
            .map(|(key, tool)| (key.as_str(), tool))
    }

    /// Look up a model by key
    pub fn model(&self, key: &str) -> Result<&Model> {
        self.models
            .get(key)
            .ok_or_else(|| Error::UnknownModel { key: key.to_string() })
    }

    /// Make `key` the default model
    pub fn switch_model(&mut self, key: &str) -> Result<()> {
        self.model(key)?;
        self.defaults.model = key.to_string();
        Ok(())
    }
}
