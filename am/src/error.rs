//! Error types for ai-manager

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by config handling and filesystem helpers
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write config {path}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config already exists: {path} (use --force to overwrite)")]
    ConfigExists { path: PathBuf },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown tool: {key}")]
    UnknownTool { key: String },

    #[error("Unknown model: {key}")]
    UnknownModel { key: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Not a symbolic link: {path}")]
    NotASymlink { path: PathBuf },

    #[error("Home directory could not be determined")]
    NoHomeDir,

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for ai-manager operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_message() {
        let err = Error::UnknownTool { key: "cursor".to_string() };
        assert_eq!(err.to_string(), "Unknown tool: cursor");
    }

    #[test]
    fn test_config_exists_mentions_force() {
        let err = Error::ConfigExists {
            path: PathBuf::from("/tmp/config.yaml"),
        };

        let msg = err.to_string();
        assert!(msg.contains("/tmp/config.yaml"));
        assert!(msg.contains("--force"));
    }
}
