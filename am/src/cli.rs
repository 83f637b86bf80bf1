//! CLI argument parsing for ai-mgr

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ai-mgr")]
#[command(
    author,
    version,
    about = "AI Tools Manager - unified management for AI development tools",
    long_about = "Discover AI developer tools on this machine, report their disk usage \
                  and health, and clean up aged temporary files."
)]
pub struct Cli {
    /// Path to config file (default: ~/.ai-manager/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for AI tools on your system
    Scan {
        /// Only scan this tool
        #[arg(short, long)]
        tool: Option<String>,

        /// Show config, data and disk usage details
        #[arg(short, long)]
        detailed: bool,
    },

    /// Delete aged temporary files
    Cleanup {
        /// Delete files older than N days (overrides every retention window)
        #[arg(short, long)]
        days: Option<u32>,

        /// Only clean this tool
        #[arg(short, long)]
        tool: Option<String>,

        /// Report what would be deleted without deleting
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Health check for AI tools
    Check,

    /// Show disk usage statistics
    Stats,

    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Config,

    /// List configured models
    Models,

    /// Set the default model
    Switch {
        /// Model key
        #[arg(required = true)]
        model: String,
    },

    /// Manage symbolic links
    Link {
        #[command(subcommand)]
        command: LinkCommand,
    },

    /// Show version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// Create LINK pointing at TARGET, replacing any existing link
    Create {
        #[arg(required = true)]
        target: String,

        #[arg(required = true)]
        link: String,
    },

    /// Verify that LINK is a symlink whose target exists
    Check {
        #[arg(required = true)]
        link: String,
    },
}
