use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{debug, info};

use ai_manager::cli::{Cli, Command, LinkCommand};
use ai_manager::config::Config;
use ai_manager::paths::expand_path;
use ai_manager::render::{self, to_json};
use ai_manager::{Cleaner, Scanner, VERSION, fsutil, health};

fn setup_logging(verbose: bool) -> Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    debug!("ai-mgr {} starting", VERSION);

    let config_path = cli.config.as_deref();
    let json = cli.json;

    match cli.command {
        Command::Scan { tool, detailed } => cmd_scan(config_path, tool.as_deref(), detailed, json),
        Command::Cleanup { days, tool, dry_run } => cmd_cleanup(config_path, days, tool.as_deref(), dry_run, json),
        Command::Check => cmd_check(config_path, json),
        Command::Stats => cmd_stats(config_path, json),
        Command::Init { force } => cmd_init(config_path, force),
        Command::Config => cmd_config(config_path, json),
        Command::Models => cmd_models(config_path, json),
        Command::Switch { model } => cmd_switch(config_path, &model),
        Command::Link { command } => match command {
            LinkCommand::Create { target, link } => cmd_link_create(&target, &link),
            LinkCommand::Check { link } => cmd_link_check(&link, json),
        },
        Command::Version => {
            println!("AI Tools Manager v{}", VERSION);
            Ok(())
        }
    }
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    Config::load(config_path).context("Failed to load configuration")
}

/// Where `init` and `switch` write the config
fn target_config_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path().ok_or_else(|| eyre::Report::new(ai_manager::Error::NoHomeDir)),
    }
}

/// Discover tools and report presence, health and usage
fn cmd_scan(config_path: Option<&Path>, tool: Option<&str>, detailed: bool, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let scanner = Scanner::new(&config);

    let result = match tool {
        Some(key) => scanner.scan_tool(key)?,
        None => scanner.scan(),
    };

    if json {
        println!("{}", to_json(&result)?);
    } else {
        print!("{}", render::render_scan(&result, detailed));
    }
    Ok(())
}

/// Delete aged temp files for one or all enabled tools
fn cmd_cleanup(
    config_path: Option<&Path>,
    days: Option<u32>,
    tool: Option<&str>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let mut cleaner = Cleaner::new(&config).dry_run(dry_run);
    if let Some(days) = days {
        info!("Overriding retention windows: {} days", days);
        cleaner = cleaner.with_days(days);
    }

    let results = match tool {
        Some(key) => vec![cleaner.cleanup_tool(key)?],
        None => cleaner.cleanup_all(),
    };

    if json {
        println!("{}", to_json(&results)?);
    } else {
        print!("{}", render::render_cleanup(&results));
    }
    Ok(())
}

/// Health check; exits non-zero when issues are found
fn cmd_check(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let report = health::check(&config);

    if json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render::render_health(&report));
    }

    if !report.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_stats(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let stats = Scanner::new(&config).stats();

    if json {
        println!("{}", to_json(&stats)?);
    } else {
        print!("{}", render::render_stats(&stats));
    }
    Ok(())
}

fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = target_config_path(config_path)?;
    Config::create_default(&path, force).context("Failed to write default config")?;
    println!("{} Wrote default config: {}", "✓".green(), path.display());
    Ok(())
}

fn cmd_config(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    if json {
        println!("{}", to_json(&config)?);
    } else {
        print!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(())
}

fn cmd_models(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    if json {
        let value = serde_json::json!({
            "default": config.defaults.model,
            "models": config.models,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render::render_models(&config));
    }
    Ok(())
}

/// Make a model the default and persist the config
fn cmd_switch(config_path: Option<&Path>, model: &str) -> Result<()> {
    let path = target_config_path(config_path)?;
    let mut config = load_config(config_path)?;

    config.switch_model(model)?;
    config.save(&path).context("Failed to save configuration")?;

    let name = config.model(model).map(|m| m.name.clone()).unwrap_or_default();
    println!("{} Default model: {} ({})", "✓".green(), model.cyan(), name);
    Ok(())
}

fn cmd_link_create(target: &str, link: &str) -> Result<()> {
    let target = expand_path(target);
    let link = expand_path(link);

    fsutil::create_symlink(&target, &link)
        .with_context(|| format!("Failed to link {} -> {}", link.display(), target.display()))?;
    println!("{} {} -> {}", "✓".green(), link.display(), target.display());
    Ok(())
}

/// Verify a symlink; exits non-zero when it is broken
fn cmd_link_check(link: &str, json: bool) -> Result<()> {
    let link = expand_path(link);
    let (valid, target) = fsutil::check_symlink(&link)?;

    if json {
        let value = serde_json::json!({
            "link": link,
            "target": target,
            "valid": valid,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if valid {
        println!("{} {} -> {}", "✓".green(), link.display(), target.display());
    } else {
        println!("{} {} -> {} (target missing)", "✗".red(), link.display(), target.display());
    }

    if !valid {
        std::process::exit(1);
    }
    Ok(())
}
