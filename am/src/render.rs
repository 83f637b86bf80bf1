//! Text and JSON rendering of reports

use colored::*;
use serde::Serialize;

use crate::cleanup::CleanupResult;
use crate::config::Config;
use crate::discovery::{ScanResult, StatsReport, ToolStatus};
use crate::health::HealthReport;

/// Human readable byte count using binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    let unit = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}B", bytes as f64 / div as f64, unit)
}

/// Pretty JSON for any report
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn status_glyph(status: ToolStatus) -> ColoredString {
    match status {
        ToolStatus::Ok => "✓".green(),
        ToolStatus::Warning => "⚠".yellow(),
        ToolStatus::Error | ToolStatus::NotFound => "✗".red(),
    }
}

pub fn render_scan(result: &ScanResult, detailed: bool) -> String {
    let mut out = format!(
        "=== Scan Results ({} tools found, {} enabled) ===\n\n",
        result.total_found, result.enabled_count
    );

    for tool in &result.tools {
        out.push_str(&format!("{} [{}]\n", status_glyph(tool.status), tool.name.bold()));

        if !tool.found {
            out.push_str(&format!("  Not found on system ({})\n\n", tool.path.display()));
            continue;
        }

        out.push_str(&format!("  Path: {}\n", tool.path.display()));
        if tool.status == ToolStatus::Error {
            out.push_str(&format!("  {}\n", "Could not read tool directory".red()));
        }
        if detailed {
            if let Some(config_path) = &tool.config_path {
                out.push_str(&format!("  Config: {}\n", config_path.display()));
            }
            if let Some(data_path) = &tool.data_path {
                out.push_str(&format!("  Data: {}\n", data_path.display()));
            }
            out.push_str(&format!(
                "  Disk: {} ({} files)\n",
                format_bytes(tool.disk_usage.size_bytes),
                tool.disk_usage.files
            ));
            if let Some(last_used) = tool.last_used {
                out.push_str(&format!("  Last used: {}\n", last_used.format("%Y-%m-%d %H:%M UTC")));
            }
        }
        out.push('\n');
    }

    out
}

/// One line per tool result
pub fn format_cleanup_result(result: &CleanupResult) -> String {
    if let Some(error) = &result.error
        && result.paths_cleaned.is_empty()
    {
        return format!("{} {}: {}", "[Error]".red(), result.tool, error);
    }

    let (tag, verb) = if result.dry_run {
        ("[Dry run]".yellow(), "would be freed")
    } else {
        ("[Done]".green(), "freed")
    };
    let mut line = format!(
        "{} {}: {} {}, {} files {}",
        tag,
        result.tool,
        format_bytes(result.space_freed),
        verb,
        result.files_deleted,
        if result.dry_run { "eligible" } else { "deleted" }
    );
    if result.errors > 0 {
        line.push_str(&format!(" ({} skipped)", result.errors));
    }
    if let Some(error) = &result.error {
        line.push_str(&format!(" [{}]", error.yellow()));
    }
    line
}

pub fn render_cleanup(results: &[CleanupResult]) -> String {
    let mut out = String::from("=== Cleanup Results ===\n");

    let mut total_freed = 0u64;
    let mut total_deleted = 0u64;
    for result in results {
        out.push_str(&format_cleanup_result(result));
        out.push('\n');
        total_freed += result.space_freed;
        total_deleted += result.files_deleted;
    }

    let dry_run = results.iter().any(|r| r.dry_run);
    out.push_str(&format!(
        "\nTotal: {} files {}, {} {}\n",
        total_deleted,
        if dry_run { "eligible" } else { "deleted" },
        format_bytes(total_freed),
        if dry_run { "would be freed" } else { "freed" }
    ));
    out
}

pub fn render_health(report: &HealthReport) -> String {
    let mut out = String::from("=== AI Tools Health Check ===\n\n");

    for tool in &report.tools {
        out.push_str(&format!("[{}]\n", tool.name.bold()));

        if let Some(link) = &tool.symlink {
            if link.valid {
                out.push_str(&format!("  {} Symlink: {}\n", "✓".green(), link.target.display()));
            } else {
                out.push_str(&format!("  {} Broken symlink: {}\n", "✗".red(), link.target.display()));
            }
        }

        if !tool.path_exists {
            out.push_str(&format!("  {} Tool path not found: {}\n\n", "✗".red(), tool.path.display()));
            continue;
        }
        out.push_str(&format!("  {} Path exists: {}\n", "✓".green(), tool.path.display()));

        if let Some(config_path) = &tool.config_path {
            if tool.config_exists {
                out.push_str(&format!("  {} Config file found: {}\n", "✓".green(), config_path.display()));
            } else {
                out.push_str(&format!("  {} Config file missing: {}\n", "⚠".yellow(), config_path.display()));
            }
        }
        out.push('\n');
    }

    if report.is_healthy() {
        out.push_str(&format!("{}\n", "All tools are healthy!".green()));
    } else {
        out.push_str(&format!("Found {} issue(s)\n", report.issues));
    }
    out
}

pub fn render_stats(stats: &StatsReport) -> String {
    let mut out = String::from("=== AI Tools Disk Usage ===\n\n");

    for tool in &stats.tools {
        out.push_str(&format!("[{}]\n", tool.name.bold()));
        out.push_str(&format!("  Path: {}\n", tool.usage.path.display()));
        if tool.found {
            out.push_str(&format!(
                "  Size: {} ({} files)\n\n",
                format_bytes(tool.usage.size_bytes),
                tool.usage.files
            ));
        } else {
            out.push_str("  Not found on system\n\n");
        }
    }

    out.push_str(&format!(
        "Total: {} ({} files across {} tools)\n",
        format_bytes(stats.total_bytes),
        stats.total_files,
        stats.tool_count
    ));
    out
}

pub fn render_models(config: &Config) -> String {
    let mut out = String::from("=== Models ===\n\n");

    for (key, model) in &config.models {
        let marker = if *key == config.defaults.model {
            "*".green().bold()
        } else {
            " ".normal()
        };
        out.push_str(&format!("{} {} ({})\n", marker, key.cyan(), model.name));
        out.push_str(&format!("    Provider: {}\n", model.provider));
        out.push_str(&format!("    Endpoint: {}\n", model.api_endpoint));
        out.push_str(&format!("    Model ID: {}\n", model.model_id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ToolInfo;
    use crate::walk::DiskUsage;
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(format_bytes(u64::MAX), "16.0 EB");
    }

    #[test]
    fn test_cleanup_line_reports_full_count() {
        plain();
        let result = CleanupResult {
            tool: "Claude Code".to_string(),
            files_deleted: 12,
            space_freed: 2048,
            ..Default::default()
        };
        assert_eq!(
            format_cleanup_result(&result),
            "[Done] Claude Code: 2.0 KB freed, 12 files deleted"
        );
    }

    #[test]
    fn test_cleanup_line_dry_run() {
        plain();
        let result = CleanupResult {
            tool: "Gemini CLI".to_string(),
            files_deleted: 1,
            space_freed: 10,
            dry_run: true,
            ..Default::default()
        };
        let line = format_cleanup_result(&result);
        assert!(line.starts_with("[Dry run]"));
        assert!(line.contains("would be freed"));
    }

    #[test]
    fn test_cleanup_line_error() {
        plain();
        let result = CleanupResult {
            tool: "OpenCode".to_string(),
            error: Some("Cannot read /x".to_string()),
            ..Default::default()
        };
        assert_eq!(format_cleanup_result(&result), "[Error] OpenCode: Cannot read /x");
    }

    #[test]
    fn test_cleanup_line_skipped_and_refused() {
        plain();
        let result = CleanupResult {
            tool: "Claude Code".to_string(),
            paths_cleaned: vec![PathBuf::from("/t/debug")],
            files_deleted: 3,
            space_freed: 30,
            errors: 2,
            error: Some("Refused temp path /t/link: symlink".to_string()),
            ..Default::default()
        };
        assert_eq!(
            format_cleanup_result(&result),
            "[Done] Claude Code: 30 B freed, 3 files deleted (2 skipped) [Refused temp path /t/link: symlink]"
        );
    }

    #[test]
    fn test_render_health_missing_path() {
        plain();
        let report = HealthReport {
            tools: vec![crate::health::ToolHealth {
                key: "t".to_string(),
                name: "T".to_string(),
                path: PathBuf::from("/nowhere"),
                path_exists: false,
                config_path: None,
                config_exists: false,
                symlink: None,
                issues: vec!["Tool path not found: /nowhere".to_string()],
            }],
            issues: 1,
        };
        assert_eq!(
            render_health(&report),
            "=== AI Tools Health Check ===\n\n[T]\n  ✗ Tool path not found: /nowhere\n\nFound 1 issue(s)\n"
        );
    }

    #[test]
    fn test_render_cleanup_totals() {
        plain();
        let results = vec![
            CleanupResult {
                tool: "A".to_string(),
                files_deleted: 2,
                space_freed: 1024,
                ..Default::default()
            },
            CleanupResult {
                tool: "B".to_string(),
                files_deleted: 3,
                space_freed: 1024,
                ..Default::default()
            },
        ];
        let out = render_cleanup(&results);
        assert!(out.contains("Total: 5 files deleted, 2.0 KB freed"));
    }

    #[test]
    fn test_render_scan_detailed() {
        plain();
        let result = ScanResult {
            tools: vec![
                ToolInfo {
                    key: "claude".to_string(),
                    name: "Claude Code".to_string(),
                    path: PathBuf::from("/home/ada/.claude"),
                    found: true,
                    enabled: true,
                    config_path: Some(PathBuf::from("/home/ada/.claude/settings.json")),
                    data_path: None,
                    disk_usage: DiskUsage {
                        path: PathBuf::from("/home/ada/.claude"),
                        size_bytes: 2048,
                        files: 4,
                        last_modified: None,
                    },
                    last_used: None,
                    status: ToolStatus::Ok,
                },
                ToolInfo {
                    key: "gemini".to_string(),
                    name: "Gemini CLI".to_string(),
                    path: PathBuf::from("/home/ada/.gemini"),
                    found: false,
                    enabled: true,
                    config_path: None,
                    data_path: None,
                    disk_usage: DiskUsage::default(),
                    last_used: None,
                    status: ToolStatus::NotFound,
                },
            ],
            total_found: 1,
            enabled_count: 2,
            timestamp: chrono::Utc::now(),
        };

        let out = render_scan(&result, true);
        assert!(out.contains("1 tools found, 2 enabled"));
        assert!(out.contains("✓ [Claude Code]"));
        assert!(out.contains("Config: /home/ada/.claude/settings.json"));
        assert!(out.contains("Disk: 2.0 KB (4 files)"));
        assert!(out.contains("✗ [Gemini CLI]"));
        assert!(out.contains("Not found on system"));

        let brief = render_scan(&result, false);
        assert!(!brief.contains("Disk:"));
    }

    #[test]
    fn test_render_models_marks_default() {
        plain();
        let out = render_models(&Config::default());
        assert!(out.contains("* claude-sonnet-4 (Claude Sonnet 4)"));
        assert!(out.contains("  glm-4.7 (GLM-4.7)"));
    }
}
