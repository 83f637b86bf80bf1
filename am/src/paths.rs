//! Path expansion for tool locations
//!
//! Tool paths in the config may start with `~` and may reference environment
//! variables as `$VAR` or `${VAR}`. Unset variables expand to the empty string.

use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\{([^}]*)\}|([A-Za-z_][A-Za-z0-9_]*))").expect("valid env var pattern"));

/// The current user's home directory, if known
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expand a leading `~` and environment variables using the process environment
pub fn expand_path(path: &str) -> PathBuf {
    expand_with(path, home_dir().as_deref(), |name| std::env::var(name).ok())
}

/// Expand `path` against an explicit home directory and variable lookup
///
/// The tilde is only honoured as `~` or `~/...`; `~user` forms are left alone.
/// Without a home directory the tilde stays in place.
pub fn expand_with<F>(path: &str, home: Option<&Path>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(home) = home {
        if path == "~" {
            return home.to_path_buf();
        }
        if let Some(rest) = path.strip_prefix("~/") {
            let rest = expand_env(rest, &lookup);
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                return home.to_path_buf();
            }
            return home.join(rest);
        }
    }

    PathBuf::from(expand_env(path, &lookup))
}

fn expand_env<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VAR
        .replace_all(input, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or("");
            if name.is_empty() {
                return String::new();
            }
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}

/// Resolve a path that is relative to `base` unless it expands to an absolute path
pub fn resolve_under(base: &Path, rel: &str) -> PathBuf {
    let expanded = expand_path(rel);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vars(_: &str) -> Option<String> {
        None
    }

    fn vars(name: &str) -> Option<String> {
        match name {
            "XDG_CONFIG_HOME" => Some("/home/ada/.config".to_string()),
            "TOOL" => Some("gemini".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_tilde_prefix() {
        let home = Path::new("/home/ada");
        assert_eq!(
            expand_with("~/.claude", Some(home), no_vars),
            PathBuf::from("/home/ada/.claude")
        );
    }

    #[test]
    fn test_expand_bare_tilde() {
        let home = Path::new("/home/ada");
        assert_eq!(expand_with("~", Some(home), no_vars), PathBuf::from("/home/ada"));
        assert_eq!(expand_with("~/", Some(home), no_vars), PathBuf::from("/home/ada"));
    }

    #[test]
    fn test_tilde_kept_without_home() {
        assert_eq!(expand_with("~/.claude", None, no_vars), PathBuf::from("~/.claude"));
    }

    #[test]
    fn test_tilde_user_form_untouched() {
        let home = Path::new("/home/ada");
        assert_eq!(expand_with("~bob/x", Some(home), no_vars), PathBuf::from("~bob/x"));
    }

    #[test]
    fn test_expand_env_vars() {
        assert_eq!(
            expand_with("$XDG_CONFIG_HOME/opencode", None, vars),
            PathBuf::from("/home/ada/.config/opencode")
        );
        assert_eq!(
            expand_with("${XDG_CONFIG_HOME}/${TOOL}", None, vars),
            PathBuf::from("/home/ada/.config/gemini")
        );
    }

    #[test]
    fn test_unset_var_expands_empty() {
        assert_eq!(expand_with("/opt/$MISSING/bin", None, vars), PathBuf::from("/opt//bin"));
    }

    #[test]
    fn test_env_after_tilde() {
        let home = Path::new("/home/ada");
        assert_eq!(
            expand_with("~/.$TOOL", Some(home), vars),
            PathBuf::from("/home/ada/.gemini")
        );
    }

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(
            expand_with("relative/dir", None, no_vars),
            PathBuf::from("relative/dir")
        );
    }

    #[test]
    fn test_resolve_under_relative() {
        let base = Path::new("/srv/tool");
        assert_eq!(resolve_under(base, "settings.json"), PathBuf::from("/srv/tool/settings.json"));
    }

    #[test]
    fn test_resolve_under_absolute() {
        let base = Path::new("/srv/tool");
        assert_eq!(resolve_under(base, "/etc/tool.json"), PathBuf::from("/etc/tool.json"));
    }
}
