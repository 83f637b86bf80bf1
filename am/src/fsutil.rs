//! Small filesystem helpers: parent directories and symlinks

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths::expand_path;

/// Create the parent directory of `path` if it is missing
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// True when `path` itself is a symbolic link
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Target of the symbolic link at `path`
pub fn read_symlink(path: &Path) -> Result<PathBuf> {
    Ok(fs::read_link(path)?)
}

/// Point `link` at `target`, replacing whatever entry `link` names
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        if link.is_dir() && !is_symlink(link) {
            fs::remove_dir(link)?;
        } else {
            fs::remove_file(link)?;
        }
    }
    ensure_parent_dir(link)?;
    symlink(target, link)?;
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "symlinks are not supported on this platform"))
}

/// Whether the link at `path` resolves, along with its raw target
///
/// Targets may use `~` and `$VAR`; relative targets resolve against the
/// link's own directory.
pub fn check_symlink(path: &Path) -> Result<(bool, PathBuf)> {
    if !is_symlink(path) {
        return Err(Error::NotASymlink {
            path: path.to_path_buf(),
        });
    }

    let target = read_symlink(path)?;
    let expanded = expand_path(&target.to_string_lossy());
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        path.parent().unwrap_or_else(|| Path::new(".")).join(expanded)
    };

    Ok((resolved.exists(), target))
}

/// True when the directory has no entries
pub fn is_dir_empty(path: &Path) -> Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_parent_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a").join("b").join("config.yaml");

        ensure_parent_dir(&file).unwrap();
        assert!(temp.path().join("a/b").is_dir());

        // bare file names have nothing to create
        ensure_parent_dir(Path::new("config.yaml")).unwrap();
    }

    #[test]
    fn test_is_dir_empty() {
        let temp = TempDir::new().unwrap();
        assert!(is_dir_empty(temp.path()).unwrap());

        fs::write(temp.path().join("f"), "x").unwrap();
        assert!(!is_dir_empty(temp.path()).unwrap());

        assert!(is_dir_empty(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_check_symlink_rejects_regular_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        fs::write(&file, "x").unwrap();

        assert!(!is_symlink(&file));
        assert!(matches!(check_symlink(&file), Err(Error::NotASymlink { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_create_and_check_symlink() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("settings.json");
        fs::write(&target, "{}").unwrap();
        let link = temp.path().join("links").join("settings.json");

        create_symlink(&target, &link).unwrap();
        assert!(is_symlink(&link));
        assert_eq!(read_symlink(&link).unwrap(), target);

        let (valid, raw) = check_symlink(&link).unwrap();
        assert!(valid);
        assert_eq!(raw, target);
    }

    #[cfg(unix)]
    #[test]
    fn test_create_symlink_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();
        let link = temp.path().join("link");

        create_symlink(&first, &link).unwrap();
        create_symlink(&second, &link).unwrap();

        assert_eq!(fs::read_to_string(&link).unwrap(), "2");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("gone"), &link).unwrap();

        let (valid, _) = check_symlink(&link).unwrap();
        assert!(!valid);
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_symlink_resolves_from_link_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("real"), "x").unwrap();
        let link = temp.path().join("rel");
        std::os::unix::fs::symlink("real", &link).unwrap();

        let (valid, raw) = check_symlink(&link).unwrap();
        assert!(valid);
        assert_eq!(raw, PathBuf::from("real"));
    }
}
