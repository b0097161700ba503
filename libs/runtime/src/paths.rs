//! Home directory resolution for `server.home_dir`.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot expand '~': {0} is not set")]
    NoHome(&'static str),
    #[error("cannot determine the current directory")]
    CurrentDir(#[source] std::io::Error),
    #[error("failed to create home directory '{path}'")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(target_os = "windows")]
const HOME_VAR: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const HOME_VAR: &str = "HOME";

fn platform_home() -> Result<PathBuf, HomeDirError> {
    std::env::var_os(HOME_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::NoHome(HOME_VAR))
}

fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    match raw.strip_prefix('~') {
        Some("") => platform_home(),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => {
            Ok(platform_home()?.join(&rest[1..]))
        }
        _ => Ok(PathBuf::from(raw)),
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, HomeDirError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
    Ok(cwd.join(path))
}

/// Resolve the server home directory to an absolute path.
///
/// `None` (or blank) means `<platform home>/<default_subdir>`, where the
/// platform home is `%APPDATA%` on Windows and `$HOME` elsewhere. A leading
/// `~` expands the same way; relative paths resolve against the working
/// directory. With `create`, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let raw = configured.filter(|s| !s.trim().is_empty());
    let path = match raw {
        Some(raw) => absolutize(expand_tilde(raw.trim())?)?,
        None => platform_home()?.join(default_subdir),
    };
    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), HomeDirError> {
    std::fs::create_dir_all(path).map_err(|source| HomeDirError::Create {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_paths_are_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a/b");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().into_owned()), ".x", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_paths_become_absolute() {
        let resolved = resolve_home_dir(Some("some/rel".into()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel"));
    }

    #[test]
    fn tilde_only_expands_at_the_start() {
        assert_eq!(expand_tilde("a/~b").unwrap(), PathBuf::from("a/~b"));
        assert_eq!(expand_tilde("~user").unwrap(), PathBuf::from("~user"));
    }
}
