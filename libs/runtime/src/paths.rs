//! Home directory resolution for the server's working files (logs, SQLite).

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Platform base for the default home: `$HOME` on Unix/macOS, `%APPDATA%` on Windows.
fn platform_base() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "windows"))]
    let base = dirs::home_dir();

    base.ok_or_else(|| anyhow!("cannot determine the user home directory"))
}

/// Expand a leading `~` and make the path absolute against the current directory.
fn expand(raw: &str) -> Result<PathBuf> {
    let path = if raw == "~" {
        dirs::home_dir().ok_or_else(|| anyhow!("cannot expand '~': no home directory"))?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        dirs::home_dir()
            .ok_or_else(|| anyhow!("cannot expand '~': no home directory"))?
            .join(rest)
    } else {
        PathBuf::from(raw)
    };

    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = std::env::current_dir().context("cannot read current directory")?;
        Ok(cwd.join(path))
    }
}

/// Resolve the server home directory.
///
/// `None` selects `<platform base>/<default_subdir>`. With `create`, the
/// directory (and its parents) is created.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match configured {
        Some(raw) => expand(raw.trim())?,
        None => platform_base()?.join(default_subdir),
    };

    if create {
        ensure_dir(&resolved)?;
    }
    Ok(resolved)
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("cannot create directory {}", path.display()))
}
