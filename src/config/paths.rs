//! Default path helpers and symlink checks.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{APP_DIR, CONFIG_ENV};

/// Config file path: `$CPMOVE_CONFIG` if set, else the OS config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(p));
    }
    match config_dir() {
        Some(base) => Some(base.join(APP_DIR).join("config.xml")),
        None => env::var_os("HOME").map(|h| PathBuf::from(h).join(".config").join(APP_DIR).join("config.xml")),
    }
}

/// Suggested log file location under the OS data dir.
pub fn default_log_path() -> Option<PathBuf> {
    match data_dir() {
        Some(base) => Some(base.join(APP_DIR).join("cpmove.log")),
        None => env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join(APP_DIR)
                .join("cpmove.log")
        }),
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        if let Ok(meta) = fs::symlink_metadata(anc)
            && meta.file_type().is_symlink()
        {
            return Ok(true);
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempfile::tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(path_has_symlink_ancestor(&link.join("cpmove.log")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("cpmove.log")).unwrap());
    }
}
