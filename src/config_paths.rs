//! Centralized paths for leaderkey
//!
//! The rc file lives directly in the config directory:
//! - `$LEADERKEY_CONFIG_DIR/.leaderkeyrc.yaml` when the variable is set
//! - `~/.leaderkeyrc.yaml` otherwise
//!
//! Logs go to the platform's local data directory
//! (`~/.local/share/leaderkey/logs` on Linux).

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::keymap::RC_FILE_NAME;

const APP_DIR: &str = "leaderkey";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "LEADERKEY_CONFIG_DIR";

/// Directory holding the rc file
pub fn config_dir() -> Option<PathBuf> {
    env::var_os(CONFIG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// `~/.leaderkeyrc.yaml`
pub fn rc_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(RC_FILE_NAME))
}

/// `~/.local/share/leaderkey/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No data directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
