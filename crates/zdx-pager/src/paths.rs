//! Pager file locations.
//!
//! ZDX_HOME resolution order:
//! 1. `ZDX_HOME` environment variable (if set)
//! 2. `~/.config/zdx`

use std::path::PathBuf;

const CONFIG_FILE: &str = "pager.toml";

/// Returns the ZDX home directory, or `None` if no home directory is known.
pub fn zdx_home() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("ZDX_HOME") {
        return Some(PathBuf::from(home));
    }
    dirs::home_dir().map(|home| home.join(".config").join("zdx"))
}

/// Default location of the pager config file.
pub fn config_path() -> Option<PathBuf> {
    zdx_home().map(|home| home.join(CONFIG_FILE))
}
