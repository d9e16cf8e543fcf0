//! List configuration.
//!
//! Loaded from a TOML file; every field is optional and falls back to the
//! defaults below.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Blank lines between items.
    pub gap: usize,
    /// Lines scrolled per mouse wheel notch.
    pub wheel_lines: usize,
    /// Speed up sustained wheel scrolling.
    pub wheel_acceleration: bool,
    /// Draw a scrollbar next to the list.
    pub show_scrollbar: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            gap: Self::DEFAULT_GAP,
            wheel_lines: Self::DEFAULT_WHEEL_LINES,
            wheel_acceleration: true,
            show_scrollbar: true,
        }
    }
}

impl ListConfig {
    const DEFAULT_GAP: usize = 1;
    const DEFAULT_WHEEL_LINES: usize = 3;

    /// Loads configuration from `path`.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
