//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use zdx_list::ListConfig;

use crate::app::App;
use crate::runtime::Runtime;
use crate::{logging, paths, transcript};

#[derive(Parser, Debug)]
#[command(name = "zdx-pager")]
#[command(version)]
#[command(about = "Scroll, select and copy from a chat transcript")]
struct Cli {
    /// Transcript to view (JSONL, one {"role", "text"} object per line)
    file: PathBuf,

    /// Config file (default: $ZDX_HOME/pager.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Blank lines between messages (overrides the config file)
    #[arg(long, value_name = "N")]
    gap: Option<usize>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.or_else(paths::config_path) {
        Some(path) => ListConfig::load_from(&path)?,
        None => ListConfig::default(),
    };
    if let Some(gap) = cli.gap {
        config.gap = gap;
    }

    // Load before touching the terminal so errors print normally.
    let entries = transcript::load(&cli.file)?;

    let _log_guard = paths::zdx_home().and_then(|home| match logging::init(&home) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    });
    tracing::debug!(entries = entries.len(), file = %cli.file.display(), "loaded transcript");

    let app = App::new(&entries, &config);
    let mut runtime = Runtime::new(app).context("Failed to start pager")?;
    runtime.run()
}
