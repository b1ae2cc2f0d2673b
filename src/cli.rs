//! Command-line arguments and the headless build mode.
//!
//! ```text
//! cantedit                              open the editor
//! cantedit --open grid-data.txt         open the editor with a saved grid
//! cantedit build grid-data.txt -o level1.json
//! ```
//!
//! `build` never opens a window.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::error::EditorError;
use crate::grid::GridState;
use crate::grid_file;
use crate::level_export::{self, LevelDocument, LEVEL_FILE_NAME};

/// Tile level editor for the platformer.
#[derive(Parser, Debug)]
#[command(name = "cantedit", about = "Tile level editor: paint a 30x30 grid and export level1.json")]
pub struct CliArgs {
    /// Brush and tool definitions.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, value_name = "FILE")]
    pub config: PathBuf,

    /// Saved grid to load on startup.
    #[arg(short, long, value_name = "FILE")]
    pub open: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a saved grid into a level document without opening a window.
    Build {
        /// Grid saved by the editor (grid-data.txt).
        save: PathBuf,

        /// Where to write the level document.
        #[arg(short, long, default_value = LEVEL_FILE_NAME, value_name = "FILE")]
        output: PathBuf,
    },
}

pub fn run_build(save: &Path, output: &Path) -> Result<LevelDocument, EditorError> {
    let mut grid = GridState::new();
    let summary = grid_file::load_from_file(&mut grid, save).map_err(|e| EditorError::io(save, e))?;
    if !summary.warnings.is_empty() {
        log::warn!("{} had {} warnings", save.display(), summary.warnings.len());
    }
    Ok(level_export::export_level(&grid, output)?)
}
