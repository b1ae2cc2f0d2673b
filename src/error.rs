use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::level_export::ExportError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EditorError::Io { path: path.into(), source }
    }

    /// True for the "needs a start and an end" gate, which is shown to the
    /// user as a blocking message rather than logged as a failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, EditorError::Export(ExportError::MissingMarkers { .. }))
    }
}
