// crates/loopdesk-core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Why a chosen file never reaches the player.
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("Please select a valid video file (.mp4, .mov, etc.).")]
    NotVideo { path: PathBuf, mime: Option<&'static str> },

    #[error("File not found: {0}")]
    Missing(PathBuf),
}
