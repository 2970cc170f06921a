use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the vision engine itself.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VisionError {
    /// Both calibration clicks landed on the same pixel row, so no scale exists.
    #[error("degenerate calibration: base and top were both marked on row {row}")]
    DegenerateCalibration { row: i32 },
}

/// Errors raised while playing a cue. These never leave the background task
/// that plays the cue; they are only logged.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("cue asset not found: {}", path.display())]
    MissingAsset { path: PathBuf },
    #[error("could not decode cue asset {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("audio output failed: {reason}")]
    Output { reason: String },
}
