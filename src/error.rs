use std::io;
use std::path::PathBuf;

use crate::obstacles::ObstacleId;

/// Errors that end a run.
///
/// A task finishing its routine is not an error; it returns `Step::Done`.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Terminal or asset I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A frame category matched no assets.
    #[error("no frames found for category `{category}` in {source_name}")]
    NoFrames { category: String, source_name: String },

    /// The frames directory could not be read.
    #[error("failed to read frames directory {}: {error}", .path.display())]
    FramesDir { path: PathBuf, error: io::Error },

    /// The registry was asked about an obstacle it does not own.
    #[error("obstacle {0} is not registered")]
    UnknownObstacle(ObstacleId),

    /// The terminal cannot fit the playfield.
    #[error("terminal too small: {columns}x{rows}, need at least {min_columns}x{min_rows}")]
    TerminalTooSmall {
        columns: u16,
        rows: u16,
        min_columns: u16,
        min_rows: u16,
    },

    /// A command-line argument could not be parsed.
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
