//! This module defines the error types used throughout the crate.

use thiserror::Error;

use crate::engine::EngineState;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, PuzzleError>;

/// Every way a puzzle operation can fail.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The source image could not be fetched or decoded. Retrying with the same or another image
    /// is allowed.
    #[error("failed to load image: {0}")]
    ImageLoad(String),
    /// A tile surface could not be created, e.g. because the image is smaller than the grid.
    #[error("cannot create a {width}x{height} tile surface")]
    CanvasUnavailable {
        /// requested tile width in pixels
        width: u32,
        /// requested tile height in pixels
        height: u32,
    },
    /// A move referenced a tile that is not part of the current session.
    #[error("no tile with id {0} in this session")]
    UnknownTile(usize),
    /// A move targeted a cell outside the grid.
    #[error("cell {0} is outside the grid")]
    CellOutOfRange(usize),
    /// The difficulty is not a perfect square of at least 4, or is not allowed by the
    /// configuration.
    #[error("invalid difficulty {0}: must be a perfect square of at least 4")]
    InvalidDifficulty(u32),
    /// The engine does not accept moves in its current state.
    #[error("engine is not accepting moves while {0:?}")]
    NotActive(EngineState),
    /// A load was superseded by a newer `begin_load` call and its result was discarded.
    #[error("load was superseded by a newer one")]
    StaleLoad,
    /// An uploaded image was rejected before decoding finished.
    #[error("upload rejected: {0}")]
    Upload(#[from] UploadRejection),
    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Reasons an uploaded image is refused by [`prepare_upload`](crate::partition::prepare_upload).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    /// The payload exceeds the configured byte limit.
    #[error("image is {size} bytes, the limit is {limit}")]
    TooLarge {
        /// payload size
        size: usize,
        /// configured limit
        limit: usize,
    },
    /// The payload is not in a recognised image format.
    #[error("not a supported image file")]
    NotAnImage,
    /// The decoded image is smaller than the configured minimum on some side.
    #[error("image is {width}x{height}, at least {min}x{min} is required")]
    TooSmall {
        /// decoded width
        width: u32,
        /// decoded height
        height: u32,
        /// configured minimum side length
        min: u32,
    },
}

impl From<image::ImageError> for PuzzleError {
    fn from(err: image::ImageError) -> Self {
        PuzzleError::ImageLoad(err.to_string())
    }
}

impl From<toml::de::Error> for PuzzleError {
    fn from(err: toml::de::Error) -> Self {
        PuzzleError::Config(err.to_string())
    }
}
