//! A library implementing the engine of a tile jigsaw: an image is cut into a square grid of
//! tiles, the tiles are scattered in a staging area, and the player drops them onto a target grid
//! until every tile is in its home cell.
//!
//! Rendering, input handling and audio playback belong to the host application. The engine takes
//! moves and timer ticks, and hands back read-only [`SessionView`](engine::SessionView)s.

#![deny(missing_docs)]

pub mod config;
pub mod coord;
pub mod drop_target;
pub mod engine;
pub mod error;
pub mod moves;
pub mod partition;
pub mod placement;
pub mod prefs;
pub mod scatter;

pub use engine::{EngineState, PuzzleEngine, SessionView};
pub use error::{PuzzleError, Result};
