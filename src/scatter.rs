//! Decorative placement of unplaced tiles in the staging area.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ScatterConfig;

/// Largest offset from the staging area centre, in percent.
pub const MAX_OFFSET_RANGE: f32 = 40.0;

/// Largest decorative rotation, in degrees.
pub const MAX_ROTATION_RANGE: f32 = 20.0;

/// Where an unplaced tile is drawn in the staging area. None of this affects whether the puzzle
/// is solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPosition {
    /// Horizontal offset from the staging area centre, in percent of its width.
    pub offset_x: f32,
    /// Vertical offset from the staging area centre, in percent of its height.
    pub offset_y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
}

/// Produces staging layouts. Layouts are reproducible from a seed; without one a fresh seed is
/// drawn from the thread rng.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterLayoutGenerator {
    config: ScatterConfig,
}

impl ScatterLayoutGenerator {
    /// A generator using the given ranges.
    pub fn new(config: ScatterConfig) -> Self {
        Self { config }
    }

    /// One position per tile. Positions may overlap. Ranges outside `0..=MAX_*_RANGE` are
    /// clamped, and NaN counts as zero.
    pub fn generate(&self, count: usize, seed: Option<u64>) -> Vec<ScatterPosition> {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let offset = clamp_range(self.config.offset_range, MAX_OFFSET_RANGE);
        let rotation = clamp_range(self.config.rotation_range, MAX_ROTATION_RANGE);
        (0..count)
            .map(|_| ScatterPosition {
                offset_x: rng.random_range(-offset..=offset),
                offset_y: rng.random_range(-offset..=offset),
                rotation: rng.random_range(-rotation..=rotation),
            })
            .collect()
    }
}

fn clamp_range(range: f32, max: f32) -> f32 {
    if range.is_nan() {
        0.0
    } else {
        range.clamp(0.0, max)
    }
}
