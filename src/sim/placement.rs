//! Random non-overlapping placement
//!
//! Rejection sampling with a bounded number of attempts. When the budget runs
//! out a final unchecked draw is returned, so placement always succeeds and
//! overlapping shapes are the worst case.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned placement rectangle (percent coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(
            Vec2::new(PLACEMENT_MIN_X, PLACEMENT_MIN_Y),
            Vec2::new(PLACEMENT_MAX_X, PLACEMENT_MAX_Y),
        )
    }
}

impl Bounds {
    /// Build from two corners in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Draw a point uniformly from the rectangle
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let t = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        // Clamp guards against rounding past max on wide ranges
        (self.min + self.size() * t).clamp(self.min, self.max)
    }
}

/// Parameters for [`place`] and [`place_all`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub bounds: Bounds,
    /// Minimum distance between shape centers
    pub min_separation: f32,
    /// Rejected draws allowed before falling back
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            min_separation: MIN_SEPARATION,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Result of a single placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    /// Number of candidates drawn, including the fallback draw
    pub attempts: u32,
    /// True when the position was taken without checking separation
    pub fallback: bool,
}

/// Is `p` at least `min_separation` away from every existing center?
pub fn is_clear(p: Vec2, existing: &[Vec2], min_separation: f32) -> bool {
    existing
        .iter()
        .all(|other| p.distance(*other) >= min_separation)
}

/// Find a position for one shape, avoiding `existing`
pub fn place<R: Rng + ?Sized>(
    existing: &[Vec2],
    config: &PlacementConfig,
    rng: &mut R,
) -> Placement {
    for attempt in 1..=config.max_attempts {
        let candidate = config.bounds.sample(rng);
        if is_clear(candidate, existing, config.min_separation) {
            return Placement {
                position: candidate,
                attempts: attempt,
                fallback: false,
            };
        }
    }

    Placement {
        position: config.bounds.sample(rng),
        attempts: config.max_attempts.saturating_add(1),
        fallback: true,
    }
}

/// Place `count` shapes, each one avoiding the shapes placed before it
pub fn place_all<R: Rng + ?Sized>(
    count: usize,
    config: &PlacementConfig,
    rng: &mut R,
) -> Vec<Vec2> {
    let mut positions = Vec::with_capacity(count);
    for i in 0..count {
        let placement = place(&positions, config, rng);
        if placement.fallback {
            log::debug!(
                "Shape {}/{} placed without separation after {} attempts",
                i + 1,
                count,
                config.max_attempts
            );
        }
        positions.push(placement.position);
    }
    positions
}
