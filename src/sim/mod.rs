//! Game logic module
//!
//! Placement and round rules live here. This module is platform independent:
//! - Randomness comes from an injected `rand::Rng`
//! - Time comes from the caller (milliseconds)
//! - Feedback goes through the `Feedback` trait
//! - No DOM or audio dependencies

pub mod placement;
pub mod round;
pub mod shape;
pub mod state;

pub use placement::{Bounds, Placement, PlacementConfig, is_clear, place, place_all};
pub use round::{Round, RoundConfig};
pub use shape::{PALETTE, Shape, ShapeKind, random_color};
pub use state::{PendingRemoval, RoundPhase, RoundState};
