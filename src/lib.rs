//! Shape Counter - pop the shapes, hear the count
//!
//! Core modules:
//! - `sim`: Placement engine and round state machine (platform independent)
//! - `feedback`: Sound/speech feedback service trait and implementations
//! - `audio`: Web Audio "pop" synthesis
//! - `speech`: Web Speech number announcements
//! - `settings`: Persisted preferences and round tuning
//! - `render`: Projection of round state onto DOM classes and styles

pub mod audio;
pub mod feedback;
pub mod render;
pub mod settings;
pub mod sim;
pub mod speech;

pub use feedback::{Feedback, FeedbackEvent, Recorder, Silent};
pub use settings::{CountPreset, Settings};
pub use sim::{Round, RoundConfig, RoundPhase};

/// Game configuration constants
pub mod consts {
    /// Placement rectangle, percent of the play area
    pub const PLACEMENT_MIN_X: f32 = 20.0;
    pub const PLACEMENT_MAX_X: f32 = 80.0;
    pub const PLACEMENT_MIN_Y: f32 = 25.0;
    pub const PLACEMENT_MAX_Y: f32 = 75.0;

    /// Minimum distance between shape centers (percent). Some layouts use 40.
    pub const MIN_SEPARATION: f32 = 35.0;
    /// Rejected draws before accepting an overlapping spot. Some layouts use 100.
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;
    /// Upper limit for configured attempts; placement runs on the UI thread
    pub const PLACEMENT_ATTEMPTS_LIMIT: u32 = 1_000;

    /// Target count range for a new round (inclusive)
    pub const MIN_COUNT: u32 = 1;
    pub const MAX_COUNT: u32 = 5;

    /// Time an exploded shape stays on screen for its exit animation
    pub const REMOVAL_DELAY_MS: f64 = 500.0;

    /// Rendered shape size in CSS pixels
    pub const SHAPE_SIZE_PX: f32 = 300.0;

    /// How long to wait for speech voices before giving up on the event
    pub const VOICE_WARMUP_TIMEOUT_MS: i32 = 100;
}
