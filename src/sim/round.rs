//! Round state machine
//!
//! Owns the round state, the random source and the feedback service. Every
//! operation runs to completion; time is passed in as milliseconds so the
//! caller decides what clock drives the removal queue.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::placement::{PlacementConfig, place_all};
use super::shape::{Shape, ShapeKind, random_color};
use super::state::{RoundPhase, RoundState};
use crate::consts::*;
use crate::feedback::Feedback;

/// Tunables for round generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Smallest target count (at least 1)
    pub min_count: u32,
    /// Largest target count (inclusive)
    pub max_count: u32,
    pub placement: PlacementConfig,
    /// Delay between a pop and the shape leaving the round
    pub removal_delay_ms: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            min_count: MIN_COUNT,
            max_count: MAX_COUNT,
            placement: PlacementConfig::default(),
            removal_delay_ms: REMOVAL_DELAY_MS,
        }
    }
}

impl RoundConfig {
    /// Inclusive target count range, ordered and starting at 1 or more
    pub fn count_range(&self) -> RangeInclusive<u32> {
        let lo = self.min_count.max(1);
        let hi = self.max_count.max(lo);
        lo..=hi
    }
}

/// The counting game's round logic
pub struct Round<F, R> {
    config: RoundConfig,
    state: RoundState,
    rng: R,
    feedback: F,
}

impl<F: Feedback, R: Rng> Round<F, R> {
    /// Create with no round started yet
    pub fn new(config: RoundConfig, rng: R, feedback: F) -> Self {
        Self {
            config,
            state: RoundState::new(),
            rng,
            feedback,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase()
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    /// Start a new round with a random target count
    pub fn start_round(&mut self) {
        let target = self.rng.random_range(self.config.count_range());
        self.start_round_with(target);
    }

    /// Start a new round with a fixed target count (at least 1)
    pub fn start_round_with(&mut self, target: u32) {
        let target = target.max(1);
        self.generate(target);
        log::info!("New round: {} {}s", target, self.kind_name());
    }

    /// Fresh shapes for the same target count
    pub fn reset_round(&mut self) {
        let target = self.state.target;
        if target == 0 {
            log::debug!("Reset ignored: no round started");
            return;
        }
        self.generate(target);
        log::info!("Round reset: {} {}s", target, self.kind_name());
    }

    /// Pop the shape with `id`.
    ///
    /// Unknown or already exploded shapes are ignored (returns `false`, no
    /// feedback). Otherwise the sound and the spoken count are emitted before
    /// returning, and the shape is scheduled to leave the round after the
    /// removal delay.
    pub fn click_shape(&mut self, id: u32, now_ms: f64) -> bool {
        let remove_at_ms = now_ms + self.config.removal_delay_ms;
        let Some(cleared) = self.state.explode(id, remove_at_ms) else {
            return false;
        };

        self.feedback.play_feedback_sound();
        self.feedback.announce_count(cleared);

        if self.state.is_complete() {
            log::info!("Round complete: {}/{}", cleared, self.state.target);
        }
        true
    }

    /// Pop a random live shape, or start a new round when none are left.
    ///
    /// Returns the popped shape's id.
    pub fn explode_random(&mut self, now_ms: f64) -> Option<u32> {
        let live = self.state.live_ids();
        if live.is_empty() {
            self.start_round();
            return None;
        }
        let id = live[self.rng.random_range(0..live.len())];
        self.click_shape(id, now_ms);
        Some(id)
    }

    /// Remove shapes whose exit delay has elapsed; returns how many left
    pub fn process_removals(&mut self, now_ms: f64) -> usize {
        self.state.remove_due(now_ms)
    }

    /// Earliest pending removal time, for scheduling a wake-up
    pub fn next_removal_ms(&self) -> Option<f64> {
        self.state
            .pending_removals()
            .iter()
            .map(|r| r.due_ms)
            .reduce(f64::min)
    }

    fn generate(&mut self, target: u32) {
        let kind = ShapeKind::random(&mut self.rng);
        let positions = place_all(target as usize, &self.config.placement, &mut self.rng);

        let mut shapes = Vec::with_capacity(positions.len());
        for pos in positions {
            let id = self.state.next_shape_id();
            let color = random_color(&mut self.rng);
            let rotation = self.rng.random_range(0.0..360.0);
            shapes.push(Shape::new(id, kind, color, pos, rotation));
        }
        self.state.populate(target, shapes);
    }

    fn kind_name(&self) -> &'static str {
        self.state
            .shapes
            .first()
            .map(|s| s.kind.as_str())
            .unwrap_or("shape")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{FeedbackEvent, Recorder};
    use crate::sim::placement::{Bounds, is_clear};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Roomy enough that five shapes never need the placement fallback
    fn roomy_config() -> RoundConfig {
        RoundConfig {
            placement: PlacementConfig {
                bounds: Bounds::new(Vec2::ZERO, Vec2::splat(100.0)),
                min_separation: 15.0,
                max_attempts: 200,
            },
            ..Default::default()
        }
    }

    fn round(seed: u64) -> Round<Recorder, Pcg32> {
        Round::new(roomy_config(), Pcg32::seed_from_u64(seed), Recorder::new())
    }

    fn ids(round: &Round<Recorder, Pcg32>) -> Vec<u32> {
        round.state().shapes.iter().map(|s| s.id).collect()
    }

    fn assert_separated(round: &Round<Recorder, Pcg32>) {
        let config = &round.config().placement;
        let positions: Vec<Vec2> = round.state().shapes.iter().map(|s| s.pos).collect();
        for (i, p) in positions.iter().enumerate() {
            assert!(config.bounds.contains(*p));
            assert!(is_clear(*p, &positions[..i], config.min_separation));
        }
    }

    #[test]
    fn test_new_round_is_empty() {
        let r = round(1);
        assert_eq!(r.phase(), RoundPhase::Empty);
        assert!(r.state().shapes.is_empty());
    }

    #[test]
    fn test_start_round_with_three() {
        let mut r = round(2);
        r.start_round_with(3);

        let state = r.state();
        assert_eq!(state.target, 3);
        assert_eq!(state.cleared, 0);
        assert_eq!(state.shapes.len(), 3);
        assert_eq!(r.phase(), RoundPhase::Active);

        // One kind per round, colors from the palette, rotation in range
        let kind = state.shapes[0].kind;
        for shape in &state.shapes {
            assert_eq!(shape.kind, kind);
            assert!(crate::sim::PALETTE.contains(&shape.color.as_str()));
            assert!((0.0..360.0).contains(&shape.rotation));
            assert!(!shape.exploded);
        }
        assert_separated(&r);
    }

    #[test]
    fn test_clear_three_shapes() {
        let mut r = round(3);
        r.start_round_with(3);

        let mut now = 0.0;
        for id in ids(&r) {
            assert!(r.click_shape(id, now));
            now += 100.0;
        }

        assert_eq!(r.state().cleared, 3);
        assert_eq!(r.phase(), RoundPhase::Complete);
        assert_eq!(r.feedback().announced(), [1, 2, 3]);

        // Exploded shapes linger for the exit animation
        assert_eq!(r.state().shapes.len(), 3);
        assert_eq!(r.process_removals(now), 0);
        assert_eq!(r.process_removals(REMOVAL_DELAY_MS + 100.0), 2);
        assert_eq!(r.process_removals(REMOVAL_DELAY_MS + 200.0), 1);
        assert!(r.state().shapes.is_empty());
        assert_eq!(r.phase(), RoundPhase::Complete);
    }

    #[test]
    fn test_click_is_idempotent() {
        let mut r = round(4);
        r.start_round_with(2);
        let id = ids(&r)[0];

        assert!(r.click_shape(id, 0.0));
        assert!(!r.click_shape(id, 10.0));
        assert_eq!(r.state().cleared, 1);
        assert_eq!(
            r.feedback().events,
            [FeedbackEvent::Sound, FeedbackEvent::Announce(1)]
        );
    }

    #[test]
    fn test_click_unknown_id_changes_nothing() {
        let mut r = round(5);
        r.start_round_with(3);
        let before = r.state().shapes.clone();

        assert!(!r.click_shape(9999, 0.0));
        assert_eq!(r.state().shapes, before);
        assert_eq!(r.state().cleared, 0);
        assert!(r.feedback().events.is_empty());
        assert!(r.next_removal_ms().is_none());
    }

    #[test]
    fn test_click_after_removal_is_ignored() {
        let mut r = round(6);
        r.start_round_with(2);
        let id = ids(&r)[0];
        r.click_shape(id, 0.0);
        r.process_removals(REMOVAL_DELAY_MS);

        assert!(!r.click_shape(id, REMOVAL_DELAY_MS + 1.0));
        assert_eq!(r.state().cleared, 1);
    }

    #[test]
    fn test_reset_after_two_of_three() {
        let mut r = round(7);
        r.start_round_with(3);
        let old_ids = ids(&r);
        r.click_shape(old_ids[0], 0.0);
        r.click_shape(old_ids[1], 0.0);
        assert_eq!(r.state().cleared, 2);

        r.reset_round();
        assert_eq!(r.state().target, 3);
        assert_eq!(r.state().cleared, 0);
        assert_eq!(r.state().shapes.len(), 3);
        assert!(r.state().shapes.iter().all(|s| !old_ids.contains(&s.id)));
        assert!(r.next_removal_ms().is_none());
        assert_separated(&r);
    }

    #[test]
    fn test_reset_without_round_is_noop() {
        let mut r = round(8);
        r.reset_round();
        assert_eq!(r.phase(), RoundPhase::Empty);
        assert!(r.state().shapes.is_empty());
    }

    #[test]
    fn test_stale_removal_does_not_touch_new_round() {
        let mut r = round(9);
        r.start_round_with(2);
        let id = ids(&r)[0];
        r.click_shape(id, 0.0);

        r.start_round_with(2);
        assert_eq!(r.process_removals(10_000.0), 0);
        assert_eq!(r.state().shapes.len(), 2);
    }

    #[test]
    fn test_start_round_uses_count_range() {
        let mut r = round(10);
        let range = r.config().count_range();
        for _ in 0..100 {
            r.start_round();
            let target = r.state().target;
            assert!(range.contains(&target));
            assert_eq!(r.state().shapes.len(), target as usize);
            assert_separated(&r);
        }
    }

    #[test]
    fn test_forced_zero_target_becomes_one() {
        let mut r = round(11);
        r.start_round_with(0);
        assert_eq!(r.state().target, 1);
        assert_eq!(r.phase(), RoundPhase::Active);
    }

    #[test]
    fn test_explode_random_then_new_round() {
        let mut r = round(12);
        r.start_round_with(2);
        let first = ids(&r);

        let a = r.explode_random(0.0).expect("live shape");
        let b = r.explode_random(0.0).expect("live shape");
        assert_ne!(a, b);
        assert!(first.contains(&a) && first.contains(&b));
        assert_eq!(r.phase(), RoundPhase::Complete);

        // Nothing left to pop: a new round starts
        assert_eq!(r.explode_random(0.0), None);
        assert_eq!(r.phase(), RoundPhase::Active);
        assert_eq!(r.state().cleared, 0);
        assert!(ids(&r).iter().all(|id| !first.contains(id)));
    }

    #[test]
    fn test_cleared_never_exceeds_target() {
        let mut r = round(13);
        r.start_round();
        let mut now = 0.0;
        for step in 0..200u32 {
            match step % 7 {
                0 => r.reset_round(),
                5 => {
                    r.process_removals(now);
                }
                6 if step % 3 == 0 => r.start_round(),
                _ => {
                    r.explode_random(now);
                }
            }
            now += 120.0;
            assert!(r.state().cleared <= r.state().target);
        }
    }

    #[test]
    fn test_same_seed_same_round() {
        let mut a = round(42);
        let mut b = round(42);
        a.start_round();
        b.start_round();
        assert_eq!(a.state().shapes, b.state().shapes);
    }

    #[test]
    fn test_next_removal_is_earliest() {
        let mut r = round(14);
        r.start_round_with(2);
        let shape_ids = ids(&r);
        r.click_shape(shape_ids[1], 300.0);
        r.click_shape(shape_ids[0], 100.0);
        assert_eq!(r.next_removal_ms(), Some(100.0 + REMOVAL_DELAY_MS));
    }

    #[test]
    fn test_count_range_is_sanitized() {
        let config = RoundConfig {
            min_count: 0,
            max_count: 0,
            ..Default::default()
        };
        assert_eq!(config.count_range(), 1..=1);

        let config = RoundConfig {
            min_count: 4,
            max_count: 2,
            ..Default::default()
        };
        assert_eq!(config.count_range(), 4..=4);
    }
}
