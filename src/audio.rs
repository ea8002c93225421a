//! Audio system using Web Audio API
//!
//! The pop is generated procedurally: a falling oscillator sweep layered
//! with a short white-noise burst. No sound files needed.

use serde::{Deserialize, Serialize};

/// Volume settings for sound effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioMix {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMix {
    fn default() -> Self {
        Self::new(1.0, 1.0, false)
    }
}

impl AudioMix {
    pub fn new(master_volume: f32, sfx_volume: f32, muted: bool) -> Self {
        Self {
            master_volume: unit(master_volume),
            sfx_volume: unit(sfx_volume),
            muted,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Envelope of the pop sound (seconds / Hz / linear gain at full volume)
pub mod pop {
    pub const DURATION: f64 = 0.25;
    pub const SWEEP_START_HZ: f32 = 400.0;
    pub const SWEEP_END_HZ: f32 = 50.0;
    pub const SWEEP_TIME: f64 = 0.1;
    pub const TONE_GAIN: f32 = 0.15;
    pub const NOISE_DURATION: f64 = 0.15;
    pub const NOISE_GAIN: f32 = 0.08;
    /// Exponential ramps can't reach zero
    pub const FLOOR_GAIN: f32 = 0.01;
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioMix, pop};

    /// Audio context lifecycle
    enum ContextSlot {
        /// Not created yet (browsers want a user gesture first)
        Pending,
        Ready(AudioContext),
        /// Creation failed once; don't keep retrying
        Unavailable,
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: ContextSlot,
        mix: AudioMix,
        noise_rng: Pcg32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        /// The audio context is created lazily on the first sound
        pub fn new() -> Self {
            Self {
                ctx: ContextSlot::Pending,
                mix: AudioMix::default(),
                noise_rng: Pcg32::seed_from_u64(js_sys::Date::now() as u64),
            }
        }

        pub fn set_mix(&mut self, mix: AudioMix) {
            self.mix = mix;
        }

        pub fn mix(&self) -> AudioMix {
            self.mix
        }

        /// Get the context, creating and resuming it as needed
        fn context(&mut self) -> Option<&AudioContext> {
            if matches!(self.ctx, ContextSlot::Pending) {
                self.ctx = match AudioContext::new() {
                    Ok(ctx) => ContextSlot::Ready(ctx),
                    Err(e) => {
                        log::warn!("Failed to create AudioContext - audio disabled: {:?}", e);
                        ContextSlot::Unavailable
                    }
                };
            }

            let ContextSlot::Ready(ctx) = &self.ctx else {
                return None;
            };
            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Play the pop sound
        pub fn play_pop(&mut self) {
            let vol = self.mix.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(sample_rate) = self.context().map(|ctx| ctx.sample_rate()) else {
                return;
            };
            let len = (sample_rate as f64 * pop::NOISE_DURATION) as usize;
            let mut samples: Vec<f32> = (0..len)
                .map(|_| self.noise_rng.random_range(-1.0..1.0))
                .collect();

            let ContextSlot::Ready(ctx) = &self.ctx else { return };
            play_sweep(ctx, vol);
            if play_noise(ctx, vol, &mut samples).is_none() {
                log::debug!("Pop noise burst unavailable");
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Falling "boom"
    fn play_sweep(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, pop::SWEEP_START_HZ, OscillatorType::Sine) else {
            log::debug!("Pop sweep unavailable");
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * pop::TONE_GAIN, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(pop::FLOOR_GAIN, t + pop::DURATION)
            .ok();
        osc.frequency().set_value_at_time(pop::SWEEP_START_HZ, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(pop::SWEEP_END_HZ, t + pop::SWEEP_TIME)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + pop::DURATION).ok();
    }

    /// White-noise crackle on top of the sweep
    fn play_noise(ctx: &AudioContext, vol: f32, samples: &mut [f32]) -> Option<()> {
        let t = ctx.current_time();
        let buffer = ctx
            .create_buffer(1, samples.len() as u32, ctx.sample_rate())
            .ok()?;
        buffer.copy_to_channel(samples, 0).ok()?;

        let source = ctx.create_buffer_source().ok()?;
        let gain = ctx.create_gain().ok()?;
        source.set_buffer(Some(&buffer));
        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        gain.gain().set_value_at_time(vol * pop::NOISE_GAIN, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(pop::FLOOR_GAIN, t + pop::NOISE_DURATION)
            .ok();
        source.start_with_when(t).ok()?;
        source.stop_with_when(t + pop::NOISE_DURATION).ok()
    }
}
