//! Game settings and preferences
//!
//! Persisted in LocalStorage. Values are sanitized when turned into runtime
//! configuration, so a hand-edited or outdated save can never break a round.

use serde::{Deserialize, Serialize};

use crate::audio::AudioMix;
use crate::consts::*;
use crate::sim::{Bounds, PlacementConfig, RoundConfig};
use crate::speech::VoiceParams;

/// How many shapes a round may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CountPreset {
    /// 1 to 3 shapes
    Small,
    /// 1 to 5 shapes
    #[default]
    Standard,
}

impl CountPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountPreset::Small => "Small",
            CountPreset::Standard => "Standard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "1-3" => Some(CountPreset::Small),
            "standard" | "std" | "1-5" => Some(CountPreset::Standard),
            _ => None,
        }
    }

    /// Inclusive (min, max) target count
    pub fn count_range(&self) -> (u32, u32) {
        match self {
            CountPreset::Small => (MIN_COUNT, 3),
            CountPreset::Standard => (MIN_COUNT, MAX_COUNT),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target count range for new rounds
    pub count_preset: CountPreset,

    // === Placement ===
    /// Area shapes are placed in (percent of the play area)
    pub bounds: Bounds,
    /// Minimum distance between shape centers (percent)
    pub min_separation: f32,
    /// Rejected draws before accepting overlap
    pub max_placement_attempts: u32,
    /// Exit animation length before a popped shape is removed
    pub removal_delay_ms: f64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Speech ===
    /// Say the count out loud after each pop
    pub speech_enabled: bool,
    pub speech_rate: f32,
    pub speech_pitch: f32,
    /// Speech volume (0.0 - 1.0)
    pub speech_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            count_preset: CountPreset::Standard,

            bounds: Bounds::default(),
            min_separation: MIN_SEPARATION,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            removal_delay_ms: REMOVAL_DELAY_MS,

            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,

            speech_enabled: true,
            speech_rate: 1.0,
            speech_pitch: 1.2,
            speech_volume: 1.0,
        }
    }
}

impl Settings {
    /// Create settings from a count preset
    pub fn from_preset(preset: CountPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: CountPreset) {
        self.count_preset = preset;
    }

    /// Round tuning derived from these settings
    pub fn round_config(&self) -> RoundConfig {
        let (min_count, max_count) = self.count_preset.count_range();
        let min_separation = if self.min_separation.is_finite() {
            self.min_separation.max(0.0)
        } else {
            MIN_SEPARATION
        };
        let bounds = if self.bounds.min.is_finite() && self.bounds.max.is_finite() {
            Bounds::new(self.bounds.min, self.bounds.max)
        } else {
            Bounds::default()
        };
        let removal_delay_ms = if self.removal_delay_ms.is_finite() {
            self.removal_delay_ms.max(0.0)
        } else {
            REMOVAL_DELAY_MS
        };

        RoundConfig {
            min_count,
            max_count,
            placement: PlacementConfig {
                bounds,
                min_separation,
                max_attempts: self.max_placement_attempts.min(PLACEMENT_ATTEMPTS_LIMIT),
            },
            removal_delay_ms,
        }
    }

    /// Sound effect mix
    pub fn mix(&self) -> AudioMix {
        AudioMix::new(self.master_volume, self.sfx_volume, self.muted)
    }

    /// Speech parameters
    pub fn voice(&self) -> VoiceParams {
        VoiceParams {
            enabled: self.speech_enabled,
            rate: clamp_or(self.speech_rate, 0.1, 10.0, 1.0),
            pitch: clamp_or(self.speech_pitch, 0.0, 2.0, 1.2),
            volume: clamp_or(self.speech_volume, 0.0, 1.0, 1.0),
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shape_counter_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_preset_names() {
        for preset in [CountPreset::Small, CountPreset::Standard] {
            assert_eq!(CountPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(CountPreset::from_str("1-3"), Some(CountPreset::Small));
        assert_eq!(CountPreset::from_str("huge"), None);
    }

    #[test]
    fn test_preset_ranges() {
        let small = Settings::from_preset(CountPreset::Small).round_config();
        assert_eq!(small.count_range(), 1..=3);
        let standard = Settings::default().round_config();
        assert_eq!(standard.count_range(), 1..=5);
    }

    #[test]
    fn test_default_round_config_matches_constants() {
        assert_eq!(Settings::default().round_config(), RoundConfig::default());
    }

    #[test]
    fn test_json_round_trip_and_partial_load() {
        let mut settings = Settings::from_preset(CountPreset::Small);
        settings.min_separation = 40.0;
        settings.max_placement_attempts = 100;
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);

        // Older saves without newer fields still load
        let partial: Settings = serde_json::from_str(r#"{"muted":true}"#).unwrap();
        assert!(partial.muted);
        assert_eq!(partial.count_preset, CountPreset::Standard);
    }

    #[test]
    fn test_round_config_sanitizes() {
        let settings = Settings {
            min_separation: -5.0,
            removal_delay_ms: f64::NAN,
            bounds: Bounds {
                min: Vec2::new(90.0, 80.0),
                max: Vec2::new(10.0, 20.0),
            },
            ..Default::default()
        };
        let config = settings.round_config();
        assert_eq!(config.placement.min_separation, 0.0);
        assert_eq!(config.removal_delay_ms, REMOVAL_DELAY_MS);
        assert_eq!(config.placement.bounds.min, Vec2::new(10.0, 20.0));
        assert_eq!(config.placement.bounds.max, Vec2::new(90.0, 80.0));
    }

    #[test]
    fn test_placement_attempts_capped() {
        let settings: Settings =
            serde_json::from_str(r#"{"max_placement_attempts":4294967295}"#).unwrap();
        let config = settings.round_config();
        assert_eq!(config.placement.max_attempts, PLACEMENT_ATTEMPTS_LIMIT);

        let settings = Settings {
            max_placement_attempts: 100,
            ..Default::default()
        };
        assert_eq!(settings.round_config().placement.max_attempts, 100);
    }

    #[test]
    fn test_voice_params_clamped() {
        let settings = Settings {
            speech_pitch: 5.0,
            speech_volume: f32::INFINITY,
            ..Default::default()
        };
        let voice = settings.voice();
        assert_eq!(voice.pitch, 2.0);
        assert_eq!(voice.volume, 1.0);
        assert!(voice.enabled);
    }
}
