//! Spoken count using the Web Speech API
//!
//! Chrome loads voices asynchronously, so voices are warmed up at startup.
//! Speaking never waits for them: until the list arrives the browser default
//! voice is used.

use serde::{Deserialize, Serialize};

/// Utterance parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceParams {
    pub enabled: bool,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            pitch: 1.2,
            volume: 1.0,
        }
    }
}

/// Pick a voice by language tag: first English voice, else the first voice
pub fn preferred_voice_index<S: AsRef<str>>(langs: &[S]) -> Option<usize> {
    langs
        .iter()
        .position(|lang| lang.as_ref().starts_with("en"))
        .or(if langs.is_empty() { None } else { Some(0) })
}

/// Voice to speak with, or `None` for the browser default.
///
/// Until warm-up has seen the voice list the lookup is skipped, since a
/// browser that is still loading voices reports an empty or partial list.
pub fn choose_voice<S: AsRef<str>>(voices_loaded: bool, langs: &[S]) -> Option<usize> {
    if voices_loaded {
        preferred_voice_index(langs)
    } else {
        None
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::Speaker;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

    use super::{VoiceParams, choose_voice};
    use crate::consts::VOICE_WARMUP_TIMEOUT_MS;

    enum SynthSlot {
        Pending,
        Ready(SpeechSynthesis),
        Unavailable,
    }

    /// Speaks numbers with the preferred voice
    pub struct Speaker {
        synth: SynthSlot,
        params: VoiceParams,
        voices_loaded: Rc<Cell<bool>>,
    }

    impl Speaker {
        pub fn new(params: VoiceParams) -> Self {
            Self {
                synth: SynthSlot::Pending,
                params,
                voices_loaded: Rc::new(Cell::new(false)),
            }
        }

        fn synth(&mut self) -> Option<SpeechSynthesis> {
            if matches!(self.synth, SynthSlot::Pending) {
                self.synth = match web_sys::window().map(|w| w.speech_synthesis()) {
                    Some(Ok(synth)) => SynthSlot::Ready(synth),
                    _ => {
                        log::warn!("Speech synthesis not supported");
                        SynthSlot::Unavailable
                    }
                };
            }
            match &self.synth {
                SynthSlot::Ready(synth) => Some(synth.clone()),
                _ => None,
            }
        }

        /// Start loading voices without blocking.
        ///
        /// Marks voices loaded immediately when the browser already has them,
        /// otherwise on `voiceschanged`, with a short fallback timer in case
        /// the event never fires.
        pub fn warm_up_voices(&mut self) {
            let Some(synth) = self.synth() else { return };

            let count = synth.get_voices().length();
            if count > 0 {
                self.voices_loaded.set(true);
                log::info!("Voices loaded immediately: {} voices", count);
                return;
            }

            {
                let loaded = self.voices_loaded.clone();
                let target = synth.clone();
                let closure = Closure::<dyn FnMut()>::new(move || {
                    let count = target.get_voices().length();
                    if count > 0 && !loaded.get() {
                        loaded.set(true);
                        target.set_onvoiceschanged(None);
                        log::info!("Voices loaded via event: {} voices", count);
                    }
                });
                synth.set_onvoiceschanged(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            let loaded = self.voices_loaded.clone();
            let target = synth.clone();
            let fallback = Closure::once_into_js(move || {
                let count = target.get_voices().length();
                if count > 0 && !loaded.get() {
                    loaded.set(true);
                    log::info!("Voices loaded via fallback: {} voices", count);
                }
            });
            let scheduled = web_sys::window().map(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(
                    fallback.unchecked_ref(),
                    VOICE_WARMUP_TIMEOUT_MS,
                )
            });
            if !matches!(scheduled, Some(Ok(_))) {
                log::debug!("Voice warm-up fallback timer not scheduled");
            }
        }

        /// Say `number`, cutting off anything still queued
        pub fn speak_number(&mut self, number: u32) {
            if !self.params.enabled {
                return;
            }
            let Some(synth) = self.synth() else { return };

            // A stuck queue would swallow every later utterance
            synth.cancel();

            let Ok(utterance) = SpeechSynthesisUtterance::new_with_text(&number.to_string()) else {
                log::debug!("Could not create utterance for {}", number);
                return;
            };
            utterance.set_rate(self.params.rate);
            utterance.set_pitch(self.params.pitch);
            utterance.set_volume(self.params.volume);

            match preferred_voice(&synth, self.voices_loaded.get()) {
                Some(voice) => utterance.set_voice(Some(&voice)),
                None => log::debug!("Voices not loaded yet, using default voice"),
            }

            synth.speak(&utterance);
        }
    }

    fn preferred_voice(synth: &SpeechSynthesis, loaded: bool) -> Option<SpeechSynthesisVoice> {
        if !loaded {
            return None;
        }
        let voices: Vec<SpeechSynthesisVoice> = synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into().ok())
            .collect();
        let langs: Vec<String> = voices.iter().map(|v| v.lang()).collect();
        choose_voice(loaded, &langs).and_then(|i| voices.get(i).cloned())
    }
}
