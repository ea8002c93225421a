//! Click feedback (sound + spoken count)
//!
//! The round owns one feedback service and calls it synchronously from the
//! click handler, so browsers still treat the calls as part of the user gesture.
//! Implementations must never fail visibly; a broken audio device just means
//! silence.

/// Feedback emitted when a shape is popped
pub trait Feedback {
    /// Play the short "pop" sound
    fn play_feedback_sound(&mut self);
    /// Say the new count out loud
    fn announce_count(&mut self, count: u32);
}

impl<T: Feedback + ?Sized> Feedback for &mut T {
    fn play_feedback_sound(&mut self) {
        (**self).play_feedback_sound();
    }

    fn announce_count(&mut self, count: u32) {
        (**self).announce_count(count);
    }
}

impl<T: Feedback + ?Sized> Feedback for Box<T> {
    fn play_feedback_sound(&mut self) {
        (**self).play_feedback_sound();
    }

    fn announce_count(&mut self, count: u32) {
        (**self).announce_count(count);
    }
}

/// No feedback at all (native builds, muted embedding)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn play_feedback_sound(&mut self) {}

    fn announce_count(&mut self, _count: u32) {}
}

/// Recorded feedback call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    Sound,
    Announce(u32),
}

/// Records every call instead of producing output
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<FeedbackEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts announced so far, in order
    pub fn announced(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FeedbackEvent::Announce(n) => Some(*n),
                FeedbackEvent::Sound => None,
            })
            .collect()
    }
}

impl Feedback for Recorder {
    fn play_feedback_sound(&mut self) {
        self.events.push(FeedbackEvent::Sound);
    }

    fn announce_count(&mut self, count: u32) {
        log::debug!("Announce {}", count);
        self.events.push(FeedbackEvent::Announce(count));
    }
}

/// Browser feedback: Web Audio pop plus Web Speech count
#[cfg(target_arch = "wasm32")]
pub struct WebFeedback {
    pub audio: crate::audio::AudioManager,
    pub speech: crate::speech::Speaker,
}

#[cfg(target_arch = "wasm32")]
impl WebFeedback {
    pub fn new(settings: &crate::Settings) -> Self {
        let mut audio = crate::audio::AudioManager::new();
        audio.set_mix(settings.mix());
        let speech = crate::speech::Speaker::new(settings.voice());
        Self { audio, speech }
    }
}

#[cfg(target_arch = "wasm32")]
impl Feedback for WebFeedback {
    fn play_feedback_sound(&mut self) {
        self.audio.play_pop();
    }

    fn announce_count(&mut self, count: u32) {
        self.speech.speak_number(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pop(feedback: &mut impl Feedback, count: u32) {
        feedback.play_feedback_sound();
        feedback.announce_count(count);
    }

    #[test]
    fn test_recorder_keeps_call_order() {
        let mut recorder = Recorder::new();
        pop(&mut recorder, 1);
        pop(&mut recorder, 2);
        assert_eq!(
            recorder.events,
            [
                FeedbackEvent::Sound,
                FeedbackEvent::Announce(1),
                FeedbackEvent::Sound,
                FeedbackEvent::Announce(2),
            ]
        );
        assert_eq!(recorder.announced(), [1, 2]);
    }

    #[test]
    fn test_forwarding_impls() {
        let mut recorder = Recorder::new();
        {
            let mut borrowed = &mut recorder;
            pop(&mut borrowed, 3);
        }
        let mut boxed: Box<dyn Feedback> = Box::new(Silent);
        pop(&mut boxed, 4);
        assert_eq!(recorder.announced(), [3]);
    }
}
