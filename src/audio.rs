//! Sound effects
//!
//! Every cue is a short sequence of synthesized tones, so no audio files ship
//! with the game. The cue tables are plain data; on wasm32 the
//! `AudioManager` plays them through the Web Audio API.

use crate::game::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tile picked up
    Click,
    /// Digit dropped into a slot
    Drop,
    /// Digit removed from a slot
    Remove,
    /// Correct answer
    Correct,
    /// Wrong answer
    Wrong,
    /// Rocket launch / flight to a planet
    Rocket,
    /// Arrived at a new planet
    LevelUp,
    /// Conquered the Sun
    Victory,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Sawtooth,
}

/// One tone of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz)
    pub freq: f32,
    /// End frequency for a sweep (Hz), `None` for a steady pitch
    pub sweep_to: Option<f32>,
    /// Length (seconds)
    pub duration: f32,
    pub wave: Wave,
    /// Peak gain before the master volume is applied
    pub volume: f32,
    /// Offset from the start of the cue (seconds)
    pub at: f32,
}

const fn tone(freq: f32, duration: f32, wave: Wave, volume: f32, at: f32) -> Tone {
    Tone {
        freq,
        sweep_to: None,
        duration,
        wave,
        volume,
        at,
    }
}

// C5 E5 G5 C6, 100ms apart
const CORRECT: [Tone; 4] = [
    tone(523.0, 0.15, Wave::Sine, 0.3, 0.0),
    tone(659.0, 0.15, Wave::Sine, 0.3, 0.1),
    tone(784.0, 0.15, Wave::Sine, 0.3, 0.2),
    tone(1047.0, 0.15, Wave::Sine, 0.3, 0.3),
];

const WRONG: [Tone; 2] = [
    tone(200.0, 0.3, Wave::Sawtooth, 0.2, 0.0),
    tone(150.0, 0.3, Wave::Sawtooth, 0.15, 0.15),
];

// A4 C#5 E5 A5
const LEVEL_UP: [Tone; 4] = [
    tone(440.0, 0.2, Wave::Sine, 0.25, 0.0),
    tone(554.0, 0.2, Wave::Sine, 0.25, 0.12),
    tone(659.0, 0.2, Wave::Sine, 0.25, 0.24),
    tone(880.0, 0.2, Wave::Sine, 0.25, 0.36),
];

const VICTORY: [Tone; 6] = [
    tone(523.0, 0.2, Wave::Sine, 0.3, 0.0),
    tone(659.0, 0.2, Wave::Sine, 0.3, 0.15),
    tone(784.0, 0.2, Wave::Sine, 0.3, 0.3),
    tone(1047.0, 0.2, Wave::Sine, 0.3, 0.45),
    tone(784.0, 0.2, Wave::Sine, 0.3, 0.6),
    tone(1047.0, 0.2, Wave::Sine, 0.3, 0.75),
];

// Whoosh: sawtooth sweeping up
const ROCKET: [Tone; 1] = [Tone {
    freq: 100.0,
    sweep_to: Some(400.0),
    duration: 0.5,
    wave: Wave::Sawtooth,
    volume: 0.2,
    at: 0.0,
}];

const CLICK: [Tone; 1] = [tone(600.0, 0.05, Wave::Sine, 0.1, 0.0)];
const DROP: [Tone; 1] = [tone(400.0, 0.1, Wave::Sine, 0.2, 0.0)];
const REMOVE: [Tone; 1] = [tone(300.0, 0.1, Wave::Triangle, 0.15, 0.0)];

impl SoundEffect {
    /// Tones making up this cue
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::Click => &CLICK,
            SoundEffect::Drop => &DROP,
            SoundEffect::Remove => &REMOVE,
            SoundEffect::Correct => &CORRECT,
            SoundEffect::Wrong => &WRONG,
            SoundEffect::Rocket => &ROCKET,
            SoundEffect::LevelUp => &LEVEL_UP,
            SoundEffect::Victory => &VICTORY,
        }
    }

    /// Cues for a game event, in playing order
    pub fn for_event(event: &GameEvent) -> &'static [SoundEffect] {
        match event {
            GameEvent::Launched { .. } => &[SoundEffect::Rocket],
            GameEvent::DigitPlaced { .. } => &[SoundEffect::Drop],
            GameEvent::DigitRemoved { .. } => &[SoundEffect::Remove],
            GameEvent::CarryToggled { .. } => &[SoundEffect::Click],
            GameEvent::Correct { .. } => &[SoundEffect::Correct],
            GameEvent::Incorrect => &[SoundEffect::Wrong],
            // Flight, then arrival
            GameEvent::StageAdvanced { .. } => &[SoundEffect::Rocket, SoundEffect::LevelUp],
            GameEvent::Victory { .. } => &[SoundEffect::Victory],
            GameEvent::ProblemReady { .. }
            | GameEvent::NeedsMoreInput { .. }
            | GameEvent::StageFact { .. }
            | GameEvent::FeedbackDismissed
            | GameEvent::StageFactDismissed
            | GameEvent::SessionReset { .. } => &[],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let t0 = ctx.current_time();
            for tone in effect.tones() {
                self.play_tone(ctx, tone, t0);
            }
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, t0: f64) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Triangle => OscillatorType::Triangle,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let start = t0 + f64::from(tone.at);
            let end = start + f64::from(tone.duration);
            osc.frequency().set_value_at_time(tone.freq, start).ok()?;
            if let Some(to) = tone.sweep_to {
                osc.frequency().exponential_ramp_to_value_at_time(to, end).ok()?;
            }
            gain.gain()
                .set_value_at_time(tone.volume * self.volume, start)
                .ok()?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok()?;

            osc.start_with_when(start).ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_has_tones() {
        let all = [
            SoundEffect::Click,
            SoundEffect::Drop,
            SoundEffect::Remove,
            SoundEffect::Correct,
            SoundEffect::Wrong,
            SoundEffect::Rocket,
            SoundEffect::LevelUp,
            SoundEffect::Victory,
        ];
        for effect in all {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{:?}", effect);
            assert!(tones.windows(2).all(|w| w[0].at <= w[1].at), "{:?}", effect);
            assert!(tones.iter().all(|t| t.volume > 0.0 && t.volume <= 1.0));
        }
    }

    #[test]
    fn test_event_cues() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Incorrect), &[SoundEffect::Wrong]);
        assert!(SoundEffect::for_event(&GameEvent::FeedbackDismissed).is_empty());
    }

    #[test]
    fn test_rocket_on_launch_and_flight_only() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Launched { stage: 0 }),
            &[SoundEffect::Rocket]
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::StageAdvanced { stage: 3 }),
            &[SoundEffect::Rocket, SoundEffect::LevelUp]
        );
        assert!(SoundEffect::for_event(&GameEvent::SessionReset { hard: false }).is_empty());
        assert!(SoundEffect::for_event(&GameEvent::SessionReset { hard: true }).is_empty());
    }
}
