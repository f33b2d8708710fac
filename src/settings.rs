//! Player preferences
//!
//! Held in memory for the running page only. The session snapshot is the one
//! thing the game stores.

/// Confetti bursts for a correct answer
const CORRECT_CONFETTI: u32 = 1;
/// Confetti bursts on the victory screen
const VICTORY_CONFETTI: u32 = 50;

/// Player preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no confetti)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective volume for sound effects (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Confetti bursts to launch (respects reduced_motion)
    pub fn confetti_bursts(&self, victory: bool) -> u32 {
        if self.reduced_motion {
            0
        } else if victory {
            VICTORY_CONFETTI
        } else {
            CORRECT_CONFETTI
        }
    }
}
