//! Space Math Mission - an arithmetic journey from Pluto to the Sun
//!
//! Core modules:
//! - `game`: Problem generation, answer checking and planet progression
//! - `persistence`: Session snapshot in a local key-value store
//! - `view`: Render-ready data for the HUD, problem grid and planet tracker
//! - `audio`: Sound cues for game events (Web Audio on wasm32)
//! - `settings`: Player preferences
//! - `platform`: Browser/native differences (clock, seeding)

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod view;

pub use game::{Game, GameEvent, GamePhase, Intent, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Correct answers needed on a planet before the rocket moves on
    pub const PROBLEMS_NEEDED_TO_ADVANCE: u32 = 3;
    /// Share of subtraction problems (the rest are additions)
    pub const SUBTRACTION_CHANCE: f64 = 0.3;
    /// Points for a correct answer, multiplied by (streak + 1)
    pub const CORRECT_BASE_POINTS: u64 = 10;
    /// Pilot name when none was given
    pub const DEFAULT_PILOT_NAME: &str = "Astronaut";

    /// LocalStorage key of the session snapshot
    pub const SESSION_STORAGE_KEY: &str = "spaceMathState";

    /// Timings (ms)
    pub const NEXT_PROBLEM_DELAY_MS: u64 = 1500;
    pub const ADVANCE_DELAY_MS: u64 = 1500;
    pub const STAGE_FACT_DELAY_MS: u64 = 1500;
    pub const NEXT_PROBLEM_AFTER_ADVANCE_MS: u64 = 3000;
    pub const FEEDBACK_DISMISS_MS: u64 = 1200;
    pub const STAGE_FACT_DISMISS_MS: u64 = 4000;
}
