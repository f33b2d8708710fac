//! Game core
//!
//! All gameplay rules live here. Nothing in this module touches the DOM,
//! audio or the wall clock:
//! - Seeded RNG only
//! - Time only moves through `Game::advance_to`
//! - Output only through `GameEvent`s and state queries

pub mod answer;
pub mod controller;
pub mod events;
pub mod problem;
pub mod schedule;
pub mod stage;
pub mod state;

pub use answer::{Outcome, evaluate};
pub use controller::Game;
pub use events::{GameEvent, Intent, PRAISE};
pub use problem::{Operator, Problem, digit_count, generate};
pub use schedule::{Deferred, Scheduler};
pub use stage::{BOSS_WARNING, Difficulty, STAGE_COUNT, STAGES, Stage};
pub use state::{GamePhase, Session};
