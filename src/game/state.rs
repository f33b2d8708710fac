//! Session state
//!
//! Everything that must be persisted for Continue lives here. The JSON field
//! names match the browser save format, and every field has a default so a
//! partial (or empty) object loads onto a fresh session.

use serde::{Deserialize, Serialize};

use super::problem::Problem;
use super::stage::{STAGE_COUNT, Stage, stage};
use crate::consts::{CORRECT_BASE_POINTS, DEFAULT_PILOT_NAME, PROBLEMS_NEEDED_TO_ADVANCE};

/// Longest streak a journey allows: every problem solved first time
const MAX_STREAK: u32 = STAGE_COUNT as u32 * PROBLEMS_NEEDED_TO_ADVANCE;
/// Score of a flawless journey
const MAX_SCORE: u64 = CORRECT_BASE_POINTS * (MAX_STREAK as u64) * (MAX_STREAK as u64 + 1) / 2;

/// Controller phase, derived from the session plus pending transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for the pilot's name
    Briefing,
    /// A problem is on screen and accepts input
    Playing,
    /// Answer was correct, next problem or planet is on its way
    Celebrating,
    /// Flew past the Sun
    Victorious,
}

/// The player's journey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    pub pilot_name: String,
    /// Planet index; `STAGE_COUNT` means the journey is complete
    #[serde(rename = "currentPlanetIndex")]
    pub current_stage: usize,
    pub score: u64,
    pub streak: u32,
    /// Correct answers since arriving at the current planet
    #[serde(rename = "problemsOnPlanet")]
    pub problems_on_stage: u32,
    pub problems_needed_to_advance: u32,
    pub current_problem: Option<Problem>,
    /// Answer slots, most significant digit first
    pub answer: Vec<Option<char>>,
    /// Carry markers drawn by the learner
    pub carries: Vec<bool>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PILOT_NAME)
    }
}

impl Session {
    pub fn new(pilot_name: impl Into<String>) -> Self {
        Self {
            pilot_name: pilot_name.into(),
            current_stage: 0,
            score: 0,
            streak: 0,
            problems_on_stage: 0,
            problems_needed_to_advance: PROBLEMS_NEEDED_TO_ADVANCE,
            current_problem: None,
            answer: Vec::new(),
            carries: Vec::new(),
        }
    }

    /// Current planet (`None` once victorious)
    pub fn stage(&self) -> Option<&'static Stage> {
        stage(self.current_stage)
    }

    pub fn is_victorious(&self) -> bool {
        self.current_stage >= STAGE_COUNT
    }

    /// Whether enough problems have been solved to leave this planet
    pub fn stage_complete(&self) -> bool {
        self.problems_on_stage >= self.problems_needed_to_advance
    }

    /// Progress bar fill for the current planet (0.0 - 1.0)
    pub fn progress_fraction(&self) -> f32 {
        if self.problems_needed_to_advance == 0 {
            return 1.0;
        }
        (self.problems_on_stage as f32 / self.problems_needed_to_advance as f32).min(1.0)
    }

    /// Install a new problem with empty answer slots and no carries
    pub fn set_problem(&mut self, problem: Problem) {
        self.answer = vec![None; problem.answer_len()];
        self.carries = vec![false; problem.carry_len()];
        self.current_problem = Some(problem);
    }

    /// Drop the active problem (between planets)
    pub fn clear_problem(&mut self) {
        self.current_problem = None;
        self.answer.clear();
        self.carries.clear();
    }

    /// Back to Pluto with a clean score, keeping the pilot
    pub fn restart(&mut self) {
        *self = Self::new(std::mem::take(&mut self.pilot_name));
    }

    /// Check a deserialized snapshot and re-establish slot invariants
    ///
    /// Returns `None` when the snapshot cannot describe a valid journey. A
    /// finished journey comes back as a fresh one for the same pilot.
    pub fn repaired(mut self) -> Option<Self> {
        if self.current_stage > STAGE_COUNT {
            log::warn!("Snapshot planet index {} out of range", self.current_stage);
            return None;
        }
        if self.current_stage == STAGE_COUNT {
            log::info!("Snapshot is a finished journey, starting over");
            return Some(Self::new(self.pilot_name));
        }
        if self.problems_needed_to_advance != PROBLEMS_NEEDED_TO_ADVANCE {
            log::warn!(
                "Snapshot asks for {} problems per planet, using {}",
                self.problems_needed_to_advance,
                PROBLEMS_NEEDED_TO_ADVANCE
            );
            self.problems_needed_to_advance = PROBLEMS_NEEDED_TO_ADVANCE;
        }
        self.problems_on_stage = self.problems_on_stage.min(PROBLEMS_NEEDED_TO_ADVANCE);
        if self.streak > MAX_STREAK || self.score > MAX_SCORE {
            log::warn!(
                "Snapshot streak {} / score {} out of range, clamping",
                self.streak,
                self.score
            );
            self.streak = self.streak.min(MAX_STREAK);
            self.score = self.score.min(MAX_SCORE);
        }

        match self.current_problem.take() {
            Some(problem) if problem.is_consistent() => {
                let digits_ok = self.answer.len() == problem.answer_len()
                    && self.answer.iter().flatten().all(|c| c.is_ascii_digit());
                let carries_ok = self.carries.len() == problem.carry_len();
                let (answer, carries) = (self.answer.clone(), self.carries.clone());
                self.set_problem(problem);
                if digits_ok {
                    self.answer = answer;
                }
                if carries_ok {
                    self.carries = carries;
                }
            }
            Some(problem) => {
                log::warn!("Dropping inconsistent saved problem {}", problem);
                self.clear_problem();
            }
            None => self.clear_problem(),
        }

        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_merges_onto_defaults() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert_eq!(session, Session::default());
        assert_eq!(session.problems_needed_to_advance, 3);
    }

    #[test]
    fn test_partial_object_keeps_given_fields() {
        let session: Session =
            serde_json::from_str(r#"{"pilotName":"Ada","score":120,"currentPlanetIndex":4}"#)
                .unwrap();
        assert_eq!(session.pilot_name, "Ada");
        assert_eq!(session.score, 120);
        assert_eq!(session.current_stage, 4);
        assert_eq!(session.streak, 0);
    }

    #[test]
    fn test_set_problem_sizes_slots() {
        let mut session = Session::default();
        session.set_problem(Problem::addition(999, 999));
        assert_eq!(session.answer, vec![None; 4]);
        assert_eq!(session.carries, vec![false; 4]);
    }

    #[test]
    fn test_restart_keeps_pilot() {
        let mut session = Session::new("Ada");
        session.score = 500;
        session.streak = 4;
        session.current_stage = 6;
        session.set_problem(Problem::addition(1, 2));
        session.restart();
        assert_eq!(session, Session::new("Ada"));
    }

    #[test]
    fn test_repaired_fixes_slot_lengths() {
        let mut session = Session::default();
        session.set_problem(Problem::addition(40, 2));
        session.answer = vec![Some('4')];
        session.carries = vec![true];
        let session = session.repaired().unwrap();
        assert_eq!(session.answer, vec![None, None]);
        assert_eq!(session.carries, vec![false; 3]);
    }

    #[test]
    fn test_repaired_keeps_valid_partial_answer() {
        let mut session = Session::default();
        session.set_problem(Problem::addition(40, 2));
        session.answer = vec![None, Some('2')];
        session.carries[1] = true;
        let repaired = session.clone().repaired().unwrap();
        assert_eq!(repaired, session);
    }

    #[test]
    fn test_repaired_rejects_out_of_range_stage() {
        let mut session = Session::default();
        session.current_stage = STAGE_COUNT + 1;
        assert!(session.repaired().is_none());
    }

    #[test]
    fn test_repaired_finished_journey_starts_over() {
        let mut session = Session::new("Ada");
        session.current_stage = STAGE_COUNT;
        session.score = 9000;
        assert_eq!(session.repaired().unwrap(), Session::new("Ada"));
    }

    #[test]
    fn test_repaired_drops_tampered_problem() {
        let mut session = Session::default();
        session.set_problem(Problem::addition(2, 2));
        if let Some(p) = session.current_problem.as_mut() {
            p.expected_answer = "5".into();
        }
        let session = session.repaired().unwrap();
        assert!(session.current_problem.is_none());
        assert!(session.answer.is_empty());
    }

    #[test]
    fn test_repaired_clamps_impossible_counters() {
        let mut session = Session::new("Ada");
        session.streak = u32::MAX;
        session.score = u64::MAX;
        session.problems_needed_to_advance = 1_000_000;
        session.problems_on_stage = 7;
        let session = session.repaired().unwrap();

        assert_eq!(session.problems_needed_to_advance, PROBLEMS_NEEDED_TO_ADVANCE);
        assert_eq!(session.problems_on_stage, PROBLEMS_NEEDED_TO_ADVANCE);
        assert_eq!(session.streak, 30);
        assert_eq!(session.score, 4650);
    }

    #[test]
    fn test_progress_fraction() {
        let mut session = Session::default();
        assert_eq!(session.progress_fraction(), 0.0);
        session.problems_on_stage = 2;
        assert!((session.progress_fraction() - 2.0 / 3.0).abs() < 1e-6);
    }
}
