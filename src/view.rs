//! Render-ready snapshots of game state
//!
//! The browser shell redraws the HUD, the column-arithmetic grid and the
//! planet tracker from these after every batch of events.

use crate::game::{STAGES, Session, Stage};

/// Header values
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub pilot_name: String,
    /// `None` once the Sun has been conquered
    pub stage: Option<&'static Stage>,
    pub stage_index: usize,
    pub stage_count: usize,
    pub problems_on_stage: u32,
    pub problems_needed: u32,
    /// Progress bar fill (0.0 - 1.0)
    pub progress: f32,
    pub score: u64,
    pub streak: u32,
}

impl HudView {
    pub fn from_session(session: &Session) -> Self {
        Self {
            pilot_name: session.pilot_name.clone(),
            stage: session.stage(),
            stage_index: session.current_stage,
            stage_count: STAGES.len(),
            problems_on_stage: session.problems_on_stage,
            problems_needed: session.problems_needed_to_advance,
            progress: session.progress_fraction(),
            score: session.score,
            streak: session.streak,
        }
    }

    /// "2/3" under the progress bar
    pub fn progress_text(&self) -> String {
        format!("{}/{}", self.problems_on_stage, self.problems_needed)
    }
}

/// Column layout of the active problem
///
/// Operand rows are right-aligned to `columns`; `None` cells render blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemLayout {
    pub columns: usize,
    pub top: Vec<Option<char>>,
    pub bottom: Vec<Option<char>>,
    pub operator: char,
    pub answer: Vec<Option<char>>,
    pub carries: Vec<bool>,
}

impl ProblemLayout {
    /// `None` when there is no problem on screen
    pub fn from_session(session: &Session) -> Option<Self> {
        let problem = session.current_problem.as_ref()?;
        let a = problem.operand_a.to_string();
        let b = problem.operand_b.to_string();
        let columns = a.len().max(b.len()).max(problem.expected_answer.len());

        Some(Self {
            columns,
            top: right_align(&a, columns),
            bottom: right_align(&b, columns),
            operator: problem.operator.glyph(),
            answer: session.answer.clone(),
            carries: session.carries.clone(),
        })
    }
}

fn right_align(digits: &str, width: usize) -> Vec<Option<char>> {
    let pad = width.saturating_sub(digits.len());
    std::iter::repeat_n(None, pad)
        .chain(digits.chars().map(Some))
        .collect()
}

/// A planet's marker in the tracker sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerMark {
    Reached,
    Current,
    Ahead,
}

/// Marker for every planet, in journey order
pub fn tracker(session: &Session) -> Vec<(&'static Stage, TrackerMark)> {
    STAGES
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let mark = match i.cmp(&session.current_stage) {
                std::cmp::Ordering::Less => TrackerMark::Reached,
                std::cmp::Ordering::Equal => TrackerMark::Current,
                std::cmp::Ordering::Greater => TrackerMark::Ahead,
            };
            (stage, mark)
        })
        .collect()
}
