//! Answer slots and evaluation
//!
//! Learners write answers right to left, the way column arithmetic is worked:
//! a typed digit lands in the rightmost empty slot, and backspace removes the
//! leftmost filled one.

use super::state::Session;

/// Result of judging the answer slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one slot is still empty
    NeedsMoreInput,
    Correct,
    Incorrect,
}

/// Judge the current answer against the active problem
///
/// Exact string comparison. Expected answers never carry leading zeros and the
/// slot count equals their length, so this agrees with numeric equality.
pub fn evaluate(session: &Session) -> Outcome {
    let Some(problem) = &session.current_problem else {
        return Outcome::NeedsMoreInput;
    };
    if session.answer.is_empty() || session.answer.iter().any(Option::is_none) {
        return Outcome::NeedsMoreInput;
    }

    let submitted: String = session.answer.iter().flatten().collect();
    if submitted == problem.expected_answer {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

impl Session {
    /// Put a digit in the rightmost empty slot, returning the slot index
    pub fn enter_digit(&mut self, digit: char) -> Option<usize> {
        if !digit.is_ascii_digit() {
            return None;
        }
        let index = self.answer.iter().rposition(Option::is_none)?;
        self.answer[index] = Some(digit);
        Some(index)
    }

    /// Put a digit in a specific slot (drag and drop), overwriting it
    pub fn place_digit(&mut self, index: usize, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            return false;
        }
        match self.answer.get_mut(index) {
            Some(slot) => {
                *slot = Some(digit);
                true
            }
            None => false,
        }
    }

    /// Remove the most recently typed digit, returning its slot index
    pub fn clear_last_digit(&mut self) -> Option<usize> {
        let index = self.answer.iter().position(Option::is_some)?;
        self.answer[index] = None;
        Some(index)
    }

    /// Empty one slot; false if it was already empty or out of range
    pub fn clear_slot(&mut self, index: usize) -> bool {
        self.answer.get_mut(index).and_then(Option::take).is_some()
    }

    /// Empty every slot for a retry
    pub fn clear_answer(&mut self) {
        self.answer.iter_mut().for_each(|slot| *slot = None);
    }

    /// Flip a carry marker, returning its new value
    pub fn toggle_carry(&mut self, index: usize) -> Option<bool> {
        let mark = self.carries.get_mut(index)?;
        *mark = !*mark;
        Some(*mark)
    }

    /// Number of slots still to fill
    pub fn empty_slots(&self) -> usize {
        self.answer.iter().filter(|slot| slot.is_none()).count()
    }
}
