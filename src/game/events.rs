//! Inbound intents and outbound events
//!
//! The browser shell turns clicks, drags and key presses into [`Intent`]s and
//! redraws, plays sounds or throws confetti in response to [`GameEvent`]s. The
//! core never touches the DOM.

/// Something the player asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Start (or continue) the journey under this name
    StartWithName(String),
    /// Typed or tapped digit, lands in the rightmost empty slot
    EnterDigit(char),
    /// Digit dropped on a specific slot
    PlaceDigit { index: usize, digit: char },
    /// Backspace
    ClearLastDigit,
    /// Tap on a filled slot
    ClearSlot(usize),
    /// Tap on a carry marker
    ToggleCarry(usize),
    Submit,
    /// Fly again from Pluto with the same pilot
    Restart,
    /// Forget the pilot and all saved progress
    HardReset,
    /// Close the arrival notification early
    DismissNotification,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Pilot left the briefing screen
    Launched { stage: usize },
    /// A fresh problem is on screen
    ProblemReady { stage: usize },
    DigitPlaced { index: usize, digit: char },
    DigitRemoved { index: usize },
    CarryToggled { index: usize, marked: bool },
    /// Submit with empty slots
    NeedsMoreInput { empty_slots: usize },
    Correct {
        points: u64,
        streak: u32,
        praise: &'static str,
    },
    Incorrect,
    /// Rocket moves to a new planet
    StageAdvanced { stage: usize },
    /// One-time arrival notification
    StageFact { stage: usize, text: &'static str },
    FeedbackDismissed,
    StageFactDismissed,
    /// Flew past the Sun
    Victory { pilot_name: String, score: u64 },
    /// Session replaced by a restart (`hard` when the pilot was forgotten too)
    SessionReset { hard: bool },
}

/// Lines shown after a correct answer
pub const PRAISE: [&str; 10] = [
    "Awesome!",
    "Great job!",
    "Perfect!",
    "You got it!",
    "Amazing!",
    "Stellar!",
    "Fantastic!",
    "🚀 Blast off!",
    "Super!",
    "Brilliant!",
];
