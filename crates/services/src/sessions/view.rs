use serde::{Deserialize, Serialize};

use vocab_core::model::QuizAnswer;

use super::service::Mode;

/// Discrete user-input commands consumed by the session state machine.
///
/// The rendering layer produces these; bindings are by role, never by the
/// position of a control on screen. Events that make no sense in the current
/// mode are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    SelectMode(Mode),
    NextCard,
    PrevCard,
    Reveal,
    Submit(String),
    ToggleWrongAnswers,
    RestartQuiz,
}

/// Grading feedback for the most recently submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
}

impl QuizFeedback {
    #[must_use]
    pub fn from_answer(answer: &QuizAnswer) -> Self {
        Self {
            is_correct: answer.is_correct,
            correct_answer: answer.correct_answer.clone(),
        }
    }
}

/// Presentation-agnostic projection of the session state.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings,
/// no layout assumptions. The renderer decides how (and how long) to show
/// each of these; in particular the pause between quiz feedback and the next
/// question is renderer-owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionView {
    /// No data loaded yet (or an empty active set): render a placeholder,
    /// never an out-of-bounds card.
    Loading,
    ReviewCard {
        question: String,
        answer: String,
        revealed: bool,
        /// One-based for display.
        position: usize,
        total: usize,
    },
    QuizQuestion {
        question: String,
        /// One-based for display.
        position: usize,
        total: usize,
        /// Feedback for the previously answered question, if any.
        feedback: Option<QuizFeedback>,
    },
    QuizResults {
        correct: usize,
        total: usize,
        show_wrong: bool,
        wrong: Vec<QuizAnswer>,
    },
}
