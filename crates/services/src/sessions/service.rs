use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use vocab_core::Clock;
use vocab_core::model::VocabRecord;

use super::quiz::{QUIZ_SIZE, QuizSession};
use super::review::ReviewSession;
use super::shuffle::{sample, shuffled};
use super::view::{InputEvent, QuizFeedback, SessionView};

/// The two study modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Review,
    Quiz,
}

/// The in-memory session state machine.
///
/// Owns the active record set and the per-mode derived state. Every mode
/// transition re-derives that state from scratch: entering Review reshuffles
/// the cards, entering Quiz (or restarting one) draws a fresh question
/// sample and clears the answer log. Nothing is carried across modes and
/// nothing is persisted.
pub struct SessionService {
    clock: Clock,
    rng: StdRng,
    records: Vec<VocabRecord>,
    mode: Mode,
    review: ReviewSession,
    quiz: Option<QuizSession>,
    last_feedback: Option<QuizFeedback>,
    show_wrong: bool,
}

impl SessionService {
    /// Create a session over the loaded active set, starting in Review mode.
    ///
    /// An empty set is legal; views render a loading placeholder until
    /// `reload` delivers data.
    #[must_use]
    pub fn new(records: Vec<VocabRecord>, clock: Clock) -> Self {
        Self::with_rng(records, clock, StdRng::from_os_rng())
    }

    /// Like `new`, but with a caller-provided RNG for deterministic tests.
    #[must_use]
    pub fn with_rng(records: Vec<VocabRecord>, clock: Clock, mut rng: StdRng) -> Self {
        let review = ReviewSession::new(shuffled(&records, &mut rng));
        Self {
            clock,
            rng,
            records,
            mode: Mode::Review,
            review,
            quiz: None,
            last_feedback: None,
            show_wrong: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The loaded active set, in file order.
    #[must_use]
    pub fn records(&self) -> &[VocabRecord] {
        &self.records
    }

    #[must_use]
    pub fn review(&self) -> &ReviewSession {
        &self.review
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    /// Replace the active set and reset whichever mode is active.
    ///
    /// This is the single atomic step a renderer observes after a data
    /// reload: by the next `view()` the old cards are gone and the mode
    /// state has been re-derived from the new set.
    pub fn reload(&mut self, records: Vec<VocabRecord>) {
        self.records = records;
        self.reset_mode();
    }

    /// Apply one user-input event.
    ///
    /// Events that do not apply to the current mode (arrow keys during a
    /// quiz, submissions during review, anything while loading) are ignored.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::SelectMode(mode) => {
                if self.mode != mode {
                    self.mode = mode;
                    self.reset_mode();
                }
            }
            InputEvent::NextCard => {
                if self.mode == Mode::Review {
                    self.review.next();
                }
            }
            InputEvent::PrevCard => {
                if self.mode == Mode::Review {
                    self.review.prev();
                }
            }
            InputEvent::Reveal => {
                if self.mode == Mode::Review {
                    self.review.reveal();
                }
            }
            InputEvent::Submit(input) => self.submit_answer(&input),
            InputEvent::ToggleWrongAnswers => {
                if self.quiz.as_ref().is_some_and(QuizSession::is_complete) {
                    self.show_wrong = !self.show_wrong;
                }
            }
            InputEvent::RestartQuiz => {
                if self.mode == Mode::Quiz {
                    self.reset_mode();
                }
            }
        }
    }

    /// Project the current state for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView {
        match self.mode {
            Mode::Review => match self.review.current_card() {
                None => SessionView::Loading,
                Some(card) => SessionView::ReviewCard {
                    question: card.question().to_owned(),
                    answer: card.answer().to_owned(),
                    revealed: self.review.revealed(),
                    position: self.review.position() + 1,
                    total: self.review.total(),
                },
            },
            Mode::Quiz => match &self.quiz {
                None => SessionView::Loading,
                Some(quiz) => match quiz.current_question() {
                    Some(question) => SessionView::QuizQuestion {
                        question: question.question().to_owned(),
                        position: quiz.position() + 1,
                        total: quiz.total(),
                        feedback: self.last_feedback.clone(),
                    },
                    None => SessionView::QuizResults {
                        correct: quiz.correct_count(),
                        total: quiz.total(),
                        show_wrong: self.show_wrong,
                        wrong: quiz.wrong_answers().into_iter().cloned().collect(),
                    },
                },
            },
        }
    }

    fn submit_answer(&mut self, input: &str) {
        if self.mode != Mode::Quiz {
            return;
        }
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        // A submission racing quiz completion is a stray event, not a fault.
        if let Ok(answer) = quiz.submit(input, self.clock.now()) {
            self.last_feedback = Some(QuizFeedback::from_answer(answer));
        }
    }

    /// Re-derive the state of the active mode, discarding the old one.
    fn reset_mode(&mut self) {
        self.last_feedback = None;
        self.show_wrong = false;
        match self.mode {
            Mode::Review => {
                self.review = ReviewSession::new(shuffled(&self.records, &mut self.rng));
            }
            Mode::Quiz => {
                let questions = sample(&self.records, QUIZ_SIZE, &mut self.rng);
                self.quiz = QuizSession::new(questions, self.clock.now()).ok();
            }
        }
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("mode", &self.mode)
            .field("records_len", &self.records.len())
            .field("review_total", &self.review.total())
            .field("quiz_total", &self.quiz.as_ref().map(QuizSession::total))
            .finish_non_exhaustive()
    }
}

/// Build a deterministic RNG for tests without naming `StdRng` everywhere.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
