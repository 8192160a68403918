use chrono::{DateTime, Utc};

use vocab_core::model::{QuizAnswer, VocabRecord};

use crate::error::SessionError;

/// Maximum number of questions drawn for one quiz.
pub const QUIZ_SIZE: usize = 20;

/// Quiz-mode state: a sampled question sequence, a monotone cursor, and the
/// append-only answer log.
///
/// The caller samples the questions (without replacement, capped at
/// [`QUIZ_SIZE`]); this type steps through them. The cursor never wraps:
/// answering the final question moves the quiz into its terminal results
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<VocabRecord>,
    current: usize,
    answers: Vec<QuizAnswer>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a quiz over an already-sampled question set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuiz` if no questions are provided.
    pub fn new(
        questions: Vec<VocabRecord>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }
        Ok(Self {
            questions,
            current: 0,
            answers: Vec::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based cursor position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The question under the cursor, `None` once the quiz is complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&VocabRecord> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// Exactly the incorrect answers, for the results review.
    #[must_use]
    pub fn wrong_answers(&self) -> Vec<&QuizAnswer> {
        self.answers.iter().filter(|a| !a.is_correct).collect()
    }

    /// Grade the submitted input against the current question and advance.
    ///
    /// Answering the last question records `answered_at` as the completion
    /// time and moves the quiz into its terminal state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizCompleted` if the quiz is already finished.
    pub fn submit(
        &mut self,
        input: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<&QuizAnswer, SessionError> {
        let Some(question) = self.current_question() else {
            return Err(SessionError::QuizCompleted);
        };

        let answer = QuizAnswer::grade(question, input);
        self.answers.push(answer);

        self.current += 1;
        if self.current >= self.questions.len() {
            self.completed_at = Some(answered_at);
        }

        self.answers.last().ok_or(SessionError::QuizCompleted)
    }
}
