use serde::{Deserialize, Serialize};

use crate::model::VocabRecord;

//
// ─── ANSWER GRADING ────────────────────────────────────────────────────────────
//

/// Outcome of comparing a submitted answer against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCheck {
    Correct,
    Incorrect,
}

impl AnswerCheck {
    /// Grades `input` against `expected`.
    ///
    /// The input is trimmed of leading/trailing whitespace, then compared for
    /// exact, case-sensitive string equality. No normalization beyond the trim.
    #[must_use]
    pub fn grade(input: &str, expected: &str) -> Self {
        if input.trim() == expected {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// One submitted quiz answer, kept for the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl QuizAnswer {
    /// Grades `input` against the record and captures the exchange.
    ///
    /// The stored `user_answer` is the trimmed input, matching what was
    /// actually compared.
    #[must_use]
    pub fn grade(record: &VocabRecord, input: &str) -> Self {
        let trimmed = input.trim();
        let check = AnswerCheck::grade(trimmed, record.answer());
        Self {
            question: record.question().to_owned(),
            user_answer: trimmed.to_owned(),
            correct_answer: record.answer().to_owned(),
            is_correct: check.is_correct(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordStatus;

    fn record() -> VocabRecord {
        VocabRecord::new(1, "犬", "いぬ", RecordStatus::Active)
    }

    #[test]
    fn exact_match_is_correct() {
        assert!(QuizAnswer::grade(&record(), "いぬ").is_correct);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert!(QuizAnswer::grade(&record(), " いぬ ").is_correct);
    }

    #[test]
    fn comparison_is_case_and_script_sensitive() {
        assert!(!QuizAnswer::grade(&record(), "イヌ").is_correct);
        assert!(!QuizAnswer::grade(&record(), "inu").is_correct);
    }

    #[test]
    fn captured_answer_is_the_trimmed_input() {
        let answer = QuizAnswer::grade(&record(), "  ねこ ");
        assert_eq!(answer.user_answer, "ねこ");
        assert_eq!(answer.question, "犬");
        assert_eq!(answer.correct_answer, "いぬ");
        assert!(!answer.is_correct);
    }
}
