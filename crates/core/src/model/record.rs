use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── VOCABULARY RECORDS ────────────────────────────────────────────────────────
//

/// Lifecycle flag for a vocabulary entry.
///
/// Only `Active` records enter the review/quiz universe; `Inactive` rows are
/// kept in the data file but never shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Inactive,
    Active,
}

impl RecordStatus {
    /// Maps the numeric status column of the data file (0 or 1).
    ///
    /// Any other value is treated as malformed and rejected so the row can be
    /// skipped during parsing.
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Inactive),
            1 => Some(Self::Active),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// One vocabulary entry as loaded from the data file.
///
/// Records are immutable once loaded; the full active set is the study
/// universe for a session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRecord {
    id: u64,
    question: String,
    answer: String,
    status: RecordStatus,
}

impl VocabRecord {
    #[must_use]
    pub fn new(
        id: u64,
        question: impl Into<String>,
        answer: impl Into<String>,
        status: RecordStatus,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            status,
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl fmt::Debug for VocabRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VocabRecord({}, {:?} -> {:?}, {:?})",
            self.id, self.question, self.answer, self.status
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_zero_and_one_only() {
        assert_eq!(RecordStatus::from_raw(0), Some(RecordStatus::Inactive));
        assert_eq!(RecordStatus::from_raw(1), Some(RecordStatus::Active));
        assert_eq!(RecordStatus::from_raw(2), None);
        assert_eq!(RecordStatus::from_raw(-1), None);
    }

    #[test]
    fn record_exposes_fields() {
        let record = VocabRecord::new(7, "犬", "いぬ", RecordStatus::Active);
        assert_eq!(record.id(), 7);
        assert_eq!(record.question(), "犬");
        assert_eq!(record.answer(), "いぬ");
        assert!(record.is_active());
    }
}
