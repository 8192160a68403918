use vocab_core::model::VocabRecord;

/// Review-mode state: a shuffled card sequence, a wrapping cursor, and the
/// reveal flag for the current card.
///
/// The caller shuffles; this type only navigates. An empty card set is legal
/// (data not loaded yet) and every operation degrades to a no-op for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    cards: Vec<VocabRecord>,
    current: usize,
    revealed: bool,
}

impl ReviewSession {
    #[must_use]
    pub fn new(cards: Vec<VocabRecord>) -> Self {
        Self {
            cards,
            current: 0,
            revealed: false,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Zero-based cursor position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// The card under the cursor, `None` while no data is loaded.
    #[must_use]
    pub fn current_card(&self) -> Option<&VocabRecord> {
        self.cards.get(self.current)
    }

    /// Advance with wraparound; hides any revealed answer.
    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.cards.len();
        self.revealed = false;
    }

    /// Step back with wraparound; hides any revealed answer.
    pub fn prev(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.current = (self.current + self.cards.len() - 1) % self.cards.len();
        self.revealed = false;
    }

    /// Toggle the answer display for the current card only.
    pub fn reveal(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.revealed = !self.revealed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::RecordStatus;

    fn session(n: u64) -> ReviewSession {
        let cards = (1..=n)
            .map(|i| VocabRecord::new(i, format!("q{i}"), format!("a{i}"), RecordStatus::Active))
            .collect();
        ReviewSession::new(cards)
    }

    #[test]
    fn next_wraps_after_full_cycle() {
        let mut review = session(5);
        for _ in 0..5 {
            review.next();
        }
        assert_eq!(review.position(), 0);
    }

    #[test]
    fn prev_wraps_from_the_start() {
        let mut review = session(5);
        review.prev();
        assert_eq!(review.position(), 4);
        review.next();
        assert_eq!(review.position(), 0);
    }

    #[test]
    fn navigation_resets_reveal() {
        let mut review = session(3);
        review.reveal();
        assert!(review.revealed());
        review.next();
        assert!(!review.revealed());

        review.reveal();
        review.prev();
        assert!(!review.revealed());
    }

    #[test]
    fn reveal_toggles_without_moving_cursor() {
        let mut review = session(3);
        review.reveal();
        review.reveal();
        assert!(!review.revealed());
        assert_eq!(review.position(), 0);
    }

    #[test]
    fn empty_session_tolerates_everything() {
        let mut review = ReviewSession::new(Vec::new());
        review.next();
        review.prev();
        review.reveal();
        assert!(review.current_card().is_none());
        assert!(!review.revealed());
        assert_eq!(review.position(), 0);
    }

    #[test]
    fn single_card_cycles_onto_itself() {
        let mut review = session(1);
        review.next();
        assert_eq!(review.position(), 0);
        review.prev();
        assert_eq!(review.position(), 0);
    }
}
