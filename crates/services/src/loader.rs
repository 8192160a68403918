use std::sync::Arc;

use vocab_core::csv::parse_active_records;
use vocab_core::model::{RecordStatus, VocabRecord};

use crate::cache::{CacheManager, DATA_PATH};

/// Loads the vocabulary data file into active in-memory records.
///
/// Requests go through the cache manager, so a network outage transparently
/// falls back to the last cached copy. When neither source yields usable
/// records the loader substitutes a minimal built-in set instead of failing,
/// keeping the application functional with degraded content.
pub struct VocabLoader {
    cache: Arc<CacheManager>,
}

impl VocabLoader {
    #[must_use]
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Fetch and parse the data file, filtered to active records.
    ///
    /// Infallible by design: every failure path ends in the built-in
    /// fallback set, reported on the diagnostic channel only.
    pub async fn load(&self) -> Vec<VocabRecord> {
        match self.cache.fetch(DATA_PATH).await {
            Ok(served) => {
                let records = parse_active_records(&served.resource.body_text());
                if records.is_empty() {
                    tracing::warn!(
                        served_from = ?served.served_from,
                        "data file yielded no active records, using fallback set"
                    );
                    fallback_records()
                } else {
                    tracing::info!(
                        count = records.len(),
                        served_from = ?served.served_from,
                        "vocabulary loaded"
                    );
                    records
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "data load failed, using fallback set");
                fallback_records()
            }
        }
    }
}

/// Minimal built-in data set used when the real one cannot be loaded.
#[must_use]
pub fn fallback_records() -> Vec<VocabRecord> {
    vec![VocabRecord::new(1, "犬", "いぬ", RecordStatus::Active)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_a_single_active_record() {
        let records = fallback_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question(), "犬");
        assert_eq!(records[0].answer(), "いぬ");
        assert!(records[0].is_active());
    }
}
