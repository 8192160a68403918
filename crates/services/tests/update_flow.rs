use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use services::cache::{CacheManager, DATA_PATH};
use services::error::{FetchError, UpdateCheckError};
use services::fetcher::{FetchedResource, ResourceFetcher};
use services::loader::VocabLoader;
use services::sessions::{InputEvent, Mode, SessionService, seeded_rng};
use services::update::{UpdateOutcome, UpdateService};
use storage::repository::{CacheRepository, InMemoryRepository};
use vocab_core::time::fixed_clock;

struct StubFetcher {
    responses: Mutex<HashMap<String, FetchedResource>>,
    offline: AtomicBool,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    fn serve_data(&self, body: &str, etag: Option<&str>) {
        self.responses.lock().unwrap().insert(
            DATA_PATH.to_owned(),
            FetchedResource {
                path: DATA_PATH.to_owned(),
                body: body.as_bytes().to_vec(),
                etag: etag.map(str::to_owned),
                content_type: Some("text/csv".to_owned()),
            },
        );
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn lookup(&self, path: &str) -> Result<FetchedResource, FetchError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::HttpStatus {
                path: path.to_owned(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        self.responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                path: path.to_owned(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

#[async_trait]
impl ResourceFetcher for StubFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchedResource, FetchError> {
        self.lookup(path)
    }

    async fn fetch_no_store(&self, path: &str) -> Result<FetchedResource, FetchError> {
        self.lookup(path)
    }
}

struct Harness {
    fetcher: Arc<StubFetcher>,
    repo: InMemoryRepository,
    cache: Arc<CacheManager>,
    updates: UpdateService,
}

fn harness() -> Harness {
    let fetcher = Arc::new(StubFetcher::new());
    let repo = InMemoryRepository::new();
    let entries: Arc<dyn CacheRepository> = Arc::new(repo.clone());
    let remote: Arc<dyn ResourceFetcher> = fetcher.clone();
    let cache = Arc::new(CacheManager::new(entries, remote, fixed_clock()));
    let loader = Arc::new(VocabLoader::new(Arc::clone(&cache)));
    let updates = UpdateService::new(Arc::clone(&cache), loader);
    Harness {
        fetcher,
        repo,
        cache,
        updates,
    }
}

const DATA_V1: &str = "id,q,a,s\n1,犬,いぬ,1\n";
const DATA_V2: &str = "id,q,a,s\n1,犬,いぬ,1\n2,猫,ねこ,1\n";

#[tokio::test]
async fn matching_etags_report_already_current() {
    let h = harness();
    h.fetcher.serve_data(DATA_V1, Some("v1"));
    h.cache.fetch(DATA_PATH).await.expect("prime cache");

    let outcome = h.updates.check_for_update().await.expect("check");
    assert_eq!(outcome, UpdateOutcome::AlreadyCurrent);
}

#[tokio::test]
async fn changed_etag_reloads_and_overwrites_cache() {
    let h = harness();
    h.fetcher.serve_data(DATA_V1, Some("v1"));
    h.cache.fetch(DATA_PATH).await.expect("prime cache");

    h.fetcher.serve_data(DATA_V2, Some("v2"));
    let outcome = h.updates.check_for_update().await.expect("check");
    let UpdateOutcome::Updated { records } = outcome else {
        panic!("expected an update");
    };
    assert_eq!(records.len(), 2);

    let entry = h
        .repo
        .get_entry(h.cache.version(), DATA_PATH)
        .await
        .unwrap()
        .expect("overwritten entry");
    assert_eq!(entry.etag.as_deref(), Some("v2"));
}

#[tokio::test]
async fn missing_cached_copy_counts_as_update() {
    let h = harness();
    h.fetcher.serve_data(DATA_V1, Some("v1"));

    let outcome = h.updates.check_for_update().await.expect("check");
    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    assert!(
        h.repo
            .get_entry(h.cache.version(), DATA_PATH)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn network_failure_is_check_failed_not_already_current() {
    let h = harness();
    h.fetcher.serve_data(DATA_V1, Some("v1"));
    h.cache.fetch(DATA_PATH).await.expect("prime cache");
    h.fetcher.go_offline();

    let err = h.updates.check_for_update().await.unwrap_err();
    assert!(matches!(err, UpdateCheckError::CheckFailed(_)));
}

#[tokio::test]
async fn update_outcome_feeds_a_session_reset() {
    let h = harness();
    h.fetcher.serve_data(DATA_V1, Some("v1"));
    h.cache.fetch(DATA_PATH).await.expect("prime cache");

    let mut session = SessionService::with_rng(
        vocab_core::csv::parse_active_records(DATA_V1),
        fixed_clock(),
        seeded_rng(21),
    );
    session.apply(InputEvent::SelectMode(Mode::Quiz));
    assert_eq!(session.quiz().unwrap().total(), 1);

    h.fetcher.serve_data(DATA_V2, Some("v2"));
    match h.updates.check_for_update().await.expect("check") {
        UpdateOutcome::Updated { records } => session.reload(records),
        UpdateOutcome::AlreadyCurrent => panic!("expected an update"),
    }

    let quiz = session.quiz().expect("quiz re-derived");
    assert_eq!(quiz.total(), 2);
    assert!(quiz.answers().is_empty());
}

#[tokio::test]
async fn loader_falls_back_when_everything_is_unreachable() {
    let h = harness();
    h.fetcher.go_offline();

    let loader = VocabLoader::new(Arc::clone(&h.cache));
    let records = loader.load().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question(), "犬");
}
