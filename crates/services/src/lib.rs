#![forbid(unsafe_code)]

pub mod app_services;
pub mod cache;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod sessions;
pub mod update;

pub use vocab_core::Clock;

pub use app_services::AppServices;
pub use cache::{CACHE_VERSION, CacheManager, DATA_PATH, ServedFrom, ServedResource};
pub use error::{
    AppServicesError, CacheServiceError, FetchError, SessionError, UpdateCheckError,
};
pub use fetcher::{FetchedResource, HttpFetcher, ResourceFetcher};
pub use loader::VocabLoader;
pub use sessions::{
    InputEvent, Mode, QUIZ_SIZE, QuizFeedback, QuizSession, ReviewSession, SessionService,
    SessionView,
};
pub use update::{UpdateOutcome, UpdateService};
