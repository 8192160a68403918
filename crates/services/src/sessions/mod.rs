mod quiz;
mod review;
mod service;
mod shuffle;
mod view;

pub use quiz::{QUIZ_SIZE, QuizSession};
pub use review::ReviewSession;
pub use service::{Mode, SessionService, seeded_rng};
pub use shuffle::{sample, shuffled};
pub use view::{InputEvent, QuizFeedback, SessionView};
