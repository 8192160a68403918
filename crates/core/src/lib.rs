#![forbid(unsafe_code)]

pub mod csv;
pub mod model;
pub mod time;

pub use csv::{ParseRowError, parse_active_records, parse_records, parse_row};
pub use model::{AnswerCheck, QuizAnswer, RecordStatus, VocabRecord};
pub use time::{Clock, FIXED_TEST_TIMESTAMP, fixed_clock, fixed_now};
