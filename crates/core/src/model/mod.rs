mod answer;
mod record;

pub use answer::{AnswerCheck, QuizAnswer};
pub use record::{RecordStatus, VocabRecord};
