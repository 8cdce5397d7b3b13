//! Interview bookkeeping: the per-session record, the store that holds it,
//! the answer heuristics and the interviewer that drives a turn.
pub mod interviewer;
pub mod persona;
pub mod session;
pub mod store;

pub use interviewer::{InterviewError, InterviewPolicy, Interviewer, Turn};
pub use persona::{NextAction, Persona};
pub use session::Session;
pub use store::{InMemorySessionStore, SessionStore};

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
