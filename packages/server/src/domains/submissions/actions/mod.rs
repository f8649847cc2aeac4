//! Submissions domain actions - business logic functions
//!
//! Actions are synchronous and pure: text in, canonical caption or
//! `SubmissionError` out. Storing drafts and replying happen in the handler.

mod intake;

pub use intake::{accept_caption, complete_guided};
