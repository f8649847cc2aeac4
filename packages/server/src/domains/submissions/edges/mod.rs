//! Entry point for inbound chat events.

mod handler;

pub use handler::{HandlerOutcome, SubmissionHandler};
