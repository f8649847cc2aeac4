//! Submissions domain effects - the only step that talks to channels.
//!
//! Flow on confirm:
//!   drafts → policy filter → fanout::resolve → deliver_with_retry (per assignment)

mod publish;

pub use publish::{deliver_with_retry, publish_drafts, PublishReport};
