//! Submissions domain - contributor captions from intake to channel fan-out.
//!
//! ```text
//! raw caption → extraction::parse → SubmissionRecord
//!             → normalizer::render → canonical caption   (policy: copyright keywords)
//!             → policy::is_disallowed                    (policy: ads, suspicious links)
//!             → PendingDraft (session store)
//! confirm     → effects::publish → fanout::resolve → transport
//! ```
//!
//! The guided flow (machines) assembles the record one field per message and
//! then joins the same pipeline at `render`.

pub mod actions;
pub mod classifier;
pub mod edges;
pub mod effects;
pub mod errors;
pub mod events;
pub mod extraction;
pub mod fanout;
pub mod machines;
pub mod messages;
pub mod models;
pub mod normalizer;
pub mod policy;

pub use classifier::{classify, classify_all, LinkClassification, Provider};
pub use errors::SubmissionError;
pub use events::{BotCommand, CallbackAction, InboundEvent};
pub use fanout::{ChannelAssignment, ChannelConfig, FanoutPlan, FanoutResolver};
pub use models::*;
pub use policy::{ContentPolicy, PolicyConfig};
