// Trait definitions for dependency injection
//
// Infrastructure only: the chat transport and the per-user session store.
// Submission logic lives in domains/submissions and talks to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseChatTransport)

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{ImageRef, UserId};
use crate::domains::submissions::models::{PendingDraft, SessionState};

// =============================================================================
// Outbound messages
// =============================================================================

/// Where a message goes: a submitter's private chat or a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    User(UserId),
    /// Channel username (`@name`) or numeric id as text.
    Channel(String),
}

/// Inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub callback_data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundContent {
    /// Text with an optional inline keyboard (rows of buttons).
    Text {
        text: String,
        keyboard: Vec<Vec<Button>>,
    },
    Photo { image: ImageRef, caption: String },
}

impl OutboundContent {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundContent::Text {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        OutboundContent::Text {
            text: text.into(),
            keyboard,
        }
    }

    /// Message text, or the photo caption.
    pub fn body(&self) -> &str {
        match self {
            OutboundContent::Text { text, .. } => text,
            OutboundContent::Photo { caption, .. } => caption,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub target: Target,
    pub content: OutboundContent,
}

impl Outbound {
    pub fn to_user(user_id: UserId, content: OutboundContent) -> Self {
        Self {
            target: Target::User(user_id),
            content,
        }
    }

    pub fn to_channel(channel_id: impl Into<String>, content: OutboundContent) -> Self {
        Self {
            target: Target::Channel(channel_id.into()),
            content,
        }
    }
}

// =============================================================================
// Chat Transport Trait (Infrastructure - message delivery)
// =============================================================================

/// Delivery failure classes. Only the first two are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("timed out")]
    TimedOut,

    #[error("{0}")]
    Fatal(String),
}

#[async_trait]
pub trait BaseChatTransport: Send + Sync {
    /// Send one message. No retries at this layer.
    async fn deliver(&self, message: &Outbound) -> Result<(), DeliveryError>;
}

// =============================================================================
// Session Store Trait (Infrastructure - per-user conversation state)
// =============================================================================

/// Per-user session state plus the ordered pending drafts.
///
/// Entries for different users are independent; callers serialize events for
/// the same user.
#[async_trait]
pub trait BaseSessionStore: Send + Sync {
    /// Current state, `Idle` for unknown users.
    async fn state(&self, user_id: UserId) -> SessionState;

    /// Replace the state. Setting `Idle` drops the entry.
    async fn set_state(&self, user_id: UserId, state: SessionState);

    async fn push_draft(&self, user_id: UserId, draft: PendingDraft);

    /// Pending drafts in submission order.
    async fn drafts(&self, user_id: UserId) -> Vec<PendingDraft>;

    /// Drop the first `count` drafts (the ones already processed).
    async fn remove_drafts(&self, user_id: UserId, count: usize);

    async fn clear_drafts(&self, user_id: UserId);

    /// Users with a live guided flow or pending drafts.
    async fn session_count(&self) -> usize;
}
