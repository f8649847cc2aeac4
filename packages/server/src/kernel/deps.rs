//! Server dependencies for the submission handler (using traits for testability)
//!
//! This module provides the central dependency container. The chat transport
//! and the session store sit behind traits so tests can swap them.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use telegram::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, TelegramError, TelegramService};

use crate::domains::submissions::{ContentPolicy, FanoutResolver};
use crate::kernel::{
    BaseChatTransport, BaseSessionStore, Button, DeliveryError, Outbound, OutboundContent, Target,
};

// =============================================================================
// TelegramService Adapter (implements BaseChatTransport trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseChatTransport trait
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

fn chat_id(target: &Target) -> ChatId {
    match target {
        Target::User(id) => ChatId::from(*id),
        Target::Channel(name) => match name.parse::<i64>() {
            Ok(id) => ChatId::from(id),
            Err(_) => ChatId::from(name.as_str()),
        },
    }
}

fn keyboard_markup(rows: &[Vec<Button>]) -> Option<InlineKeyboardMarkup> {
    if rows.is_empty() {
        return None;
    }
    Some(InlineKeyboardMarkup {
        inline_keyboard: rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton {
                        text: b.text.clone(),
                        callback_data: b.callback_data.clone(),
                    })
                    .collect()
            })
            .collect(),
    })
}

impl From<TelegramError> for DeliveryError {
    fn from(error: TelegramError) -> Self {
        match error {
            TelegramError::RateLimited { retry_after } => DeliveryError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            },
            TelegramError::Timeout => DeliveryError::TimedOut,
            other => DeliveryError::Fatal(other.to_string()),
        }
    }
}

#[async_trait]
impl BaseChatTransport for TelegramAdapter {
    async fn deliver(&self, message: &Outbound) -> Result<(), DeliveryError> {
        let chat_id = chat_id(&message.target);
        match &message.content {
            OutboundContent::Text { text, keyboard } => {
                let markup = keyboard_markup(keyboard);
                self.0
                    .send_message(&chat_id, text, markup.as_ref())
                    .await?;
            }
            OutboundContent::Photo { image, caption } => {
                self.0
                    .send_photo(&chat_id, image.as_str(), caption, None)
                    .await?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Retry timing for channel deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySettings {
    /// Wait before the single retry after a timeout. Rate limits use the
    /// server-provided delay instead.
    pub timeout_backoff: Duration,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            timeout_backoff: Duration::from_secs(5),
        }
    }
}

/// Server dependencies accessible to the handler and effects
#[derive(Clone)]
pub struct ServerDeps {
    pub transport: Arc<dyn BaseChatTransport>,
    pub sessions: Arc<dyn BaseSessionStore>,
    /// Ad keywords, copyright keywords and suspicious domains.
    pub policy: ContentPolicy,
    /// Channel table; read-only after startup.
    pub resolver: FanoutResolver,
    pub delivery: DeliverySettings,
}

impl ServerDeps {
    pub fn new(
        transport: Arc<dyn BaseChatTransport>,
        sessions: Arc<dyn BaseSessionStore>,
        policy: ContentPolicy,
        resolver: FanoutResolver,
        delivery: DeliverySettings,
    ) -> Self {
        Self {
            transport,
            sessions,
            policy,
            resolver,
            delivery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_targets_map_to_chat_ids() {
        assert_eq!(
            chat_id(&Target::Channel("@yunpanNB".to_string())),
            ChatId::Username("@yunpanNB".to_string())
        );
        assert_eq!(
            chat_id(&Target::Channel("-1001234567890".to_string())),
            ChatId::Id(-1001234567890)
        );
        assert_eq!(chat_id(&Target::User(42)), ChatId::Id(42));
    }

    #[test]
    fn test_empty_keyboard_sends_no_markup() {
        assert!(keyboard_markup(&[]).is_none());

        let markup = keyboard_markup(&[vec![Button::new("◀️ 返回", "back_to_main")]]).unwrap();
        assert_eq!(markup.inline_keyboard[0][0].callback_data, "back_to_main");
    }

    #[test]
    fn test_telegram_errors_map_to_delivery_classes() {
        assert_eq!(
            DeliveryError::from(TelegramError::RateLimited { retry_after: 7 }),
            DeliveryError::RateLimited {
                retry_after: Duration::from_secs(7)
            }
        );
        assert_eq!(
            DeliveryError::from(TelegramError::Timeout),
            DeliveryError::TimedOut
        );
        assert!(matches!(
            DeliveryError::from(TelegramError::Api {
                code: 400,
                description: "chat not found".to_string()
            }),
            DeliveryError::Fatal(_)
        ));
    }
}
