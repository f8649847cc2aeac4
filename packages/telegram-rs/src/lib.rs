// Minimal Telegram Bot API client: long polling, messages, photos, callback acks.
// https://core.telegram.org/bots/api

use std::time::Duration;

pub mod models;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::models::{
    CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, PhotoSize, Update,
    User,
};
use crate::models::{
    AnswerCallbackQueryRequest, ApiResponse, GetUpdatesRequest, SendMessageRequest,
    SendPhotoRequest,
};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Errors surfaced by the Bot API.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("request timed out")]
    Timeout,

    #[error("Telegram returned an error ({code}): {description}")]
    Api { code: u16, description: String },

    #[error("request to Telegram failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("failed to parse Telegram response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TelegramError::Timeout
        } else {
            TelegramError::Http(err)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    pub api_base: Option<String>,
    /// Upper bound for a single non-polling request.
    pub request_timeout: Duration,
}

impl TelegramOptions {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        let base = self
            .options
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/bot{}/{}", base, self.options.bot_token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let envelope = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| TelegramError::Decode(format!("{} ({})", e, status)))?;

        if envelope.ok {
            return envelope
                .result
                .ok_or_else(|| TelegramError::Decode(format!("{} returned no result", method)));
        }

        let code = envelope.error_code.unwrap_or(status.as_u16());
        if let Some(retry_after) = envelope.parameters.and_then(|p| p.retry_after) {
            return Err(TelegramError::RateLimited { retry_after });
        }
        Err(TelegramError::Api {
            code,
            description: envelope.description.unwrap_or_default(),
        })
    }

    /// Long-poll for updates. `timeout` is the server-side wait in seconds.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message", "callback_query"],
        };
        // Leave headroom over the server-side wait so the HTTP layer does not cut it short.
        let http_timeout = Duration::from_secs(timeout) + self.options.request_timeout;
        self.call("getUpdates", &body, http_timeout).await
    }

    pub async fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            reply_markup,
        };
        self.call("sendMessage", &body, self.options.request_timeout)
            .await
    }

    /// Send a photo by file id (a photo previously uploaded to Telegram).
    pub async fn send_photo(
        &self,
        chat_id: &ChatId,
        photo: &str,
        caption: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let body = SendPhotoRequest {
            chat_id,
            photo,
            caption,
            reply_markup,
        };
        self.call("sendPhoto", &body, self.options.request_timeout)
            .await
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<bool, TelegramError> {
        let body = AnswerCallbackQueryRequest {
            callback_query_id,
            text,
        };
        self.call("answerCallbackQuery", &body, self.options.request_timeout)
            .await
    }
}
