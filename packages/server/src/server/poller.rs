//! Telegram long-polling loop.
//!
//! Each user gets a lane: an mpsc channel drained by its own task, so one
//! user's events run in order while other users proceed concurrently.
//! Routing never waits on a lane, so a slow user cannot stall polling.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use telegram::{TelegramError, TelegramService, Update};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::common::{ImageRef, UserId};
use crate::domains::submissions::edges::SubmissionHandler;
use crate::domains::submissions::{BotCommand, CallbackAction, InboundEvent};

const LANE_CAPACITY: usize = 32;
const LANE_IDLE: Duration = Duration::from_secs(600);
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Translate a Telegram update into an inbound event for its sender.
///
/// Unknown commands, unknown callback data and updates without a sender are
/// dropped.
pub fn translate(update: &Update) -> Option<(UserId, InboundEvent)> {
    if let Some(query) = &update.callback_query {
        let action = CallbackAction::from_data(query.data.as_deref()?)?;
        return Some((query.from.id, InboundEvent::Callback(action)));
    }

    let message = update.message.as_ref()?;
    let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(message.chat.id);

    if let Some(file_id) = message.largest_photo() {
        return Some((
            user_id,
            InboundEvent::Photo {
                image: ImageRef::new(file_id),
                caption: message.caption.clone(),
            },
        ));
    }

    let text = message.text.as_deref()?;
    if text.starts_with('/') {
        return BotCommand::parse(text).map(|command| (user_id, InboundEvent::Command(command)));
    }
    Some((user_id, InboundEvent::Text(text.to_string())))
}

struct Lane {
    tx: mpsc::Sender<InboundEvent>,
    last_used: Instant,
}

impl Lane {
    fn spawn(user_id: UserId, handler: Arc<SubmissionHandler>) -> Self {
        let (tx, mut rx) = mpsc::channel(LANE_CAPACITY);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let outcome = handler.handle(user_id, event).await;
                let transport = &handler.deps().transport;
                for directive in &outcome.directives {
                    if let Err(e) = transport.deliver(directive).await {
                        warn!(user_id, error = %e, "reply delivery failed");
                    }
                }
            }
            debug!(user_id, "lane finished");
        });

        Self {
            tx,
            last_used: Instant::now(),
        }
    }

    fn is_drained(&self) -> bool {
        self.tx.capacity() == self.tx.max_capacity()
    }
}

/// Per-user lanes. Sessions live in the session store, so a released lane
/// loses nothing; the next event simply starts a new one.
pub struct Lanes {
    handler: Arc<SubmissionHandler>,
    idle_after: Duration,
    lanes: HashMap<UserId, Lane>,
}

impl Lanes {
    pub fn new(handler: Arc<SubmissionHandler>, idle_after: Duration) -> Self {
        Self {
            handler,
            idle_after,
            lanes: HashMap::new(),
        }
    }

    /// Queue an event on the user's lane without waiting. Returns false when
    /// the event was dropped because the lane is full.
    pub fn route(&mut self, user_id: UserId, event: InboundEvent) -> bool {
        let now = Instant::now();
        let lane = self
            .lanes
            .entry(user_id)
            .or_insert_with(|| Lane::spawn(user_id, self.handler.clone()));

        match lane.tx.try_send(event) {
            Ok(()) => {
                lane.last_used = now;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(user_id, "lane full, event dropped");
                false
            }
            Err(TrySendError::Closed(event)) => {
                // The lane task died; start a fresh one for this user.
                warn!(user_id, "lane closed, restarting");
                let fresh = Lane::spawn(user_id, self.handler.clone());
                let queued = fresh.tx.try_send(event).is_ok();
                self.lanes.insert(user_id, fresh);
                queued
            }
        }
    }

    /// Release lanes that are closed, or drained and unused for the idle
    /// period. Dropping the sender ends the lane task.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.lanes.len();
        let idle_after = self.idle_after;
        self.lanes.retain(|_, lane| {
            let idle = now.saturating_duration_since(lane.last_used) >= idle_after;
            !lane.tx.is_closed() && !(idle && lane.is_drained())
        });
        before - self.lanes.len()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

pub struct Poller {
    telegram: Arc<TelegramService>,
    poll_timeout_secs: u64,
    lanes: Lanes,
}

impl Poller {
    pub fn new(
        telegram: Arc<TelegramService>,
        handler: Arc<SubmissionHandler>,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            telegram,
            poll_timeout_secs,
            lanes: Lanes::new(handler, LANE_IDLE),
        }
    }

    /// Poll until the process stops. Only startup failures are returned.
    pub async fn run(mut self) -> Result<()> {
        let mut offset = self
            .skip_pending()
            .await
            .context("Failed to reach the Telegram API")?;
        info!(offset = ?offset, "polling for updates");

        loop {
            let updates = match self
                .telegram
                .get_updates(offset, self.poll_timeout_secs)
                .await
            {
                Ok(updates) => updates,
                Err(TelegramError::RateLimited { retry_after }) => {
                    warn!(retry_after, "getUpdates rate limited");
                    tokio::time::sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "getUpdates failed");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                self.dispatch(update).await;
            }

            let released = self.lanes.prune(Instant::now());
            if released > 0 {
                debug!(released, active = self.lanes.len(), "idle lanes released");
            }
        }
    }

    /// Drop updates queued while the bot was down. Returns the first offset
    /// to poll from.
    async fn skip_pending(&self) -> Result<Option<i64>, TelegramError> {
        let pending = self.telegram.get_updates(Some(-1), 0).await?;
        Ok(pending.last().map(|u| u.update_id + 1))
    }

    async fn dispatch(&mut self, update: Update) {
        if let Some(query) = &update.callback_query {
            if let Err(e) = self.telegram.answer_callback_query(&query.id, None).await {
                debug!(error = %e, "callback ack failed");
            }
        }

        match translate(&update) {
            Some((user_id, event)) => {
                self.lanes.route(user_id, event);
            }
            None => debug!(update_id = update.update_id, "update ignored"),
        }
    }
}
