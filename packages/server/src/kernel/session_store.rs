use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::common::UserId;
use crate::domains::submissions::models::{PendingDraft, SessionState};
use crate::kernel::BaseSessionStore;

#[derive(Debug, Default, Clone)]
struct UserSession {
    state: SessionState,
    drafts: Vec<PendingDraft>,
}

impl UserSession {
    fn is_empty(&self) -> bool {
        self.state.is_idle() && self.drafts.is_empty()
    }
}

/// In-memory session store
///
/// Nothing survives a restart. Entries are dropped once the user is idle with
/// no pending drafts.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<UserId, UserSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Apply `f` to the user's entry, creating it if needed, and drop the
    /// entry again if it ends up empty.
    async fn update<F>(&self, user_id: UserId, f: F)
    where
        F: FnOnce(&mut UserSession) + Send,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id).or_default();
        f(session);
        if session.is_empty() {
            sessions.remove(&user_id);
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSessionStore for InMemorySessionStore {
    async fn state(&self, user_id: UserId) -> SessionState {
        let sessions = self.sessions.read().await;
        sessions
            .get(&user_id)
            .map(|s| s.state.clone())
            .unwrap_or_default()
    }

    async fn set_state(&self, user_id: UserId, state: SessionState) {
        self.update(user_id, |session| session.state = state).await;
    }

    async fn push_draft(&self, user_id: UserId, draft: PendingDraft) {
        self.update(user_id, |session| session.drafts.push(draft))
            .await;
    }

    async fn drafts(&self, user_id: UserId) -> Vec<PendingDraft> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&user_id)
            .map(|s| s.drafts.clone())
            .unwrap_or_default()
    }

    async fn remove_drafts(&self, user_id: UserId, count: usize) {
        self.update(user_id, |session| {
            let count = count.min(session.drafts.len());
            session.drafts.drain(..count);
        })
        .await;
    }

    async fn clear_drafts(&self, user_id: UserId) {
        self.update(user_id, |session| session.drafts.clear()).await;
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
