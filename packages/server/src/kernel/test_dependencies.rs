// TestDependencies - mock implementations for testing
//
// Provides a recording chat transport that can be injected into ServerDeps
// for tests, together with the in-memory session store.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    BaseChatTransport, DeliveryError, DeliverySettings, InMemorySessionStore, Outbound,
    ServerDeps, Target,
};
use crate::domains::submissions::{ChannelConfig, ContentPolicy, FanoutResolver};

// =============================================================================
// Mock Chat Transport
// =============================================================================

pub struct MockChatTransport {
    delivered: Arc<Mutex<Vec<Outbound>>>,
    attempts: Arc<Mutex<Vec<Outbound>>>,
    /// Scripted failures per target, consumed one per attempt.
    failures: Arc<Mutex<HashMap<Target, VecDeque<DeliveryError>>>>,
}

impl MockChatTransport {
    pub fn new() -> Self {
        Self {
            delivered: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fail the next attempts to `channel_id` with `errors`, in order.
    pub fn with_channel_failures(self, channel_id: &str, errors: Vec<DeliveryError>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .entry(Target::Channel(channel_id.to_string()))
            .or_default()
            .extend(errors);
        self
    }

    /// Messages that went through
    pub fn delivered(&self) -> Vec<Outbound> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_to(&self, target: &Target) -> Vec<Outbound> {
        self.delivered()
            .into_iter()
            .filter(|m| &m.target == target)
            .collect()
    }

    /// Channel ids in delivery order
    pub fn channel_deliveries(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter_map(|m| match m.target {
                Target::Channel(id) => Some(id),
                Target::User(_) => None,
            })
            .collect()
    }

    /// Every call, including failed ones
    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

impl Default for MockChatTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseChatTransport for MockChatTransport {
    async fn deliver(&self, message: &Outbound) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(message.clone());

        let scripted = self
            .failures
            .lock()
            .unwrap()
            .get_mut(&message.target)
            .and_then(|queue| queue.pop_front());
        if let Some(error) = scripted {
            return Err(error);
        }

        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub transport: Arc<MockChatTransport>,
    pub sessions: Arc<InMemorySessionStore>,
    pub channels: ChannelConfig,
    pub policy: ContentPolicy,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(MockChatTransport::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            channels: ChannelConfig::default(),
            policy: ContentPolicy::default(),
        }
    }

    /// Set a mock transport
    pub fn mock_transport(mut self, transport: MockChatTransport) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn channels(mut self, channels: ChannelConfig) -> Self {
        self.channels = channels;
        self
    }

    /// Convert into ServerDeps. Retries never sleep.
    pub fn into_server_deps(self) -> Arc<ServerDeps> {
        Arc::new(ServerDeps::new(
            self.transport,
            self.sessions,
            self.policy,
            FanoutResolver::new(self.channels),
            DeliverySettings {
                timeout_backoff: Duration::ZERO,
            },
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
