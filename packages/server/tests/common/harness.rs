//! Test harness: the submission handler wired to the in-memory session store
//! and a recording transport.

use std::sync::Arc;

use panshare_core::common::UserId;
use panshare_core::domains::submissions::edges::{HandlerOutcome, SubmissionHandler};
use panshare_core::domains::submissions::InboundEvent;
use panshare_core::kernel::{MockChatTransport, TestDependencies};
use test_context::AsyncTestContext;

pub const USER: UserId = 1001;

pub struct TestHarness {
    pub handler: SubmissionHandler,
    pub transport: Arc<MockChatTransport>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_transport(MockChatTransport::new())
    }

    async fn teardown(self) {
        // Everything is in memory
    }
}

impl TestHarness {
    /// Harness whose transport fails as scripted.
    pub fn with_transport(transport: MockChatTransport) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::new().mock_transport(transport);
        let transport = deps.transport.clone();
        Self {
            handler: SubmissionHandler::new(deps.into_server_deps()),
            transport,
        }
    }

    pub async fn send(&self, event: InboundEvent) -> HandlerOutcome {
        self.handler.handle(USER, event).await
    }

    /// Send several events in order and return the last outcome.
    pub async fn send_all(&self, events: Vec<InboundEvent>) -> HandlerOutcome {
        let mut last = None;
        for event in events {
            last = Some(self.send(event).await);
        }
        last.expect("send_all needs at least one event")
    }
}
