//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod session_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{DeliverySettings, ServerDeps, TelegramAdapter};
pub use session_store::InMemorySessionStore;
pub use test_dependencies::{MockChatTransport, TestDependencies};
pub use traits::*;
