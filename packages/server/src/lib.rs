// Cloud-drive resource contribution relay - core
//
// Parses contributor captions, enforces content policy, and fans accepted
// submissions out to the broadcast and per-provider channels.
//
// Domain logic lives in domains/submissions; transport and session storage
// sit behind the traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
