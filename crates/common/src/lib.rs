//! Shared types used across all burrow crates: the message envelope,
//! the reply sink contract, and the per-network session handle.

pub mod error;
pub mod message;
pub mod session;
pub mod util;

pub use {
    error::{Error, Result},
    message::{Message, ReplySink},
    session::Session,
};

/// Human-readable version string, used by the `version` command.
#[must_use]
pub fn version_string() -> String {
    format!("burrow v{}", env!("CARGO_PKG_VERSION"))
}
