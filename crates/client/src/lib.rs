//! Connection plumbing between a chat transport and the dispatcher:
//! the transport seam, the swappable per-session reply sink, and the
//! reconnect supervisor that keeps a network session alive.

pub mod reconnect;
pub mod sink;
pub mod transport;

pub use {
    reconnect::run_network,
    sink::SessionSink,
    transport::{Connection, Inbound, Transport},
};
