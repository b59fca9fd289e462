//! Attribute Protocol (ATT) client implementation
//!
//! This module implements the client side of the ATT protocol as carried
//! over the L2CAP fixed channel: write requests, notification receipt and
//! the blocking read-dispatch event loop.

pub mod client;
pub mod constants;
pub mod frame;
pub mod registry;
#[cfg(test)]
mod tests;

// Re-export the public API
pub use self::client::{Connection, PendingId, WriteCallback};
pub use self::constants::*;
pub use self::frame::AttFrame;
pub use self::registry::{HandleFilter, NotificationCallback, NotificationRegistry};
