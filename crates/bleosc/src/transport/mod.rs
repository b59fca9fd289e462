//! Link-layer transport for the ATT channel
//!
//! This module owns the two socket handles behind a connection:
//! - the HCI controller socket, held open for the life of the link
//! - the L2CAP channel socket carrying ATT frames to one peripheral

pub mod addr;
pub mod socket;

// Re-export the public API
pub use self::addr::{AddressType, BdAddr};
pub use self::socket::{AttSocket, HciSocket};
