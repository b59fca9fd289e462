//! Sensor payload decoders
//!
//! Each decoder turns the value bytes of one notification frame into a
//! typed sample and forwards it to a telemetry sink. The layouts are
//! fixed per deployment; a decoder is registered against a connection
//! rather than selected at runtime.
//!
//! Length mismatches are logged and the frame dropped; they never abort
//! the BLE path.

pub mod nine_axis;
pub mod quaternion;
pub mod scalar;
pub mod triple;

// Re-export the public API
pub use self::nine_axis::{NineAxisDecoder, AXIS_NAMES, NINE_AXIS_PAYLOAD_LEN};
pub use self::quaternion::{Quaternion, QuaternionDecoder, QUATERNION_PAYLOAD_LEN};
pub use self::scalar::{ScalarDecoder, SCALAR_PAYLOAD_LEN};
pub use self::triple::{TripleAxisDecoder, TripleAxisSample, TRIPLE_AXIS_PAYLOAD_LEN};

use thiserror::Error;

/// Non-fatal decode failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected payload length: expected {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },
}

/// Tracks the one-byte sequence counter some payloads carry, to detect
/// packet loss across successive notifications on one connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceTracker {
    last: Option<u8>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `seq` and returns how many frames were lost since the
    /// previous one, if any. The first observation never reports a gap.
    pub fn observe(&mut self, seq: u8) -> Option<u8> {
        let lost = match self.last {
            Some(prev) if seq != prev.wrapping_add(1) => {
                Some(seq.wrapping_sub(prev).wrapping_sub(1))
            }
            _ => None,
        };
        self.last = Some(seq);
        lost
    }
}
