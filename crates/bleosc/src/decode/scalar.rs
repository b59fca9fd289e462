//! Raw scalar decoder
//!
//! Payload layout (4 bytes): one `i32`, little-endian. The original
//! deployment read this through pointer reinterpretation without declaring
//! a byte order; little-endian is fixed here as the wire convention.

use super::DecodeError;
use crate::osc::{OscArg, TelemetrySink};
use byteorder::{ByteOrder, LittleEndian};
use log::warn;

pub const SCALAR_PAYLOAD_LEN: usize = 4;

/// Decodes single-integer notifications and forwards each one to a sink.
pub struct ScalarDecoder<S> {
    sink: S,
    path: String,
}

impl<S: TelemetrySink> ScalarDecoder<S> {
    pub fn new(sink: S, path: impl Into<String>) -> Self {
        Self {
            sink,
            path: path.into(),
        }
    }

    pub fn decode(&self, value: &[u8]) -> Result<i32, DecodeError> {
        if value.len() != SCALAR_PAYLOAD_LEN {
            return Err(DecodeError::UnexpectedLength {
                expected: SCALAR_PAYLOAD_LEN,
                actual: value.len(),
            });
        }

        Ok(LittleEndian::read_i32(value))
    }

    /// Registry adapter: decode, forward, log failures, never propagate.
    pub fn on_notification(&mut self, _handle: u16, value: &[u8]) {
        let sample = match self.decode(value) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("dropping scalar frame: {}", e);
                return;
            }
        };

        if let Err(e) = self.sink.send(&self.path, &[OscArg::Int(sample)]) {
            warn!("telemetry send failed: {}", e);
        }
    }
}
