//! Named 9-axis decoder
//!
//! Payload layout (18 bytes): nine big-endian `i16` readings in a fixed
//! order. Each reading goes to its own sink destination, formed by
//! concatenating the base path with the axis name.

use super::DecodeError;
use crate::osc::{OscArg, TelemetrySink};
use byteorder::{BigEndian, ByteOrder};
use log::warn;

pub const NINE_AXIS_PAYLOAD_LEN: usize = 18;

/// Axis names in payload order.
pub const AXIS_NAMES: [&str; 9] = [
    "accel_x", "accel_y", "accel_z", "mag_x", "mag_y", "mag_z", "gyro_x", "gyro_y", "gyro_z",
];

/// Decodes 9-axis notifications, fanning each reading out to
/// `base_path + axis name`.
pub struct NineAxisDecoder<S> {
    sink: S,
    base_path: String,
}

impl<S: TelemetrySink> NineAxisDecoder<S> {
    /// `base_path` is concatenated with each axis name as-is, so it should
    /// carry its own trailing separator (e.g. `"/imu/"`).
    pub fn new(sink: S, base_path: impl Into<String>) -> Self {
        Self {
            sink,
            base_path: base_path.into(),
        }
    }

    pub fn decode(&self, value: &[u8]) -> Result<[i16; 9], DecodeError> {
        if value.len() != NINE_AXIS_PAYLOAD_LEN {
            return Err(DecodeError::UnexpectedLength {
                expected: NINE_AXIS_PAYLOAD_LEN,
                actual: value.len(),
            });
        }

        let mut values = [0i16; 9];
        for (i, reading) in values.iter_mut().enumerate() {
            *reading = BigEndian::read_i16(&value[2 * i..]);
        }

        Ok(values)
    }

    /// Registry adapter: decode, forward, log failures, never propagate.
    pub fn on_notification(&mut self, _handle: u16, value: &[u8]) {
        let values = match self.decode(value) {
            Ok(values) => values,
            Err(e) => {
                warn!("dropping 9-axis frame: {}", e);
                return;
            }
        };

        for (name, reading) in AXIS_NAMES.iter().zip(values) {
            let path = format!("{}{}", self.base_path, name);
            if let Err(e) = self.sink.send(&path, &[OscArg::Int(i32::from(reading))]) {
                warn!("telemetry send failed: {}", e);
            }
        }
    }
}
