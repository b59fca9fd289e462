//! Fixed triple-axis decoder
//!
//! Payload layout (9 bytes): `[seq:u8]` followed by four big-endian `i16`
//! readings, forwarded as one four-field message.

use super::DecodeError;
use crate::osc::{OscArg, TelemetrySink};
use byteorder::{BigEndian, ByteOrder};
use log::warn;

pub const TRIPLE_AXIS_PAYLOAD_LEN: usize = 9;

/// One decoded triple-axis sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripleAxisSample {
    pub seq: u8,
    pub values: [i16; 4],
}

/// Decodes triple-axis notifications and forwards them to a sink.
pub struct TripleAxisDecoder<S> {
    sink: S,
    path: String,
}

impl<S: TelemetrySink> TripleAxisDecoder<S> {
    pub fn new(sink: S, path: impl Into<String>) -> Self {
        Self {
            sink,
            path: path.into(),
        }
    }

    pub fn decode(&self, value: &[u8]) -> Result<TripleAxisSample, DecodeError> {
        if value.len() != TRIPLE_AXIS_PAYLOAD_LEN {
            return Err(DecodeError::UnexpectedLength {
                expected: TRIPLE_AXIS_PAYLOAD_LEN,
                actual: value.len(),
            });
        }

        let mut values = [0i16; 4];
        for (i, reading) in values.iter_mut().enumerate() {
            *reading = BigEndian::read_i16(&value[1 + 2 * i..]);
        }

        Ok(TripleAxisSample {
            seq: value[0],
            values,
        })
    }

    /// Registry adapter: decode, forward, log failures, never propagate.
    pub fn on_notification(&mut self, _handle: u16, value: &[u8]) {
        let sample = match self.decode(value) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("dropping triple-axis frame: {}", e);
                return;
            }
        };

        let args = [
            OscArg::Int(i32::from(sample.values[0])),
            OscArg::Int(i32::from(sample.values[1])),
            OscArg::Int(i32::from(sample.values[2])),
            OscArg::Int(i32::from(sample.values[3])),
        ];
        if let Err(e) = self.sink.send(&self.path, &args) {
            warn!("telemetry send failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testutil::RecordingSink;

    fn payload(seq: u8, values: [i16; 4]) -> Vec<u8> {
        let mut buf = vec![seq];
        for value in values {
            buf.extend_from_slice(&value.to_be_bytes());
        }
        buf
    }

    #[test]
    fn decodes_big_endian_readings() {
        let decoder = TripleAxisDecoder::new(RecordingSink::default(), "/imu");
        let sample = decoder.decode(&payload(7, [100, -50, 0, 32767])).unwrap();
        assert_eq!(
            sample,
            TripleAxisSample {
                seq: 7,
                values: [100, -50, 0, 32767]
            }
        );
    }

    #[test]
    fn length_mismatch_drops_frame_without_sink_send() {
        let sink = RecordingSink::default();
        let mut decoder = TripleAxisDecoder::new(sink.clone(), "/imu");

        decoder.on_notification(0x0023, &[0u8; 8]);
        decoder.on_notification(0x0023, &[0u8; 10]);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn forwards_four_fields_in_one_send() {
        let sink = RecordingSink::default();
        let mut decoder = TripleAxisDecoder::new(sink.clone(), "/imu");

        decoder.on_notification(0x0023, &payload(7, [100, -50, 0, 32767]));

        let sends = sink.take();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].0, "/imu");
        assert_eq!(
            sends[0].1,
            vec![
                OscArg::Int(100),
                OscArg::Int(-50),
                OscArg::Int(0),
                OscArg::Int(32767)
            ]
        );
    }
}
