//! Orientation quaternion decoder
//!
//! Payload layout (17 bytes): `[seq:u8][w:f32][x:f32][y:f32][z:f32]`.
//! Floats are decoded little-endian; the firmware this protocol shipped on
//! laid them out in little-endian memory order, and we fix that convention
//! explicitly instead of reinterpreting memory.

use super::{DecodeError, SequenceTracker};
use crate::osc::{OscArg, TelemetrySink};
use byteorder::{ByteOrder, LittleEndian};
use log::warn;

pub const QUATERNION_PAYLOAD_LEN: usize = 17;

/// One decoded orientation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub seq: u8,
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Decodes orientation notifications and forwards them to a sink as one
/// four-float message per frame.
pub struct QuaternionDecoder<S> {
    sink: S,
    path: String,
    tracker: SequenceTracker,
    lost_frames: u64,
}

impl<S: TelemetrySink> QuaternionDecoder<S> {
    pub fn new(sink: S, path: impl Into<String>) -> Self {
        Self {
            sink,
            path: path.into(),
            tracker: SequenceTracker::new(),
            lost_frames: 0,
        }
    }

    /// Total frames lost to sequence gaps since construction.
    pub fn lost_frames(&self) -> u64 {
        self.lost_frames
    }

    /// Decodes one payload, tracking the sequence counter. Gaps are
    /// reported as warnings, never as errors.
    pub fn decode(&mut self, value: &[u8]) -> Result<Quaternion, DecodeError> {
        if value.len() != QUATERNION_PAYLOAD_LEN {
            return Err(DecodeError::UnexpectedLength {
                expected: QUATERNION_PAYLOAD_LEN,
                actual: value.len(),
            });
        }

        let seq = value[0];
        if let Some(lost) = self.tracker.observe(seq) {
            self.lost_frames += u64::from(lost);
            warn!("unexpected sequence number {}, lost {} packets", seq, lost);
        }

        Ok(Quaternion {
            seq,
            w: LittleEndian::read_f32(&value[1..5]),
            x: LittleEndian::read_f32(&value[5..9]),
            y: LittleEndian::read_f32(&value[9..13]),
            z: LittleEndian::read_f32(&value[13..17]),
        })
    }

    /// Registry adapter: decode, forward, log failures, never propagate.
    pub fn on_notification(&mut self, _handle: u16, value: &[u8]) {
        let sample = match self.decode(value) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("dropping orientation frame: {}", e);
                return;
            }
        };

        let args = [
            OscArg::Float(sample.w),
            OscArg::Float(sample.x),
            OscArg::Float(sample.y),
            OscArg::Float(sample.z),
        ];
        if let Err(e) = self.sink.send(&self.path, &args) {
            warn!("telemetry send failed: {}", e);
        }
    }
}
