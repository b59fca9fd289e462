//! bleosc - bridges BLE sensor notifications to OSC over UDP
//!
//! This library implements a minimal ATT client over raw L2CAP sockets on
//! Linux: it connects to one BLE peripheral, enables notifications with
//! attribute write requests, and runs a blocking read-dispatch loop that
//! feeds each notification frame to registered callbacks. A family of
//! fixed-format decoders turns the raw attribute values into typed sensor
//! samples (orientation quaternions, raw scalars, multi-axis IMU readings)
//! and forwards them to a telemetry sink as OSC messages.

pub mod att;
pub mod decode;
pub mod error;
pub mod osc;
pub mod transport;

// Re-export common types for convenience
pub use att::{AttFrame, Connection, HandleFilter, NotificationRegistry, PendingId};
pub use decode::{
    DecodeError, NineAxisDecoder, Quaternion, QuaternionDecoder, ScalarDecoder, SequenceTracker,
    TripleAxisDecoder, TripleAxisSample,
};
pub use error::{BleError, BleResult};
pub use osc::{OscArg, OscSink, SinkError, TelemetrySink};
pub use transport::{AddressType, BdAddr};
