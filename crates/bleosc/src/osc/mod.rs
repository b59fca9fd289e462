//! Telemetry sink: OSC over UDP
//!
//! Decoded samples leave the process as OSC 1.0 messages. The sink is an
//! opaque collaborator to the BLE path; its failures are logged by the
//! decoders and never abort frame processing.

pub mod packet;
pub mod sink;

// Re-export the public API
pub use self::packet::{encode_message, OscArg};
pub use self::sink::{OscSink, SinkError, TelemetrySink};
