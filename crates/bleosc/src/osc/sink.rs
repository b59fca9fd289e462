//! UDP telemetry sink

use super::packet::{encode_message, OscArg};
use std::net::{ToSocketAddrs, UdpSocket};
use thiserror::Error;

/// Errors from delivering a telemetry message
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to send telemetry message: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for decoded sensor samples.
///
/// Implementations deliver one message per call; failures are reported to
/// the caller, which logs them and keeps the BLE path running.
pub trait TelemetrySink {
    fn send(&self, path: &str, args: &[OscArg]) -> Result<(), SinkError>;
}

/// Sends each sample as one OSC message over UDP.
pub struct OscSink {
    socket: UdpSocket,
}

impl OscSink {
    /// Binds an ephemeral local port and fixes the destination address.
    pub fn new(target: impl ToSocketAddrs) -> Result<Self, SinkError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(target)?;
        Ok(Self { socket })
    }
}

impl TelemetrySink for OscSink {
    fn send(&self, path: &str, args: &[OscArg]) -> Result<(), SinkError> {
        let packet = encode_message(path, args);
        self.socket.send(&packet)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_encoded_message_over_udp() {
        let receiver = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let target = receiver.local_addr().unwrap();

        let sink = OscSink::new(target).unwrap();
        sink.send("/ble", &[OscArg::Int(42)]).unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], encode_message("/ble", &[OscArg::Int(42)]));
    }
}
