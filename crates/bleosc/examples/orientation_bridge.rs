//! Streams orientation quaternions from a head-tracker peripheral to an
//! OSC consumer on localhost.
//!
//! Usage: orientation_bridge [MAC]

use bleosc::{BdAddr, Connection, HandleFilter, OscSink, QuaternionDecoder};

// Deployment configuration for the head-tracker firmware
const ORIENTATION_CCCD_HANDLE: u16 = 0x000F;
const DEFAULT_PERIPHERAL: &str = "FB:53:83:F3:18:FD";
const OSC_TARGET: (&str, u16) = ("localhost", 10001);
const OSC_PATH: &str = "/orientation";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let addr: BdAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PERIPHERAL.to_string())
        .parse()?;

    let sink = OscSink::new(OSC_TARGET)?;
    let mut decoder = QuaternionDecoder::new(sink, OSC_PATH);

    println!("Connecting to {}...", addr);
    let mut conn = Connection::connect(addr)?;

    println!("Registering notification callback...");
    conn.register_notification(HandleFilter::Any, move |handle, value| {
        decoder.on_notification(handle, value)
    })?;

    println!("Enabling orientation notifications...");
    conn.write_u16(ORIENTATION_CCCD_HANDLE, 0x0001)?;

    println!("Starting handler loop...");
    loop {
        conn.handle_events(None)?;
    }
}
