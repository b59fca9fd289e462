//! Forwards raw scalar sensor readings from an RFduino-class peripheral
//! to an OSC consumer on localhost.
//!
//! Usage: scalar_bridge [MAC]

use bleosc::{BdAddr, Connection, HandleFilter, OscSink, ScalarDecoder};

// Deployment configuration for the RFduino sketch
const CONFIGURATION_HANDLE: u16 = 0x000F;
const DEFAULT_PERIPHERAL: &str = "E6:4B:E0:99:63:8C";
const OSC_TARGET: (&str, u16) = ("localhost", 9383);
const OSC_PATH: &str = "/ble";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let addr: BdAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PERIPHERAL.to_string())
        .parse()?;

    let sink = OscSink::new(OSC_TARGET)?;
    let mut decoder = ScalarDecoder::new(sink, OSC_PATH);

    let mut conn = Connection::connect(addr)?;
    conn.register_notification(HandleFilter::Any, move |handle, value| {
        decoder.on_notification(handle, value)
    })?;
    conn.write_u16(CONFIGURATION_HANDLE, 0x0001)?;

    loop {
        conn.handle_events(None)?;
    }
}
