//! Peripheral addressing types

use crate::error::BleError;
use std::fmt;
use std::str::FromStr;

// BlueZ bdaddr_type values for LE L2CAP sockets
const BDADDR_LE_PUBLIC: u8 = 0x01;
const BDADDR_LE_RANDOM: u8 = 0x02;

/// LE address type used when connecting the ATT channel.
///
/// Most peripherals built on chip-default static addresses advertise with
/// a random address, so `Random` is the connection default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Public,
    Random,
}

impl From<AddressType> for u8 {
    fn from(value: AddressType) -> Self {
        match value {
            AddressType::Public => BDADDR_LE_PUBLIC,
            AddressType::Random => BDADDR_LE_RANDOM,
        }
    }
}

/// A Bluetooth device address.
///
/// Bytes are stored in the little-endian order the kernel expects, which is
/// the reverse of the colon-separated display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr {
    pub bytes: [u8; 6],
}

impl BdAddr {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self { bytes }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl FromStr for BdAddr {
    type Err = BleError;

    /// Parses an address in display order, e.g. `"E6:4B:E0:99:63:8C"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(BleError::InvalidArgument(format!(
                "invalid peripheral address: {}",
                s
            )));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            // Reverse into little-endian storage order
            bytes[5 - i] = u8::from_str_radix(part, 16).map_err(|_| {
                BleError::InvalidArgument(format!("invalid peripheral address: {}", s))
            })?;
        }

        Ok(Self { bytes })
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let addr: BdAddr = "E6:4B:E0:99:63:8C".parse().unwrap();
        assert_eq!(addr.bytes, [0x8C, 0x63, 0x99, 0xE0, 0x4B, 0xE6]);
        assert_eq!(addr.to_string(), "E6:4B:E0:99:63:8C");
    }

    #[test]
    fn parse_rejects_malformed_addresses() {
        assert!("E6:4B:E0:99:63".parse::<BdAddr>().is_err());
        assert!("E6:4B:E0:99:63:8C:11".parse::<BdAddr>().is_err());
        assert!("E6:4B:E0:99:63:GG".parse::<BdAddr>().is_err());
        assert!("".parse::<BdAddr>().is_err());
    }
}
