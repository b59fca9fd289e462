//! ATT frame encoding and decoding
//!
//! Every frame on the channel is `[opcode:1][handle:2 LE][value:N]`. The
//! handle and all request fields are little-endian regardless of host
//! byte order.

use super::constants::*;
use byteorder::{ByteOrder, LittleEndian};

/// Writes `value` into the first two bytes of `dest`, little-endian.
pub fn put_u16(dest: &mut [u8], value: u16) {
    LittleEndian::write_u16(dest, value);
}

/// Reads a little-endian `u16` from the first two bytes of `src`.
pub fn get_u16(src: &[u8]) -> u16 {
    LittleEndian::read_u16(src)
}

/// A received ATT frame, borrowed from the read buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttFrame<'a> {
    pub opcode: u8,
    pub handle: u16,
    pub value: &'a [u8],
}

impl<'a> AttFrame<'a> {
    /// Parses one frame. Anything shorter than the 3-byte header is not a
    /// frame; callers discard it rather than treating it as an error.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < ATT_HEADER_SIZE {
            return None;
        }

        Some(Self {
            opcode: data[0],
            handle: get_u16(&data[1..3]),
            value: &data[ATT_HEADER_SIZE..],
        })
    }
}

/// Encodes a Write Request carrying a `u16` value: five bytes total.
pub fn encode_write_u16(handle: u16, value: u16) -> [u8; 5] {
    let mut buf = [0u8; 5];
    buf[0] = ATT_WRITE_REQ;
    put_u16(&mut buf[1..3], handle);
    put_u16(&mut buf[3..5], value);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_round_trip() {
        for value in [0u16, 1, 0x00FF, 0x0100, 0x1234, 0xFFFF] {
            let mut buf = [0u8; 2];
            put_u16(&mut buf, value);
            assert_eq!(get_u16(&buf), value);
        }
    }

    #[test]
    fn u16_is_little_endian() {
        let mut buf = [0u8; 2];
        put_u16(&mut buf, 0x1234);
        assert_eq!(buf, [0x34, 0x12]);
    }

    #[test]
    fn write_request_encoding_is_bit_exact() {
        let buf = encode_write_u16(0x000F, 0x0001);
        assert_eq!(buf, [ATT_WRITE_REQ, 0x0F, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn parse_splits_header_and_value() {
        let data = [ATT_HANDLE_VALUE_NTF, 0x23, 0x00, 0xAA, 0xBB];
        let frame = AttFrame::parse(&data).unwrap();
        assert_eq!(frame.opcode, ATT_HANDLE_VALUE_NTF);
        assert_eq!(frame.handle, 0x0023);
        assert_eq!(frame.value, &[0xAA, 0xBB]);
    }

    #[test]
    fn parse_allows_empty_value() {
        let data = [ATT_HANDLE_VALUE_NTF, 0x23, 0x00];
        let frame = AttFrame::parse(&data).unwrap();
        assert!(frame.value.is_empty());
    }

    #[test]
    fn parse_rejects_short_frames() {
        assert!(AttFrame::parse(&[]).is_none());
        assert!(AttFrame::parse(&[ATT_HANDLE_VALUE_NTF]).is_none());
        assert!(AttFrame::parse(&[ATT_HANDLE_VALUE_NTF, 0x23]).is_none());
    }
}
