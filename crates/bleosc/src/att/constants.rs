//! ATT protocol constants

// ATT opcode values
pub const ATT_ERROR_RSP: u8 = 0x01;
pub const ATT_WRITE_REQ: u8 = 0x12;
pub const ATT_WRITE_RSP: u8 = 0x13;
pub const ATT_HANDLE_VALUE_NTF: u8 = 0x1B;

// ATT L2CAP fixed channel ID
pub const ATT_CID: u16 = 0x0004;

// Frame header: opcode (1) + handle (2)
pub const ATT_HEADER_SIZE: usize = 3;

// Largest frame a single read will accept
pub const ATT_MAX_FRAME_LEN: usize = 255;

// Bound on the notification callback table
pub const MAX_NOTIFICATION_CALLBACKS: usize = 32;
