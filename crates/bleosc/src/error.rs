//! Error types for the bleosc library
//!
//! This module defines the top-level error type shared by the transport
//! and ATT client layers. Decode and sink errors are layer-local and live
//! next to their owners.

use thiserror::Error;

/// Errors surfaced by the BLE transport and ATT client
#[derive(Error, Debug)]
pub enum BleError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("System call failed: {0}")]
    System(#[from] std::io::Error),

    #[error("Failed to open HCI controller socket: {0}")]
    ControllerOpenFailed(std::io::Error),

    #[error("Failed to open L2CAP channel socket: {0}")]
    ChannelOpenFailed(std::io::Error),

    #[error("Failed to bind L2CAP channel socket: {0}")]
    BindFailed(std::io::Error),

    #[error("Failed to connect to BLE peripheral: {0}")]
    ConnectFailed(std::io::Error),

    #[error("Notification callback table is full")]
    CallbacksFull,

    #[error("Unexpected response opcode {opcode:#04x}")]
    UnexpectedResponse { opcode: u8 },

    #[error("ATT error response to request {request:#04x} on handle {handle:#06x} (code {code:#04x})")]
    Protocol { request: u8, handle: u16, code: u8 },
}

/// Result type for BLE operations
pub type BleResult<T> = Result<T, BleError>;
