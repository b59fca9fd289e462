//! ATT client: connection setup, write requests and the event loop

use super::constants::*;
use super::frame::{self, AttFrame};
use super::registry::{HandleFilter, NotificationRegistry};
use crate::error::{BleError, BleResult};
use crate::transport::{AddressType, AttSocket, BdAddr, HciSocket};
use log::{debug, warn};
use std::collections::VecDeque;
use std::time::Duration;

/// Completion callback for a deferred write request.
pub type WriteCallback = Box<dyn FnOnce(BleResult<()>) + Send>;

/// Identifies a deferred write awaiting its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingId(u64);

struct PendingWrite {
    id: PendingId,
    handle: u16,
    callback: WriteCallback,
}

/// One established link to a BLE peripheral.
///
/// Owns the controller and channel sockets, the notification registry and
/// the table of deferred writes. All I/O is blocking; a `Connection` is
/// driven from a single thread by calling [`handle_events`] in a loop.
///
/// [`handle_events`]: Connection::handle_events
pub struct Connection {
    controller: HciSocket,
    channel: AttSocket,
    registry: NotificationRegistry,
    pending: VecDeque<PendingWrite>,
    next_pending_id: u64,
}

impl Connection {
    /// Connects to a peripheral, assuming a random LE address.
    pub fn connect(addr: BdAddr) -> BleResult<Self> {
        Self::connect_with_address_type(addr, AddressType::Random)
    }

    /// Connects to a peripheral with an explicit address type.
    ///
    /// Opens the controller socket, then binds and connects the ATT
    /// channel. If any step fails, the handles opened so far are closed
    /// before the error is returned.
    pub fn connect_with_address_type(addr: BdAddr, addr_type: AddressType) -> BleResult<Self> {
        let controller = HciSocket::open(0)?;
        let channel = AttSocket::connect(&addr, addr_type)?;

        Ok(Self {
            controller,
            channel,
            registry: NotificationRegistry::new(),
            pending: VecDeque::new(),
            next_pending_id: 0,
        })
    }

    /// Tears the link down, releasing both socket handles.
    ///
    /// Consuming `self` makes a second disconnect unrepresentable; the
    /// handles are closed exactly once.
    pub fn disconnect(self) {}

    /// Registers a callback invoked for frames matching `filter`.
    ///
    /// Dispatch order is registration order. The registry is bounded;
    /// registration past capacity fails with `CallbacksFull`.
    pub fn register_notification<F>(&mut self, filter: HandleFilter, callback: F) -> BleResult<()>
    where
        F: FnMut(u16, &[u8]) + Send + 'static,
    {
        self.registry.register(filter, Box::new(callback))
    }

    /// Writes a `u16` attribute value and blocks until the peripheral
    /// acknowledges it.
    ///
    /// The response opcode is validated: an ATT Error Response becomes a
    /// typed [`BleError::Protocol`]. Notification frames that arrive ahead
    /// of the response are dispatched to the registry rather than lost.
    pub fn write_u16(&mut self, handle: u16, value: u16) -> BleResult<()> {
        if !self.pending.is_empty() {
            // ATT allows one outstanding request per link
            return Err(BleError::InvalidArgument(
                "a deferred write is still awaiting its response".into(),
            ));
        }

        let request = frame::encode_write_u16(handle, value);
        self.channel.send(&request)?;

        loop {
            let mut buf = [0u8; ATT_MAX_FRAME_LEN];
            let read_bytes = self.channel.recv(&mut buf)?;
            if read_bytes == 0 {
                return Err(BleError::System(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "channel closed while awaiting write response",
                )));
            }

            let data = &buf[..read_bytes];
            match data[0] {
                ATT_WRITE_RSP => return Ok(()),
                ATT_ERROR_RSP => return Err(Self::protocol_error(data)),
                ATT_HANDLE_VALUE_NTF => {
                    if let Some(frame) = AttFrame::parse(data) {
                        self.registry.dispatch(frame.handle, frame.value);
                    }
                }
                opcode => return Err(BleError::UnexpectedResponse { opcode }),
            }
        }
    }

    /// Writes a `u16` attribute value and returns without waiting.
    ///
    /// The request is recorded in the pending table; `callback` fires from
    /// [`handle_events`] once the matching response frame is classified.
    ///
    /// [`handle_events`]: Connection::handle_events
    pub fn write_u16_deferred<F>(
        &mut self,
        handle: u16,
        value: u16,
        callback: F,
    ) -> BleResult<PendingId>
    where
        F: FnOnce(BleResult<()>) + Send + 'static,
    {
        let request = frame::encode_write_u16(handle, value);
        self.channel.send(&request)?;

        let id = PendingId(self.next_pending_id);
        self.next_pending_id += 1;
        self.pending.push_back(PendingWrite {
            id,
            handle,
            callback: Box::new(callback),
        });

        Ok(id)
    }

    /// Number of deferred writes still awaiting a response.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// The controller socket backing this link.
    pub fn controller(&self) -> &HciSocket {
        &self.controller
    }

    /// Reads and processes one frame from the channel.
    ///
    /// - a transport read error is returned as `System`; the caller
    ///   decides whether to tear the connection down
    /// - write/error responses complete the oldest deferred write
    /// - frames shorter than the 3-byte header are discarded silently
    /// - everything else fans out to the notification registry
    ///
    /// With `timeout` set, returns `Ok(())` without processing a frame if
    /// nothing arrives in time; with `None` the read blocks indefinitely.
    pub fn handle_events(&mut self, timeout: Option<Duration>) -> BleResult<()> {
        if !self.channel.wait_readable(timeout)? {
            return Ok(());
        }

        let mut buf = [0u8; ATT_MAX_FRAME_LEN];
        let read_bytes = self.channel.recv(&mut buf)?;
        let data = &buf[..read_bytes];

        // Responses can be shorter than a notification header (a bare
        // write response is one byte), so classify them first.
        match data.first().copied() {
            Some(ATT_WRITE_RSP) => {
                self.complete_pending(Ok(()));
                return Ok(());
            }
            Some(ATT_ERROR_RSP) => {
                self.complete_pending(Err(Self::protocol_error(data)));
                return Ok(());
            }
            _ => {}
        }

        let Some(frame) = AttFrame::parse(data) else {
            debug!("received short packet: {} bytes", read_bytes);
            return Ok(());
        };

        self.registry.dispatch(frame.handle, frame.value);
        Ok(())
    }

    /// Completes the oldest pending write. ATT serializes requests, so
    /// responses arrive in request order.
    fn complete_pending(&mut self, result: BleResult<()>) {
        match self.pending.pop_front() {
            Some(pending) => {
                debug!(
                    "completing deferred write {:?} on handle {:#06x}",
                    pending.id, pending.handle
                );
                (pending.callback)(result);
            }
            None => warn!("received a response frame with no pending write request"),
        }
    }

    /// Builds a typed error from an ATT Error Response frame:
    /// `[0x01][request opcode:1][handle:2 LE][error code:1]`.
    fn protocol_error(data: &[u8]) -> BleError {
        if data.len() < 5 {
            return BleError::UnexpectedResponse {
                opcode: ATT_ERROR_RSP,
            };
        }

        BleError::Protocol {
            request: data[1],
            handle: frame::get_u16(&data[2..4]),
            code: data[4],
        }
    }

    #[cfg(test)]
    pub(crate) fn from_sockets(controller: HciSocket, channel: AttSocket) -> Self {
        Self {
            controller,
            channel,
            registry: NotificationRegistry::new(),
            pending: VecDeque::new(),
            next_pending_id: 0,
        }
    }
}
