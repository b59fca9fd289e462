//! Raw socket wrappers for the Bluetooth controller and the ATT channel
//!
//! Both wrappers own their file descriptor and close it exactly once on
//! drop, so a half-built connection cleans up on any failure path.

use crate::att::constants::ATT_CID;
use crate::error::BleError;
use crate::transport::addr::{AddressType, BdAddr};
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

// Bluetooth socket constants
const AF_BLUETOOTH: i32 = 31;
const BTPROTO_L2CAP: i32 = 0;
const BTPROTO_HCI: i32 = 1;
const HCI_CHANNEL_RAW: u16 = 0;

// Define the sockaddr_hci structure
#[repr(C)]
struct SockaddrHci {
    hci_family: libc::sa_family_t,
    hci_dev: u16,
    hci_channel: u16,
}

// Define the sockaddr_l2 structure (bluetooth/l2cap.h)
#[repr(C)]
struct SockaddrL2 {
    l2_family: libc::sa_family_t,
    l2_psm: u16,
    l2_bdaddr: [u8; 6],
    l2_cid: u16,
    l2_bdaddr_type: u8,
}

/// Handle to the local Bluetooth controller.
///
/// Only used during connection setup; kept open so the kernel keeps the
/// adapter powered for the life of the link.
#[derive(Debug)]
pub struct HciSocket {
    fd: RawFd,
}

impl HciSocket {
    /// Opens a raw HCI socket bound to the given controller.
    ///
    /// # Arguments
    ///
    /// * `dev_id` - The device ID to open (0 for the first controller)
    pub fn open(dev_id: u16) -> Result<Self, BleError> {
        let fd = unsafe { libc::socket(AF_BLUETOOTH, libc::SOCK_RAW, BTPROTO_HCI) };

        if fd < 0 {
            return Err(BleError::ControllerOpenFailed(
                std::io::Error::last_os_error(),
            ));
        }

        // Owns the fd from here; errors below close it on drop
        let socket = HciSocket { fd };

        let addr = SockaddrHci {
            hci_family: AF_BLUETOOTH as libc::sa_family_t,
            hci_dev: dev_id,
            hci_channel: HCI_CHANNEL_RAW,
        };

        let result = unsafe {
            libc::bind(
                socket.fd,
                &addr as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrHci>() as libc::socklen_t,
            )
        };

        if result < 0 {
            return Err(BleError::ControllerOpenFailed(
                std::io::Error::last_os_error(),
            ));
        }

        Ok(socket)
    }

    #[cfg(test)]
    pub(crate) fn from_raw_fd(fd: RawFd) -> Self {
        Self { fd }
    }
}

impl AsRawFd for HciSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for HciSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

/// Connection-oriented L2CAP socket carrying ATT frames to one peripheral.
///
/// SEQPACKET preserves frame boundaries, so every read returns exactly one
/// ATT frame as the peripheral sent it.
#[derive(Debug)]
pub struct AttSocket {
    fd: RawFd,
}

impl AttSocket {
    /// Opens an L2CAP socket, binds it to the ATT fixed channel and
    /// connects it to the peripheral.
    pub fn connect(addr: &BdAddr, addr_type: AddressType) -> Result<Self, BleError> {
        let fd = unsafe { libc::socket(AF_BLUETOOTH, libc::SOCK_SEQPACKET, BTPROTO_L2CAP) };

        if fd < 0 {
            return Err(BleError::ChannelOpenFailed(std::io::Error::last_os_error()));
        }

        let socket = AttSocket { fd };

        // Bind to any local address on the ATT fixed channel
        let local = SockaddrL2 {
            l2_family: AF_BLUETOOTH as libc::sa_family_t,
            l2_psm: 0,
            l2_bdaddr: [0u8; 6],
            l2_cid: ATT_CID.to_le(),
            l2_bdaddr_type: 0,
        };

        let result = unsafe {
            libc::bind(
                socket.fd,
                &local as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrL2>() as libc::socklen_t,
            )
        };

        if result < 0 {
            return Err(BleError::BindFailed(std::io::Error::last_os_error()));
        }

        let remote = SockaddrL2 {
            l2_family: AF_BLUETOOTH as libc::sa_family_t,
            l2_psm: 0,
            l2_bdaddr: addr.bytes,
            l2_cid: ATT_CID.to_le(),
            l2_bdaddr_type: addr_type.into(),
        };

        let result = unsafe {
            libc::connect(
                socket.fd,
                &remote as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrL2>() as libc::socklen_t,
            )
        };

        if result < 0 {
            return Err(BleError::ConnectFailed(std::io::Error::last_os_error()));
        }

        Ok(socket)
    }

    /// Writes one frame to the channel.
    pub(crate) fn send(&self, buf: &[u8]) -> std::io::Result<()> {
        let result =
            unsafe { libc::write(self.fd, buf.as_ptr() as *const libc::c_void, buf.len()) };

        if result < 0 {
            return Err(std::io::Error::last_os_error());
        }

        Ok(())
    }

    /// Reads one frame from the channel, blocking until one arrives.
    pub(crate) fn recv(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        let result =
            unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };

        if result < 0 {
            return Err(std::io::Error::last_os_error());
        }

        Ok(result as usize)
    }

    /// Waits until the channel is readable.
    ///
    /// Returns `Ok(false)` if the timeout expires first. With no timeout
    /// the socket is reported readable immediately and the following read
    /// blocks instead.
    pub(crate) fn wait_readable(&self, timeout: Option<Duration>) -> std::io::Result<bool> {
        let Some(timeout) = timeout else {
            return Ok(true);
        };

        // Set up the fd_set for select()
        let mut read_fds: libc::fd_set = unsafe { std::mem::zeroed() };
        unsafe {
            libc::FD_ZERO(&mut read_fds);
            libc::FD_SET(self.fd, &mut read_fds);
        }

        let mut timeout_val = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };

        let result = unsafe {
            libc::select(
                self.fd + 1,
                &mut read_fds,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &mut timeout_val,
            )
        };

        if result < 0 {
            return Err(std::io::Error::last_os_error());
        }

        Ok(result > 0)
    }

    #[cfg(test)]
    pub(crate) fn from_raw_fd(fd: RawFd) -> Self {
        Self { fd }
    }
}

impl AsRawFd for AttSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for AttSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
