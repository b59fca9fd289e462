//! Notification callback registry
//!
//! A bounded, append-only table of callbacks invoked for every received
//! notification frame. Insertion order is dispatch order.

use super::constants::MAX_NOTIFICATION_CALLBACKS;
use crate::error::{BleError, BleResult};
use log::error;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Callback invoked with the attribute handle and value of each frame.
pub type NotificationCallback = Box<dyn FnMut(u16, &[u8]) + Send>;

/// Restricts which attribute handles reach a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleFilter {
    /// Deliver every frame regardless of handle
    Any,
    /// Deliver only frames for this handle
    Exact(u16),
}

impl HandleFilter {
    fn matches(&self, handle: u16) -> bool {
        match *self {
            HandleFilter::Any => true,
            HandleFilter::Exact(wanted) => wanted == handle,
        }
    }
}

struct Entry {
    filter: HandleFilter,
    callback: NotificationCallback,
}

/// Bounded table of notification callbacks.
pub struct NotificationRegistry {
    entries: Vec<Entry>,
    capacity: usize,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::with_capacity(MAX_NOTIFICATION_CALLBACKS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends a callback. Fails with `CallbacksFull` once the table is at
    /// capacity, without mutating the table.
    pub fn register(&mut self, filter: HandleFilter, callback: NotificationCallback) -> BleResult<()> {
        if self.entries.len() == self.capacity {
            return Err(BleError::CallbacksFull);
        }

        self.entries.push(Entry { filter, callback });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invokes every matching callback once, in registration order.
    ///
    /// A panicking callback is contained so the remaining entries still
    /// see the frame.
    pub fn dispatch(&mut self, handle: u16, value: &[u8]) {
        for entry in &mut self.entries {
            if !entry.filter.matches(handle) {
                continue;
            }

            let callback = &mut entry.callback;
            if catch_unwind(AssertUnwindSafe(|| (callback)(handle, value))).is_err() {
                error!("notification callback panicked; continuing with remaining callbacks");
            }
        }
    }
}

impl Default for NotificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
