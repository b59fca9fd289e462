//! Tests for the ATT client, registry and event loop

#[cfg(test)]
mod tests {
    use super::super::client::Connection;
    use super::super::constants::*;
    use super::super::registry::{HandleFilter, NotificationRegistry};
    use crate::decode::testutil::RecordingSink;
    use crate::decode::TripleAxisDecoder;
    use crate::error::BleError;
    use crate::osc::OscArg;
    use crate::transport::{AttSocket, HciSocket};
    use std::os::unix::io::RawFd;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn socket_pair() -> (RawFd, RawFd) {
        let mut fds = [0 as RawFd; 2];
        let result =
            unsafe { libc::socketpair(libc::AF_UNIX, libc::SOCK_SEQPACKET, 0, fds.as_mut_ptr()) };
        assert_eq!(result, 0, "socketpair failed");
        (fds[0], fds[1])
    }

    /// A connection over a SEQPACKET socket pair; the returned peer socket
    /// plays the peripheral.
    fn test_connection() -> (Connection, AttSocket) {
        let (local, peer) = socket_pair();
        let (controller, unused) = socket_pair();
        unsafe { libc::close(unused) };

        let conn = Connection::from_sockets(
            HciSocket::from_raw_fd(controller),
            AttSocket::from_raw_fd(local),
        );
        (conn, AttSocket::from_raw_fd(peer))
    }

    #[test]
    fn registry_rejects_registration_past_capacity() {
        let mut registry = NotificationRegistry::new();

        for _ in 0..MAX_NOTIFICATION_CALLBACKS {
            registry
                .register(HandleFilter::Any, Box::new(|_, _| {}))
                .unwrap();
        }
        assert_eq!(registry.len(), MAX_NOTIFICATION_CALLBACKS);

        let result = registry.register(HandleFilter::Any, Box::new(|_, _| {}));
        assert!(matches!(result, Err(BleError::CallbacksFull)));
        assert_eq!(registry.len(), MAX_NOTIFICATION_CALLBACKS);
    }

    #[test]
    fn dispatch_invokes_all_callbacks_in_registration_order() {
        let mut registry = NotificationRegistry::new();
        let seen: Arc<Mutex<Vec<(usize, u16, Vec<u8>)>>> = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let seen = seen.clone();
            registry
                .register(
                    HandleFilter::Any,
                    Box::new(move |handle, value| {
                        seen.lock().unwrap().push((i, handle, value.to_vec()));
                    }),
                )
                .unwrap();
        }

        registry.dispatch(0x0023, &[0xAA, 0xBB]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        for (i, entry) in seen.iter().enumerate() {
            assert_eq!(*entry, (i, 0x0023, vec![0xAA, 0xBB]));
        }
    }

    #[test]
    fn dispatch_honors_handle_filters() {
        let mut registry = NotificationRegistry::new();
        let hits: Arc<Mutex<Vec<u16>>> = Arc::new(Mutex::new(Vec::new()));

        let hits_any = hits.clone();
        registry
            .register(
                HandleFilter::Any,
                Box::new(move |handle, _| hits_any.lock().unwrap().push(handle)),
            )
            .unwrap();

        let hits_exact = hits.clone();
        registry
            .register(
                HandleFilter::Exact(0x0010),
                Box::new(move |_, _| hits_exact.lock().unwrap().push(0xFFFF)),
            )
            .unwrap();

        registry.dispatch(0x0023, &[]);
        registry.dispatch(0x0010, &[]);

        assert_eq!(*hits.lock().unwrap(), vec![0x0023, 0x0010, 0xFFFF]);
    }

    #[test]
    fn panicking_callback_does_not_block_later_entries() {
        let mut registry = NotificationRegistry::new();
        let reached = Arc::new(Mutex::new(false));

        registry
            .register(HandleFilter::Any, Box::new(|_, _| panic!("boom")))
            .unwrap();

        let reached_inner = reached.clone();
        registry
            .register(
                HandleFilter::Any,
                Box::new(move |_, _| *reached_inner.lock().unwrap() = true),
            )
            .unwrap();

        registry.dispatch(0x0001, &[]);
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn write_then_notification_end_to_end() {
        let (mut conn, peer) = test_connection();

        let sink = RecordingSink::default();
        let mut decoder = TripleAxisDecoder::new(sink.clone(), "/imu");
        conn.register_notification(HandleFilter::Any, move |handle, value| {
            decoder.on_notification(handle, value)
        })
        .unwrap();

        // Queue the acknowledgement so the blocking write can complete
        peer.send(&[ATT_WRITE_RSP]).unwrap();
        conn.write_u16(0x000F, 0x0001).unwrap();

        // The peripheral saw the exact 5-byte request
        let mut buf = [0u8; 16];
        let read_bytes = peer.recv(&mut buf).unwrap();
        assert_eq!(&buf[..read_bytes], &[ATT_WRITE_REQ, 0x0F, 0x00, 0x01, 0x00]);

        // Notification on handle 0x0023: seq 7, four big-endian i16
        let mut frame = vec![ATT_HANDLE_VALUE_NTF, 0x23, 0x00, 7];
        for value in [100i16, -50, 0, 32767] {
            frame.extend_from_slice(&value.to_be_bytes());
        }
        peer.send(&frame).unwrap();
        conn.handle_events(Some(Duration::from_secs(1))).unwrap();

        let sends = sink.take();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].0, "/imu");
        assert_eq!(
            sends[0].1,
            vec![
                OscArg::Int(100),
                OscArg::Int(-50),
                OscArg::Int(0),
                OscArg::Int(32767)
            ]
        );
    }

    #[test]
    fn sync_write_surfaces_error_response() {
        let (mut conn, peer) = test_connection();

        peer.send(&[ATT_ERROR_RSP, ATT_WRITE_REQ, 0x11, 0x00, 0x03])
            .unwrap();

        let result = conn.write_u16(0x0011, 0x0003);
        match result {
            Err(BleError::Protocol {
                request,
                handle,
                code,
            }) => {
                assert_eq!(request, ATT_WRITE_REQ);
                assert_eq!(handle, 0x0011);
                assert_eq!(code, 0x03);
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn sync_write_dispatches_interleaved_notification() {
        let (mut conn, peer) = test_connection();

        let seen: Arc<Mutex<Vec<Vec<u8>>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_inner = seen.clone();
        conn.register_notification(HandleFilter::Any, move |_, value| {
            seen_inner.lock().unwrap().push(value.to_vec());
        })
        .unwrap();

        // A notification arrives before the write response
        peer.send(&[ATT_HANDLE_VALUE_NTF, 0x23, 0x00, 0x2A]).unwrap();
        peer.send(&[ATT_WRITE_RSP]).unwrap();

        conn.write_u16(0x000F, 0x0001).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![vec![0x2A]]);
    }

    #[test]
    fn deferred_write_completes_from_event_loop() {
        let (mut conn, peer) = test_connection();

        let outcome: Arc<Mutex<Option<bool>>> = Arc::new(Mutex::new(None));
        let outcome_inner = outcome.clone();
        conn.write_u16_deferred(0x0011, 0x0003, move |result| {
            *outcome_inner.lock().unwrap() = Some(result.is_ok());
        })
        .unwrap();
        assert_eq!(conn.pending_writes(), 1);

        let mut buf = [0u8; 16];
        let read_bytes = peer.recv(&mut buf).unwrap();
        assert_eq!(&buf[..read_bytes], &[ATT_WRITE_REQ, 0x11, 0x00, 0x03, 0x00]);

        // A bare one-byte write response still completes the request
        peer.send(&[ATT_WRITE_RSP]).unwrap();
        conn.handle_events(Some(Duration::from_secs(1))).unwrap();

        assert_eq!(conn.pending_writes(), 0);
        assert_eq!(*outcome.lock().unwrap(), Some(true));
    }

    #[test]
    fn deferred_write_receives_error_response() {
        let (mut conn, peer) = test_connection();

        let outcome: Arc<Mutex<Option<bool>>> = Arc::new(Mutex::new(None));
        let outcome_inner = outcome.clone();
        conn.write_u16_deferred(0x0011, 0x0003, move |result| {
            *outcome_inner.lock().unwrap() = Some(result.is_ok());
        })
        .unwrap();

        peer.send(&[ATT_ERROR_RSP, ATT_WRITE_REQ, 0x11, 0x00, 0x03])
            .unwrap();
        conn.handle_events(Some(Duration::from_secs(1))).unwrap();

        assert_eq!(*outcome.lock().unwrap(), Some(false));
    }

    #[test]
    fn sync_write_rejected_while_deferred_write_outstanding() {
        let (mut conn, _peer) = test_connection();

        conn.write_u16_deferred(0x0011, 0x0003, |_| {}).unwrap();
        let result = conn.write_u16(0x000F, 0x0001);
        assert!(matches!(result, Err(BleError::InvalidArgument(_))));
    }

    #[test]
    fn short_frames_are_discarded_without_dispatch() {
        let (mut conn, peer) = test_connection();

        let seen = Arc::new(Mutex::new(0usize));
        let seen_inner = seen.clone();
        conn.register_notification(HandleFilter::Any, move |_, _| {
            *seen_inner.lock().unwrap() += 1;
        })
        .unwrap();

        // Two bytes, not a response opcode: discarded, not an error
        peer.send(&[0xAA, 0x01]).unwrap();
        conn.handle_events(Some(Duration::from_secs(1))).unwrap();
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn handle_events_returns_on_timeout_without_a_frame() {
        let (mut conn, _peer) = test_connection();

        conn.handle_events(Some(Duration::from_millis(10))).unwrap();
        assert_eq!(conn.pending_writes(), 0);
    }
}
