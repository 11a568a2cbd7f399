//! Mock implementations of the switch's seams, used by the unit and
//! integration tests. Nothing in here is compiled away in release builds,
//! but nothing in the production paths references it either.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::frame::Frame;
use crate::port::EthernetPort;

static NEXT_MOCK_ID: AtomicU64 = AtomicU64::new(0);

/// In-memory [`EthernetPort`] with scripted receives and recorded sends.
///
/// Receives are scripted ahead of time with [`push_frame`] and
/// [`push_read_error`] and handed out in order; an exhausted script reads
/// as one more receive error. Sends append to an inspectable log and
/// succeed unless [`set_send_result`] said otherwise. Identities come from
/// a process-wide counter, so any two `MockPort`s are distinct endpoints.
///
/// [`push_frame`]: MockPort::push_frame
/// [`push_read_error`]: MockPort::push_read_error
/// [`set_send_result`]: MockPort::set_send_result
pub struct MockPort {
    name: String,
    id: u64,
    incoming: Mutex<VecDeque<Option<Frame>>>,
    sent: Mutex<Vec<Frame>>,
    send_result: AtomicBool,
}

impl MockPort {
    pub fn new(name: &str) -> Arc<MockPort> {
        Arc::new(MockPort {
            name: name.to_owned(),
            id: NEXT_MOCK_ID.fetch_add(1, Ordering::Relaxed),
            incoming: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            send_result: AtomicBool::new(true),
        })
    }

    /// Scripts one successful receive that delivers `frame`.
    pub fn push_frame(&self, frame: Frame) {
        self.incoming.lock().unwrap().push_back(Some(frame));
    }

    /// Scripts one failed receive.
    pub fn push_read_error(&self) {
        self.incoming.lock().unwrap().push_back(None);
    }

    /// Makes every following `send` succeed (`true`) or fail (`false`).
    pub fn set_send_result(&self, result: bool) {
        self.send_result.store(result, Ordering::Relaxed);
    }

    /// Every frame handed to `send` so far, in order, whether or not the
    /// send was made to fail.
    pub fn sent(&self) -> Vec<Frame> {
        self.sent.lock().unwrap().clone()
    }
}

impl EthernetPort for MockPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn receive_next(&self) -> Option<Frame> {
        self.incoming.lock().unwrap().pop_front().unwrap_or(None)
    }

    fn send(&self, frame: &Frame) -> bool {
        self.sent.lock().unwrap().push(frame.clone());
        self.send_result.load(Ordering::Relaxed)
    }
}
