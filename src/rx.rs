use std::sync::Arc;
use std::thread;

use crate::metrics::SwitchMetrics;
use crate::port::PortHandle;
use crate::queue::FrameQueue;

/// The receive side of one port: blocks in `receive_next`, accounts for the
/// outcome and hands good frames to the switching loop through the ingress
/// queue.
///
/// The thread loop is just [`poll_once`](FrameReceiver::poll_once) forever;
/// the single step is public so tests can drive a receiver synchronously
/// without spawning anything.
pub struct FrameReceiver {
    port: PortHandle,
    queue: Arc<FrameQueue>,
    metrics: Arc<SwitchMetrics>,
}

impl FrameReceiver {
    pub fn new(port: PortHandle,
               queue: Arc<FrameQueue>,
               metrics: Arc<SwitchMetrics>)
               -> FrameReceiver {
        FrameReceiver {
            port: port,
            queue: queue,
            metrics: metrics,
        }
    }

    /// Detaches the receiver onto its own thread. The thread is a daemon,
    /// it is never joined and only exits with the process.
    pub fn spawn(self) {
        thread::spawn(move || self.run());
    }

    fn run(self) -> ! {
        loop {
            self.poll_once();
        }
    }

    /// One blocking receive. A frame is counted and queued together with
    /// its ingress port; an error is counted, warned about and skipped.
    pub fn poll_once(&self) {
        match self.port.receive_next() {
            Some(frame) => {
                self.metrics.count_received_frame();
                self.queue.push(frame, self.port.clone());
            }
            None => {
                self.metrics.count_read_error();
                warn!("Failed to receive frame on {}. Skipping", self.port.name());
            }
        }
    }
}
