use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How often the metrics worker publishes a counter snapshot to the log.
pub static METRICS_INTERVAL: Duration = Duration::from_secs(60);

/// The six diagnostic counters of the switch.
///
/// Incremented from the receiver threads and the switching loop, read by
/// the metrics worker. They are diagnostic rather than control-plane, so
/// relaxed ordering is enough; all that matters is that no increment is
/// lost. Snapshots are atomic per counter, not across counters.
#[derive(Default)]
pub struct SwitchMetrics {
    received_frames: AtomicU64,
    sent_frames: AtomicU64,
    flood_count: AtomicU64,
    read_errors: AtomicU64,
    send_errors: AtomicU64,
    flood_errors: AtomicU64,
}

impl SwitchMetrics {
    pub fn new() -> Self {
        SwitchMetrics::default()
    }

    pub fn count_received_frame(&self) {
        self.received_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_sent_frame(&self) {
        self.sent_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_flood(&self) {
        self.flood_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_send_error(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_flood_error(&self) {
        self.flood_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values out into a plain struct.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            received_frames: self.received_frames.load(Ordering::Relaxed),
            sent_frames: self.sent_frames.load(Ordering::Relaxed),
            flood_count: self.flood_count.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            send_errors: self.send_errors.load(Ordering::Relaxed),
            flood_errors: self.flood_errors.load(Ordering::Relaxed),
        }
    }
}

/// One point-in-time reading of all six counters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetricsSnapshot {
    pub received_frames: u64,
    pub sent_frames: u64,
    pub flood_count: u64,
    pub read_errors: u64,
    pub send_errors: u64,
    pub flood_errors: u64,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt,
               "received_frames: {}, sent_frames: {}, flood_count: {}, read_errors: {}, \
                send_errors: {}, flood_errors: {}",
               self.received_frames,
               self.sent_frames,
               self.flood_count,
               self.read_errors,
               self.send_errors,
               self.flood_errors)
    }
}

/// Spawns the detached metrics worker. Every [`METRICS_INTERVAL`] it
/// publishes one record with the current counter values. Never joined,
/// runs until the process exits.
pub fn spawn_metrics_worker(metrics: Arc<SwitchMetrics>) {
    thread::spawn(move || loop {
        thread::sleep(METRICS_INTERVAL);
        info!("Metrics report => {}", metrics.snapshot());
    });
}
