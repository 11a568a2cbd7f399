use std::sync::Arc;

use crate::camtable::CamTable;
use crate::frame::Frame;
use crate::metrics::{self, SwitchMetrics};
use crate::port::PortHandle;
use crate::queue::FrameQueue;
use crate::rx::FrameReceiver;

/// The switch itself: the configured port set, the CAM table, the ingress
/// queue and the counters.
///
/// `start` turns the calling thread into the switching loop after spawning
/// one receiver per port plus the metrics worker. Everything the loop needs
/// exclusively (the CAM table) lives in `&mut self`; everything shared with
/// the workers (queue, counters, ports) is behind an `Arc`.
pub struct Layer2Switch {
    ports: Vec<PortHandle>,
    cam: CamTable,
    queue: Arc<FrameQueue>,
    metrics: Arc<SwitchMetrics>,
}

impl Layer2Switch {
    /// Creates a switch over the given port set. Ports stay alive for the
    /// life of the process; the handles here are shared with the per-port
    /// receivers and the CAM table.
    pub fn new(ports: Vec<PortHandle>) -> Layer2Switch {
        Layer2Switch {
            ports: ports,
            cam: CamTable::new(),
            queue: Arc::new(FrameQueue::new()),
            metrics: Arc::new(SwitchMetrics::new()),
        }
    }

    /// The ingress queue shared by this switch's receivers.
    pub fn queue(&self) -> Arc<FrameQueue> {
        self.queue.clone()
    }

    /// The counter block shared by this switch's workers.
    pub fn metrics(&self) -> Arc<SwitchMetrics> {
        self.metrics.clone()
    }

    /// Read access to the CAM table, for inspection.
    pub fn cam(&self) -> &CamTable {
        &self.cam
    }

    /// Spawns one frame receiver per port and the metrics worker, then
    /// runs the switching loop on the calling thread. Never returns; the
    /// process runs until externally terminated.
    pub fn start(mut self) -> ! {
        info!("Starting virtual layer 2 switch process on {} port(s)",
              self.ports.len());

        for port in &self.ports {
            info!("Starting frame receiver worker on {}", port.name());
            FrameReceiver::new(port.clone(), self.queue.clone(), self.metrics.clone()).spawn();
        }

        info!("Starting metrics worker");
        metrics::spawn_metrics_worker(self.metrics.clone());

        info!("Starting main switch loop");
        loop {
            self.process_next();
        }
    }

    /// One full step of the switching loop: dequeue a frame, learn its
    /// source, then either unicast it to the learned destination port or
    /// flood it.
    ///
    /// No error escapes this method. Each frame is processed to completion
    /// (sent, partially flooded or abandoned) before the loop moves on.
    pub fn process_next(&mut self) {
        let (frame, ingress) = self.queue.pop();

        // Learn unconditionally, broadcast source MACs included.
        self.cam.learn(frame.source_mac(), ingress.clone());

        // Flood on a broadcast destination or a CAM miss; otherwise the
        // destination port is known and the frame is sent there directly,
        // even when that happens to be the ingress port.
        let destination = frame.destination_mac();
        if destination.is_broadcast() {
            self.flood(&frame, &ingress);
            return;
        }
        match self.cam.lookup(&destination) {
            Some(egress) => {
                let egress = egress.clone();
                self.unicast(&frame, &ingress, &egress);
            }
            None => self.flood(&frame, &ingress),
        }
    }

    /// Emits `frame` on every port except the ingress port. The flood
    /// counter moves exactly once per decision no matter how many ports are
    /// reached. The first failed send abandons the remainder of the flood
    /// for this frame.
    fn flood(&self, frame: &Frame, ingress: &PortHandle) {
        self.metrics.count_flood();

        for port in &self.ports {
            if port.identity_equals(ingress.as_ref()) {
                continue;
            }
            if !port.send(frame) {
                self.metrics.count_flood_error();
                error!("Error while flooding frame to {}", port.name());
                return;
            }
            self.metrics.count_sent_frame();
        }
    }

    fn unicast(&self, frame: &Frame, ingress: &PortHandle, egress: &PortHandle) {
        if !egress.send(frame) {
            self.metrics.count_send_error();
            error!("Error while sending frame from {} to {}",
                   ingress.name(),
                   egress.name());
            return;
        }
        self.metrics.count_sent_frame();
    }
}
