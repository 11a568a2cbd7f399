// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # virtualswitch - a user-space layer 2 switch
//!
//! `virtualswitch` simulates an ethernet learning bridge in user space,
//! backed by [`libpnet`](https://github.com/libpnet/libpnet) for its raw
//! ethernet access. It binds one port per host interface, learns which port
//! each source MAC lives behind and forwards frames accordingly; broadcast
//! and unknown destinations are flooded out of every port except the one
//! the frame arrived on.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let ports = vec![Arc::new(DatalinkPort::new("eth0")?) as PortHandle,
//!                  Arc::new(DatalinkPort::new("eth1")?) as PortHandle];
//! Layer2Switch::new(ports).start();
//! ```
//!
//! ## Architecture
//!
//! Every port gets its own receiver thread that blocks in the kernel
//! waiting for frames and pushes each one, paired with its ingress port,
//! onto a shared bounded FIFO. A single switching loop pops from that
//! queue, records the source MAC in the CAM table, then either unicasts
//! the frame to the port its destination was learned on or floods it.
//! A metrics worker wakes up once a minute and publishes the six switch
//! counters to the log. That makes N+2 long-lived threads for N ports, no
//! pools and no work stealing; the only shared mutable state is the queue
//! and the counters.
//!
//! Ports are handed around as `Arc<dyn EthernetPort>`. The trait is the
//! testing seam: the production implementation wraps a pnet datalink
//! channel, the one in [`testing`] is scripted in memory, and the
//! switching core cannot tell them apart.
//!
//! ## Tests
//!
//! Unit tests live next to what they test, in `#[cfg(test)]` modules. The
//! end-to-end switching scenarios are integration tests under `tests/`,
//! driven through the synchronous seams (`FrameReceiver::poll_once` and
//! `Layer2Switch::process_next`) so they need neither raw sockets nor
//! sleeps.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod macaddr;
pub use crate::macaddr::MacAddress;

pub mod frame;
pub use crate::frame::{Frame, MAX_FRAME_SIZE};

/// Module containing the port abstraction and its raw-socket backed
/// production implementation.
pub mod port;
pub use crate::port::{DatalinkPort, EthernetPort, PortError, PortHandle};

pub mod camtable;
pub use crate::camtable::CamTable;

pub mod queue;
pub use crate::queue::FrameQueue;

pub mod metrics;
pub use crate::metrics::{MetricsSnapshot, SwitchMetrics, METRICS_INTERVAL};

pub mod rx;
pub use crate::rx::FrameReceiver;

pub mod switch;
pub use crate::switch::Layer2Switch;

/// Module containing mock ports for tests.
pub mod testing;
