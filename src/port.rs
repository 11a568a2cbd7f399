use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

use pnet::datalink::{self, Channel, DataLinkReceiver, DataLinkSender};

use crate::frame::{Frame, MAX_FRAME_SIZE};

/// How ports are shared between the supervisor, their receiver task and the
/// switching loop. No cycles exist, ports never reference the switch.
pub type PortHandle = Arc<dyn EthernetPort>;

/// One bidirectional endpoint of the switch, bound to a single host
/// interface.
///
/// The switching core is written entirely against this trait so that tests
/// can substitute in-memory ports for the raw-socket backed production
/// implementation. Implementations must allow `send` to be called from the
/// switching loop while a `receive_next` is pending in the receiver thread.
pub trait EthernetPort: Send + Sync {
    /// Name of the host interface this port is bound to. Only used for
    /// log records.
    fn name(&self) -> &str;

    /// Identity of the underlying endpoint, e.g. the interface index or a
    /// mock id. Two handles denote the same port iff their ids are equal.
    fn id(&self) -> u64;

    /// Blocks until the next frame arrives on this port and returns it.
    /// Returns `None` on any receive or parse error so the receiver can
    /// treat every failure uniformly.
    fn receive_next(&self) -> Option<Frame>;

    /// Best-effort transmission of `frame` on this port. Returns false on
    /// any error.
    fn send(&self, frame: &Frame) -> bool;

    /// True iff `other` denotes the same endpoint as this handle. The
    /// flood rule uses this to exclude the ingress port.
    fn identity_equals(&self, other: &dyn EthernetPort) -> bool {
        self.id() == other.id()
    }
}

/// Error returned when a port could not be brought up on an interface.
/// These are fatal at startup, there is no soft path around a port that
/// never existed.
#[derive(Debug)]
pub enum PortError {
    /// The named interface does not exist on this host.
    NoSuchInterface(String),

    /// The datalink backend returned something other than an ethernet
    /// channel for the interface.
    InvalidChannelType,

    /// The channel could not be opened, typically missing privileges for
    /// raw sockets.
    IoError(io::Error),
}

impl From<io::Error> for PortError {
    fn from(e: io::Error) -> Self {
        PortError::IoError(e)
    }
}

impl From<PortError> for io::Error {
    fn from(e: PortError) -> Self {
        let other = |msg| io::Error::new(io::ErrorKind::Other, msg);
        match e {
            PortError::NoSuchInterface(name) => other(format!("No such interface: {}", name)),
            PortError::InvalidChannelType => other("Invalid channel type".to_owned()),
            PortError::IoError(e2) => e2,
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PortError::NoSuchInterface(ref name) => write!(fmt, "No such interface: {}", name),
            PortError::InvalidChannelType => fmt.write_str("Invalid channel type"),
            PortError::IoError(ref e) => write!(fmt, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let PortError::IoError(ref e) = *self {
            Some(e)
        } else {
            None
        }
    }
}

/// Production port implementation on top of `pnet::datalink`.
///
/// Opening the channel binds an `AF_PACKET`/`ETH_P_ALL` raw socket to the
/// interface, so every frame on the wire is delivered, VLAN tagged ones
/// included. The receive buffer is sized to [`MAX_FRAME_SIZE`] and reused
/// across reads; each returned `Frame` copies out only the prefix that was
/// actually read. The sender and receiver halves sit behind separate locks
/// so the switching loop can transmit while the receiver thread is parked
/// in the kernel.
pub struct DatalinkPort {
    name: String,
    index: u64,
    sender: Mutex<Box<dyn DataLinkSender>>,
    receiver: Mutex<Box<dyn DataLinkReceiver>>,
}

impl DatalinkPort {
    /// Opens a raw channel on the named interface and wraps it in a port.
    /// Fails if the interface does not exist, the channel cannot be opened
    /// or the backend hands back a non-ethernet channel.
    pub fn new(name: &str) -> Result<DatalinkPort, PortError> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| PortError::NoSuchInterface(name.to_owned()))?;

        let mut config = datalink::Config::default();
        config.read_buffer_size = MAX_FRAME_SIZE;
        config.write_buffer_size = MAX_FRAME_SIZE;

        match datalink::channel(&interface, config)? {
            Channel::Ethernet(sender, receiver) => {
                Ok(DatalinkPort {
                    name: interface.name,
                    index: interface.index as u64,
                    sender: Mutex::new(sender),
                    receiver: Mutex::new(receiver),
                })
            }
            _ => Err(PortError::InvalidChannelType),
        }
    }
}

impl EthernetPort for DatalinkPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> u64 {
        self.index
    }

    fn receive_next(&self) -> Option<Frame> {
        let mut receiver = self.receiver.lock().unwrap();
        match receiver.next() {
            Ok(buffer) => Frame::from_buffer(buffer),
            Err(e) => {
                debug!("Read error on {}: {}", self.name, e);
                None
            }
        }
    }

    fn send(&self, frame: &Frame) -> bool {
        let mut sender = self.sender.lock().unwrap();
        match sender.send_to(frame.buffer(), None) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                debug!("Send error on {}: {}", self.name, e);
                false
            }
            None => false,
        }
    }
}
