use std::sync::Arc;

use clap::Parser;
use log::LevelFilter;
use syslog::Facility;

use virtualswitch::{fatal, DatalinkPort, Layer2Switch, PortHandle};

static SYSLOG_PROCESS_NAME: &str = "virtualswitch";

/// A user-space layer 2 switch over host network interfaces.
///
/// Binds a raw socket to every given interface and bridges ethernet frames
/// between them, learning MAC locations as traffic passes through. Needs
/// privileges sufficient to open AF_PACKET sockets.
#[derive(Parser)]
#[command(name = "virtualswitch")]
struct Args {
    /// Interface names to attach switch ports to
    #[arg(required = true, value_name = "INTERFACE")]
    interfaces: Vec<String>,
}

/// Routes log records to the host syslog facility under the
/// `virtualswitch` identifier, like any other network daemon. When no
/// syslog daemon is reachable the records go to stderr instead, so nothing
/// is silently dropped when running in the foreground.
fn init_logging() {
    let to_syslog = syslog::init(Facility::LOG_DAEMON,
                                 LevelFilter::Info,
                                 Some(SYSLOG_PROCESS_NAME));
    if to_syslog.is_err() {
        env_logger::Builder::new().filter_level(LevelFilter::Info).init();
    }
}

fn main() {
    init_logging();
    let args = Args::parse();

    let mut ports: Vec<PortHandle> = Vec::with_capacity(args.interfaces.len());
    for name in &args.interfaces {
        match DatalinkPort::new(name) {
            Ok(port) => ports.push(Arc::new(port)),
            Err(e) => fatal!("Failed to open port on interface {}: {}", name, e),
        }
    }

    Layer2Switch::new(ports).start();
}
