use std::collections::HashMap;

use crate::macaddr::MacAddress;
use crate::port::PortHandle;

/// The switch's CAM table: which port a source MAC was last seen on.
///
/// Learning is insert-or-assign, a MAC that shows up on a new port simply
/// overwrites its old entry. Entries never expire and the table has no size
/// cap. Only the switching loop touches it, so it carries no lock.
pub struct CamTable {
    map: HashMap<MacAddress, PortHandle>,
}

impl CamTable {
    pub fn new() -> Self {
        CamTable { map: HashMap::new() }
    }

    /// Records that `mac` was last seen on `port`, replacing any previous
    /// entry for that MAC.
    pub fn learn(&mut self, mac: MacAddress, port: PortHandle) {
        self.map.insert(mac, port);
    }

    /// Looks up the port `mac` was learned on, if any.
    pub fn lookup(&self, mac: &MacAddress) -> Option<&PortHandle> {
        self.map.get(mac)
    }

    /// Number of learned entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for CamTable {
    fn default() -> Self {
        CamTable::new()
    }
}
