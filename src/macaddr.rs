use std::fmt;
use std::hash::{Hash, Hasher};

use pnet::util::MacAddr;

/// A 48 bit MAC address.
///
/// Stored as its six octets, but equality, ordering and hashing all go
/// through the packed integer view so that every representation of the same
/// address agrees. Formats as six uppercase hex pairs separated by colons,
/// e.g. `AA:BB:CC:00:11:22`.
#[derive(Clone, Copy, Debug)]
pub struct MacAddress {
    octets: [u8; 6],
}

impl MacAddress {
    /// Creates a new `MacAddress` from its six octets, given in the order
    /// they appear on the wire.
    pub fn new(o1: u8, o2: u8, o3: u8, o4: u8, o5: u8, o6: u8) -> MacAddress {
        MacAddress { octets: [o1, o2, o3, o4, o5, o6] }
    }

    /// The broadcast address, `FF:FF:FF:FF:FF:FF`.
    pub fn broadcast() -> MacAddress {
        MacAddress { octets: [0xff; 6] }
    }

    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }

    /// The octets packed big-endian into the low 48 bits of a `u64`.
    pub fn as_u64(&self) -> u64 {
        (self.octets[0] as u64) << 40 | (self.octets[1] as u64) << 32 |
        (self.octets[2] as u64) << 24 | (self.octets[3] as u64) << 16 |
        (self.octets[4] as u64) << 8 | (self.octets[5] as u64)
    }

    /// Returns true iff all 48 bits of the address are set.
    pub fn is_broadcast(&self) -> bool {
        self.as_u64() == 0xffff_ffff_ffff
    }
}

impl From<MacAddr> for MacAddress {
    fn from(mac: MacAddr) -> MacAddress {
        let MacAddr(o1, o2, o3, o4, o5, o6) = mac;
        MacAddress::new(o1, o2, o3, o4, o5, o6)
    }
}

impl PartialEq for MacAddress {
    fn eq(&self, other: &MacAddress) -> bool {
        self.as_u64() == other.as_u64()
    }
}

impl Eq for MacAddress {}

impl PartialOrd for MacAddress {
    fn partial_cmp(&self, other: &MacAddress) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MacAddress {
    fn cmp(&self, other: &MacAddress) -> std::cmp::Ordering {
        self.as_u64().cmp(&other.as_u64())
    }
}

// The integer view is the hash. MACs are not attacker chosen here, so
// feeding it straight to the hasher is fine.
impl Hash for MacAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.as_u64());
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt,
               "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
               self.octets[0],
               self.octets[1],
               self.octets[2],
               self.octets[3],
               self.octets[4],
               self.octets[5])
    }
}
