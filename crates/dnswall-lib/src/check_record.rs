//! Checks addresses from A and AAAA answers against the ranges that must never
//! be handed out for an external name.
//!
//! All checks return `true` if the address is externally routable and the
//! record may be forwarded, or `false` if it must be blocked. Truncated RDATA is
//! always blocked.

use std::net::IpAddr;

/// RDATA length of an A record
pub const A_RECORD_LEN: usize = 4;
/// RDATA length of an AAAA record
pub const AAAA_RECORD_LEN: usize = 16;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    /// Maps a QTYPE to a record type that carries an address.
    pub fn from_qtype(qtype: u16) -> Option<Self> {
        match qtype {
            1 => Some(RecordType::A),
            28 => Some(RecordType::Aaaa),
            _ => None,
        }
    }

    pub fn rdata_len(&self) -> usize {
        match self {
            RecordType::A => A_RECORD_LEN,
            RecordType::Aaaa => AAAA_RECORD_LEN,
        }
    }
}

/// Checks the RDATA of an answer record of the given type.
pub fn check_record(record_type: RecordType, rdata: &[u8]) -> bool {
    let allowed = match record_type {
        RecordType::A => check_a_record(rdata),
        RecordType::Aaaa => check_aaaa_record(rdata),
    };
    if !allowed {
        tracing::debug!(?record_type, ?rdata, "Blocking an internal address");
    }
    allowed
}

pub fn check_ip_addr(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(addr) => check_a_record(&addr.octets()),
        IpAddr::V6(addr) => check_aaaa_record(&addr.octets()),
    }
}

pub fn check_a_record(rdata: &[u8]) -> bool {
    let Some(&[first, second, ..]) = rdata.get(..A_RECORD_LEN) else {
        return false;
    };

    // "This network", 0.0.0.0/8
    if first == 0 {
        return false;
    }

    // Loopback, 127.0.0.0/8
    if first == 127 {
        return false;
    }

    // Link-local, 169.254.0.0/16
    if first == 169 && second == 254 {
        return false;
    }

    // Private-use, 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16
    if first == 10 || (first == 172 && second >> 4 == 16 >> 4) || (first == 192 && second == 168) {
        return false;
    }

    // Multicast, 224.0.0.0/4
    // There's no way to tell which groups internal hosts have joined, so all of it is blocked
    if first >> 4 == 224 >> 4 {
        return false;
    }

    true
}

pub fn check_aaaa_record(rdata: &[u8]) -> bool {
    let Some(address) = rdata.get(..AAAA_RECORD_LEN) else {
        return false;
    };

    if address[..10].iter().all(|&byte| byte == 0) {
        if address[10..15].iter().all(|&byte| byte == 0) {
            // Unspecified (::) and loopback (::1), RFC 3513 2.5.2 and 2.5.3
            if address[15] == 0 || address[15] == 1 {
                return false;
            }
        }

        // IPv4-compatible (::a.b.c.d) and IPv4-mapped (::ffff:a.b.c.d), RFC 3513 2.5.4
        match (address[10], address[11]) {
            (0x00, 0x00) | (0xff, 0xff) => return check_a_record(&address[12..]),
            _ => {}
        }
    }

    let (first, second) = (address[0], address[1]);

    // Unique local, fc00::/7
    if first >> 1 == 0xfc >> 1 {
        return false;
    }

    // Link-local, fe80::/10
    if first == 0xfe && second >> 6 == 0x80 >> 6 {
        return false;
    }

    // Site-local, fec0::/10
    // Deprecated by RFC 3879, but still blocked
    if first == 0xfe && second >> 6 == 0xc0 >> 6 {
        return false;
    }

    // Multicast, ff00::/8
    if first == 0xff {
        return false;
    }

    true
}
