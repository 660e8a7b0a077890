use std::net::{Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use crate::{QueryId, RecordType};

/// A single step of a randomized pool workload
#[derive(Debug, Clone, proptest_derive::Arbitrary)]
pub enum PoolOp {
    /// Allocate a record with the given original id
    Allocate(u16),
    /// Free one of the live records, picked by index modulo their number
    Free(usize),
    /// Free an id regardless of whether it's allocated
    FreeUnallocated(QueryId),
}

pub fn ipv4_mapped(address: Ipv4Addr) -> Ipv6Addr {
    address.to_ipv6_mapped()
}

pub fn ipv4_compatible(address: Ipv4Addr) -> Ipv6Addr {
    let mut octets = [0; 16];
    octets[12..].copy_from_slice(&address.octets());
    Ipv6Addr::from(octets)
}

/// IPv6 addresses whose first 80 bits aren't all zero, so they can't embed an
/// IPv4 address
pub fn arb_ipv6_without_embedded_ipv4() -> impl Strategy<Value = Ipv6Addr> {
    any::<[u8; 16]>()
        .prop_filter("IPv6 address with a zero 80-bit prefix", |octets| {
            octets[..10].iter().any(|&byte| byte != 0)
        })
        .prop_map(Ipv6Addr::from)
}

/// RDATA that is too short for the record type
pub fn arb_truncated_rdata() -> impl Strategy<Value = (RecordType, Vec<u8>)> {
    any::<RecordType>().prop_flat_map(|record_type| {
        (
            Just(record_type),
            proptest::collection::vec(any::<u8>(), 0..record_type.rdata_len()),
        )
    })
}
