/*! Low-level packet access and construction.

The `wire` module is the header codec of this crate. It provides two levels of functionality:

 * Functions to extract fields from sequences of octets, and to insert fields into sequences of
   octets. This happens in the lowercase structures, e.g. [`ipv4_packet`] or [`udp_packet`].
 * A compact, high-level representation of header data that can be created from parsing and
   emitted into a sequence of octets. This happens through the `Repr` family of structs, e.g.
   [`Ipv4Repr`] or [`UdpRepr`].

[`ipv4_packet`]: struct.ipv4_packet.html
[`udp_packet`]: struct.udp_packet.html
[`Ipv4Repr`]: struct.Ipv4Repr.html
[`UdpRepr`]: struct.UdpRepr.html

The `packet` family of data structures guarantees that, if the `packet::check_len()` method
returned `Ok(())`, then no field accessor or setter method will panic. The `Repr::parse()` method
never panics and the `Repr::emit()` method never panics as long as the underlying buffer covers
the header it emits.

# Examples

To emit an IP packet header into an octet buffer, and then parse it back:

```rust
use rawudp::wire::*;
let repr = Ipv4Repr {
    src_addr:    Ipv4Address::new(10, 0, 0, 1),
    dst_addr:    Ipv4Address::new(10, 0, 0, 2),
    protocol:    IpProtocol::Udp,
    payload_len: 10,
    hop_limit:   30,
};
let mut buffer = vec![0; repr.buffer_len() + repr.payload_len];
{ // emission
    let packet = ipv4_packet::new_unchecked_mut(&mut buffer);
    repr.emit(packet, Checksum::Manual);
}
{ // parsing
    let packet = ipv4_packet::new_checked(&buffer)
        .expect("truncated packet");
    let parsed = Ipv4Repr::parse(packet, Checksum::Manual)
        .expect("malformed packet");
    assert_eq!(repr, parsed);
}
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `error.rs`
// * `ethernet.rs`
// * `ip.rs`
// * `ipv4.rs`
// * `mod.rs` (this file)
// * `udp.rs`

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

mod error;
mod ethernet;
pub(crate) mod ip;
mod ipv4;
mod udp;

/// Describes how to handle checksums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checksum {
    /// Checksum must be computed or checked manually.
    Manual,

    /// The checksum field is filled or checked elsewhere, e.g. by hardware offload.
    Ignored,
}

pub use self::error::{
    Error,
    Result};

pub use self::ethernet::{
    EtherType as EthernetProtocol,
    Address as EthernetAddress};

pub use self::ip::Protocol as IpProtocol;

pub use self::ipv4::{
    ipv4 as ipv4_packet,
    Address as Ipv4Address,
    Repr as Ipv4Repr,
    MIN_HEADER_LEN as IPV4_MIN_HEADER_LEN,
    MAX_HEADER_LEN as IPV4_MAX_HEADER_LEN};

pub use self::udp::{
    udp as udp_packet,
    Checksum as UdpChecksum,
    Repr as UdpRepr,
    HEADER_LEN as UDP_HEADER_LEN};

impl Checksum {
    /// Check if a checksum should be calculated by the library.
    ///
    /// Otherwise it is ignored due to the assumption that it was offloaded or is otherwise
    /// undesirable to check.
    pub fn manual(self) -> bool {
        match self {
            Checksum::Manual => true,
            Checksum::Ignored => false,
        }
    }
}
