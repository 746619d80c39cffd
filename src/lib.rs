//! Broadcast UDP over raw packet sockets, for clients that do not have an address yet.
//!
//! Address-assignment protocols face a chicken-and-egg problem: the very packets that will assign
//! an interface its IPv4 address must themselves be sent as UDP, which the kernel's UDP stack
//! refuses to carry for an unconfigured interface. This crate solves that by speaking UDP
//! directly over a link-layer packet socket:
//!
//! * [`wire`] is the header codec: parsing and emission of IPv4 and UDP headers, including the
//!   internet checksum and the UDP pseudo header.
//! * [`sys`] wraps the raw OS surface: the `AF_PACKET` socket every frame passes through, and a
//!   preconfigured kernel UDP socket for the time after an address is assigned.
//! * [`conn`] combines the two into [`BroadcastUdpConn`], a connection with plain
//!   `send_to`/`recv_from` datagram semantics whose outbound frames are broadcast at the link
//!   layer.
//!
//! A typical client binds to its protocol's port before it has an address:
//!
//! ```no_run
//! use rawudp::{BroadcastUdpConn, Addr, Endpoint};
//! use rawudp::wire::Ipv4Address;
//!
//! # fn main() -> Result<(), rawudp::Error> {
//! let mut conn = BroadcastUdpConn::open("eth0", 68).map_err(rawudp::Error::Io)?;
//!
//! let server = Addr::Udp(Endpoint::new(Ipv4Address::BROADCAST, 67));
//! conn.send_to(b"discover", server)?;
//!
//! let mut buffer = [0; 1500];
//! let (len, from) = conn.recv_from(&mut buffer)?;
//! println!("{} bytes for {}", len, from);
//! # Ok(()) }
//! ```
//!
//! The `wire` module is `no_std` compatible; disable the default `std` feature to use it alone.
//!
//! [`wire`]: wire/index.html
//! [`sys`]: sys/index.html
//! [`conn`]: conn/index.html
//! [`BroadcastUdpConn`]: conn/struct.BroadcastUdpConn.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use] mod macros;
pub mod wire;

#[cfg(feature = "std")]
pub mod sys;
#[cfg(feature = "std")]
pub mod conn;

#[cfg(feature = "std")]
pub use self::conn::{Addr, BroadcastUdpConn, Endpoint, Error, FrameTransport, Result};
