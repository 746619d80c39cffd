//! Broadcast UDP packet conns over a raw link.
//!
//! The conn in this module solves the bootstrap problem of address-assignment protocols: a client
//! has to exchange UDP datagrams before its interface has any IPv4 address, so the kernel UDP
//! stack can not carry them yet. [`BroadcastUdpConn`] instead writes full IPv4+UDP frames to a
//! link-layer transport and parses inbound frames itself, filtering them against the address it
//! is logically bound to. Callers see plain `recv_from`/`send_to` datagram semantics.
//!
//! Outbound frames are always addressed to the all-ones broadcast hardware address; there is no
//! way to direct traffic at a single link-layer peer through this conn.
//!
//! [`BroadcastUdpConn`]: struct.BroadcastUdpConn.html

use core::fmt;
use std::io;

use crate::wire::{
    ipv4_packet, udp_packet,
    EthernetAddress, EthernetProtocol, IpProtocol,
    Checksum, Ipv4Address, Ipv4Repr, UdpChecksum, UdpRepr,
    IPV4_MAX_HEADER_LEN, IPV4_MIN_HEADER_LEN, UDP_HEADER_LEN,
};

#[cfg(target_os = "linux")]
use crate::sys::PacketSocketDesc;

/// Time-to-live of every emitted packet. Not configurable.
const HOP_LIMIT: u8 = 30;

/// A UDP endpoint, the address form used throughout this conn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// The IPv4 address. `None` acts as a wildcard when filtering inbound packets and stands for
    /// the unspecified address when sourcing outbound ones.
    pub addr: Option<Ipv4Address>,
    /// The UDP port.
    pub port: u16,
}

impl Endpoint {
    /// An endpoint with a port only, the usual shape for a conn still waiting for an address.
    pub const fn port(port: u16) -> Endpoint {
        Endpoint { addr: None, port }
    }

    /// An endpoint with both address and port.
    pub const fn new(addr: Ipv4Address, port: u16) -> Endpoint {
        Endpoint { addr: Some(addr), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.addr {
            Some(addr) => write!(f, "{}:{}", addr, self.port),
            None => write!(f, "*:{}", self.port),
        }
    }
}

/// The kinds of address that appear on a broadcast UDP conn.
///
/// [`send_to`] accepts only the [`Udp`] case; handing it a link-layer address is a contract
/// violation answered with [`Error::NotUdpAddr`] rather than a panic.
///
/// [`send_to`]: struct.BroadcastUdpConn.html#method.send_to
/// [`Udp`]: #variant.Udp
/// [`Error::NotUdpAddr`]: enum.Error.html#variant.NotUdpAddr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addr {
    /// A UDP endpoint.
    Udp(Endpoint),
    /// A link-layer hardware address, the addressing the raw transport itself speaks.
    Link(EthernetAddress),
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Addr::Udp(endpoint) => endpoint.fmt(f),
            Addr::Link(addr) => addr.fmt(f),
        }
    }
}

/// Errors surfaced by [`BroadcastUdpConn`].
///
/// [`BroadcastUdpConn`]: struct.BroadcastUdpConn.html
#[derive(Debug)]
pub enum Error {
    /// The destination address handed to `send_to` was not a UDP endpoint.
    NotUdpAddr,
    /// An error of the underlying frame transport, passed through verbatim.
    Io(io::Error),
}

/// The result type of conn operations.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotUdpAddr => f.write_str("destination is not a udp address"),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotUdpAddr => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// A packet-oriented link to a network interface.
///
/// This is the seam between the conn and the OS: [`PacketSocketDesc`] implements it for real
/// interfaces, tests substitute an in-memory double. Implementations deliver whole frames, one
/// per call, and must support the broadcast hardware address on send.
///
/// The conn performs no synchronization of its own; concurrency guarantees are whatever the
/// implementation provides. One reader plus one writer is the intended usage.
///
/// [`PacketSocketDesc`]: ../sys/struct.PacketSocketDesc.html
pub trait FrameTransport {
    /// Receive a single frame, blocking until one arrives.
    ///
    /// A frame longer than the buffer is truncated to the buffer's length.
    fn recv_frame(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Send a single frame to the given hardware address.
    fn send_frame(&mut self, buffer: &[u8], addr: EthernetAddress) -> io::Result<usize>;

    /// Close the transport.
    ///
    /// This is the only way to cancel a read blocked in [`recv_frame`]: closing from another
    /// thread makes the blocked read return an error.
    ///
    /// [`recv_frame`]: #tymethod.recv_frame
    fn close(&mut self) -> io::Result<()>;
}

#[cfg(target_os = "linux")]
impl FrameTransport for PacketSocketDesc {
    fn recv_frame(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.recv(buffer).map_err(io::Error::from)
    }

    fn send_frame(&mut self, buffer: &[u8], addr: EthernetAddress) -> io::Result<usize> {
        self.send_to(buffer, addr).map_err(io::Error::from)
    }

    fn close(&mut self) -> io::Result<()> {
        PacketSocketDesc::close(self).map_err(io::Error::from)
    }
}

/// Decide whether an inbound packet addressed at `candidate` belongs to a conn bound to `bound`.
///
/// An absent filter accepts everything. A present filter always compares the port and compares
/// the address only when it names one.
fn udp_match(candidate: &Endpoint, bound: Option<&Endpoint>) -> bool {
    let bound = match bound {
        Some(bound) => bound,
        None => return true,
    };

    if bound.addr.is_some() && bound.addr != candidate.addr {
        return false;
    }

    bound.port == candidate.port
}

/// A conn exchanging UDP datagrams over a broadcast-only raw link.
///
/// On send, wraps the payload in IPv4 and UDP headers and broadcasts the frame. On receive,
/// parses inbound frames and returns the first whose destination matches the bound address,
/// silently discarding everything else.
///
/// The bound address doubles as the source of outbound packets, even though it was chosen for
/// inbound filtering. The original transport this reimplements behaved that way and protocol
/// clients rely on it.
pub struct BroadcastUdpConn<T> {
    transport: T,
    bound: Option<Endpoint>,
}

#[cfg(target_os = "linux")]
impl BroadcastUdpConn<PacketSocketDesc> {
    /// Open a packet socket on the named interface and wrap it into a conn bound to `port`.
    ///
    /// The socket only receives frames with an IPv4 Ethernet type. The conn filters by port
    /// alone, which is what a client without an address needs.
    pub fn open(name: &str, port: u16) -> io::Result<BroadcastUdpConn<PacketSocketDesc>> {
        let transport = PacketSocketDesc::open(name, EthernetProtocol::Ipv4)?;
        Ok(BroadcastUdpConn::new(transport, Some(Endpoint::port(port))))
    }
}

impl<T: FrameTransport> BroadcastUdpConn<T> {
    /// Wrap a frame transport into a conn bound to the given address.
    ///
    /// `None` creates an unrestricted conn that accepts every UDP packet on the link. The bound
    /// address is fixed for the conn's lifetime.
    pub fn new(transport: T, bound: Option<Endpoint>) -> BroadcastUdpConn<T> {
        BroadcastUdpConn {
            transport,
            bound,
        }
    }

    /// The address this conn is logically bound to.
    pub fn local_addr(&self) -> Addr {
        Addr::Udp(self.bound.unwrap_or(Endpoint::port(0)))
    }

    /// Get a reference to the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Unwrap the conn into its transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Close the underlying transport.
    ///
    /// Reads blocked in [`recv_from`] on another thread return an error afterwards; this is the
    /// only way to cancel them.
    ///
    /// [`recv_from`]: #method.recv_from
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()?;
        Ok(())
    }

    /// Send `payload` as a UDP datagram to `addr`, broadcast at the link layer.
    ///
    /// The source address and port of the datagram are the conn's bound address, with the
    /// unspecified address and port zero standing in for unset parts. Returns the number of
    /// payload bytes written, which is always the whole payload on success.
    ///
    /// Payloads must fit a single link-layer frame; there is no fragmentation. Oversized
    /// payloads fail in the transport, not here.
    pub fn send_to(&mut self, payload: &[u8], addr: Addr) -> Result<usize> {
        let dst = match addr {
            Addr::Udp(endpoint) => endpoint,
            _ => return Err(Error::NotUdpAddr),
        };

        let frame = udp4_frame(payload, &dst, self.bound.as_ref());
        self.transport.send_frame(&frame, EthernetAddress::BROADCAST)?;
        Ok(payload.len())
    }

    /// Receive the payload of the next UDP datagram destined to the bound address.
    ///
    /// Blocks until a matching datagram arrives, silently discarding frames that are malformed,
    /// carry another transport protocol, or are addressed elsewhere. There is no bound on the
    /// number of discarded frames, so sustained unrelated traffic delays this indefinitely;
    /// cancel by closing the conn from another thread, or gate calls on [`sys::wait`].
    ///
    /// A payload longer than `buffer` is silently truncated to the buffer's length. Returns the
    /// copied length and the datagram's destination endpoint, which for broadcast traffic
    /// identifies the sender's intended receiver, not the sender itself.
    ///
    /// [`sys::wait`]: ../sys/fn.wait.html
    pub fn recv_from(&mut self, buffer: &mut [u8]) -> Result<(usize, Endpoint)> {
        // Sized for the worst case: a maximal IPv4 header, the UDP header, and as much payload
        // as the caller can accept.
        let mut frame = vec![0; IPV4_MAX_HEADER_LEN + UDP_HEADER_LEN + buffer.len()];

        loop {
            let n = self.transport.recv_frame(&mut frame)?;
            let packet = &frame[..n];

            // The header length is itself part of the header: read the fixed prefix first, then
            // consume exactly that many bytes. Anything inconsistent is dropped, the link
            // carries arbitrary traffic and none of it is an error for us.
            if packet.len() < IPV4_MIN_HEADER_LEN {
                continue;
            }
            let header_len = ipv4_packet::new_unchecked(packet).header_len() as usize;
            if header_len < IPV4_MIN_HEADER_LEN || packet.len() < header_len + UDP_HEADER_LEN {
                continue;
            }

            let (ip_header, rest) = packet.split_at(header_len);
            let ip_header = ipv4_packet::new_unchecked(ip_header);
            if ip_header.protocol() != IpProtocol::Udp {
                continue;
            }

            let (udp_header, payload) = rest.split_at(UDP_HEADER_LEN);
            let udp_header = udp_packet::new_unchecked(udp_header);

            let endpoint = Endpoint::new(ip_header.dst_addr(), udp_header.dst_port());
            if !udp_match(&endpoint, self.bound.as_ref()) {
                continue;
            }

            let n = buffer.len().min(payload.len());
            buffer[..n].copy_from_slice(&payload[..n]);
            return Ok((n, endpoint));
        }
    }
}

/// Build a full IPv4+UDP frame around `payload`.
///
/// The destination comes from `dst`, the source from `src` where set. Checksums are computed
/// fresh over the final field values.
fn udp4_frame(payload: &[u8], dst: &Endpoint, src: Option<&Endpoint>) -> Vec<u8> {
    let src_addr = src.and_then(|endpoint| endpoint.addr).unwrap_or(Ipv4Address::UNSPECIFIED);
    let src_port = src.map(|endpoint| endpoint.port).unwrap_or(0);
    let dst_addr = dst.addr.unwrap_or(Ipv4Address::UNSPECIFIED);

    let ip_repr = Ipv4Repr {
        src_addr,
        dst_addr,
        protocol: IpProtocol::Udp,
        payload_len: UDP_HEADER_LEN + payload.len(),
        hop_limit: HOP_LIMIT,
    };
    let udp_repr = UdpRepr {
        src_port,
        dst_port: dst.port,
    };

    let mut frame = vec![0; IPV4_MIN_HEADER_LEN + UDP_HEADER_LEN + payload.len()];

    let ip_header = ipv4_packet::new_unchecked_mut(&mut frame);
    ip_repr.emit(ip_header, Checksum::Manual);

    let udp = udp_packet::new_unchecked_mut(&mut frame[IPV4_MIN_HEADER_LEN..]);
    udp_repr.emit(udp, payload.len());
    udp.payload_mut_slice().copy_from_slice(payload);
    udp.fill_checksum(UdpChecksum::Manual { src_addr, dst_addr });

    frame
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// An in-memory stand-in for the raw link.
    #[derive(Default)]
    struct TestLink {
        inbound: VecDeque<Vec<u8>>,
        sent: Vec<(Vec<u8>, EthernetAddress)>,
        closed: bool,
    }

    impl FrameTransport for TestLink {
        fn recv_frame(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
            if self.closed {
                return Err(io::Error::new(io::ErrorKind::NotConnected, "link closed"));
            }
            match self.inbound.pop_front() {
                Some(frame) => {
                    let n = buffer.len().min(frame.len());
                    buffer[..n].copy_from_slice(&frame[..n]);
                    Ok(n)
                }
                // A real link would block here; for tests running dry is a hard error.
                None => Err(io::Error::new(io::ErrorKind::WouldBlock, "link drained")),
            }
        }

        fn send_frame(&mut self, buffer: &[u8], addr: EthernetAddress) -> io::Result<usize> {
            if self.closed {
                return Err(io::Error::new(io::ErrorKind::NotConnected, "link closed"));
            }
            self.sent.push((buffer.to_vec(), addr));
            Ok(buffer.len())
        }

        fn close(&mut self) -> io::Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    fn addr(a: u8, b: u8, c: u8, d: u8) -> Ipv4Address {
        Ipv4Address::new(a, b, c, d)
    }

    fn udp_to(dst: Ipv4Address, port: u16) -> Addr {
        Addr::Udp(Endpoint::new(dst, port))
    }

    /// Encode a datagram through one conn and steal the emitted frame.
    fn emitted_frame(payload: &[u8], dst: Addr, bound: Option<Endpoint>) -> Vec<u8> {
        let mut conn = BroadcastUdpConn::new(TestLink::default(), bound);
        conn.send_to(payload, dst).unwrap();
        let (frame, _) = conn.into_inner().sent.remove(0);
        frame
    }

    #[test]
    fn matcher_wildcard_ip() {
        let bound = Endpoint::port(68);
        assert!(udp_match(&Endpoint::new(addr(10, 0, 0, 5), 68), Some(&bound)));
        assert!(!udp_match(&Endpoint::new(addr(10, 0, 0, 5), 67), Some(&bound)));
    }

    #[test]
    fn matcher_exact_ip() {
        let bound = Endpoint::new(addr(10, 0, 0, 5), 68);
        assert!(udp_match(&Endpoint::new(addr(10, 0, 0, 5), 68), Some(&bound)));
        assert!(!udp_match(&Endpoint::new(addr(10, 0, 0, 9), 68), Some(&bound)));
    }

    #[test]
    fn matcher_unrestricted() {
        assert!(udp_match(&Endpoint::new(addr(10, 0, 0, 5), 68), None));
        assert!(udp_match(&Endpoint::new(addr(192, 168, 1, 1), 1), None));
    }

    #[test]
    fn round_trip() {
        let payload = b"\x01\x02\x03\x04hello";
        let frame = emitted_frame(
            payload,
            udp_to(addr(10, 0, 0, 5), 67),
            Some(Endpoint::new(addr(10, 0, 0, 1), 68)));

        let mut link = TestLink::default();
        link.inbound.push_back(frame);
        let mut conn = BroadcastUdpConn::new(link, Some(Endpoint::port(67)));

        let mut buffer = [0; 64];
        let (n, endpoint) = conn.recv_from(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], &payload[..]);
        assert_eq!(endpoint, Endpoint::new(addr(10, 0, 0, 5), 67));
    }

    #[test]
    fn frames_are_broadcast() {
        let mut conn = BroadcastUdpConn::new(TestLink::default(), Some(Endpoint::port(68)));
        conn.send_to(b"x", udp_to(addr(255, 255, 255, 255), 67)).unwrap();
        let link = conn.into_inner();
        assert_eq!(link.sent.len(), 1);
        assert_eq!(link.sent[0].1, EthernetAddress::BROADCAST);
    }

    #[test]
    fn emitted_headers_validate() {
        let payload = b"abcdefg";
        let src = Endpoint::new(addr(10, 0, 0, 1), 68);
        let frame = emitted_frame(payload, udp_to(addr(10, 0, 0, 5), 67), Some(src));

        let ip_header = ipv4_packet::new_checked(&frame).unwrap();
        assert!(ip_header.verify_checksum());
        let ip_repr = Ipv4Repr::parse(ip_header, Checksum::Manual).unwrap();
        assert_eq!(ip_repr.src_addr, addr(10, 0, 0, 1));
        assert_eq!(ip_repr.dst_addr, addr(10, 0, 0, 5));
        assert_eq!(ip_repr.protocol, IpProtocol::Udp);
        assert_eq!(ip_repr.hop_limit, 30);
        assert_eq!(ip_repr.payload_len, UDP_HEADER_LEN + payload.len());
        assert_eq!(ip_header.total_len() as usize,
                   IPV4_MIN_HEADER_LEN + UDP_HEADER_LEN + payload.len());

        let udp = udp_packet::new_checked(&frame[IPV4_MIN_HEADER_LEN..]).unwrap();
        assert_eq!(udp.src_port(), 68);
        assert_eq!(udp.dst_port(), 67);
        assert_eq!(udp.length() as usize, UDP_HEADER_LEN + payload.len());
        assert!(udp.verify_checksum(UdpChecksum::Manual {
            src_addr: addr(10, 0, 0, 1),
            dst_addr: addr(10, 0, 0, 5),
        }));
    }

    #[test]
    fn unbound_source_is_unspecified() {
        let frame = emitted_frame(b"x", udp_to(addr(10, 0, 0, 5), 67), None);
        let ip_header = ipv4_packet::new_checked(&frame).unwrap();
        assert_eq!(ip_header.src_addr(), Ipv4Address::UNSPECIFIED);
        let udp = udp_packet::new_unchecked(&frame[IPV4_MIN_HEADER_LEN..]);
        assert_eq!(udp.src_port(), 0);
    }

    #[test]
    fn send_to_link_addr_is_rejected() {
        let mut conn = BroadcastUdpConn::new(TestLink::default(), Some(Endpoint::port(68)));
        let err = conn.send_to(b"x", Addr::Link(EthernetAddress::BROADCAST)).unwrap_err();
        assert!(matches!(err, Error::NotUdpAddr));
        assert!(conn.into_inner().sent.is_empty());
    }

    #[test]
    fn truncation_returns_prefix() {
        let payload = b"0123456789";
        let frame = emitted_frame(payload, udp_to(addr(10, 0, 0, 5), 67), None);

        let mut link = TestLink::default();
        link.inbound.push_back(frame);
        let mut conn = BroadcastUdpConn::new(link, Some(Endpoint::port(67)));

        let mut buffer = [0; 3];
        let (n, _) = conn.recv_from(&mut buffer).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buffer[..], b"012");
    }

    #[test]
    fn non_udp_frames_are_skipped() {
        let tcp_frame = {
            let mut frame = emitted_frame(b"not for us", udp_to(addr(10, 0, 0, 5), 67), None);
            // Rewrite the protocol field; inbound parsing never checks header checksums.
            frame[9] = IpProtocol::Tcp.into();
            frame
        };
        let udp_frame = emitted_frame(b"for us", udp_to(addr(10, 0, 0, 5), 67), None);

        let mut link = TestLink::default();
        link.inbound.push_back(tcp_frame);
        link.inbound.push_back(udp_frame);
        let mut conn = BroadcastUdpConn::new(link, Some(Endpoint::port(67)));

        let mut buffer = [0; 64];
        let (n, _) = conn.recv_from(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"for us");
    }

    #[test]
    fn mismatched_frames_are_skipped() {
        let other_port = emitted_frame(b"elsewhere", udp_to(addr(10, 0, 0, 5), 99), None);
        let other_addr = emitted_frame(b"not here", udp_to(addr(10, 0, 0, 9), 67), None);
        let matching = emitted_frame(b"here", udp_to(addr(10, 0, 0, 5), 67), None);

        let mut link = TestLink::default();
        link.inbound.push_back(other_port);
        link.inbound.push_back(other_addr);
        link.inbound.push_back(matching);
        let mut conn = BroadcastUdpConn::new(
            link,
            Some(Endpoint::new(addr(10, 0, 0, 5), 67)));

        let mut buffer = [0; 64];
        let (n, endpoint) = conn.recv_from(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"here");
        assert_eq!(endpoint, Endpoint::new(addr(10, 0, 0, 5), 67));
    }

    #[test]
    fn header_options_are_skipped_over() {
        // A frame with a 24-byte IPv4 header (IHL = 6). The decoder must locate the UDP header
        // through the IHL field, not at a fixed offset.
        let mut frame = vec![0; 24 + UDP_HEADER_LEN + 2];
        frame[0] = 0x46;
        frame[9] = IpProtocol::Udp.into();
        frame[16..20].copy_from_slice(addr(10, 0, 0, 5).as_bytes());
        {
            let udp = udp_packet::new_unchecked_mut(&mut frame[24..]);
            udp.set_src_port(67);
            udp.set_dst_port(68);
            udp.set_length((UDP_HEADER_LEN + 2) as u16);
        }
        frame[32..34].copy_from_slice(b"ok");

        let mut link = TestLink::default();
        link.inbound.push_back(frame);
        let mut conn = BroadcastUdpConn::new(link, Some(Endpoint::port(68)));

        let mut buffer = [0; 16];
        let (n, endpoint) = conn.recv_from(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"ok");
        assert_eq!(endpoint, Endpoint::new(addr(10, 0, 0, 5), 68));
    }

    #[test]
    fn garbage_frames_are_skipped() {
        let matching = emitted_frame(b"fine", udp_to(addr(10, 0, 0, 5), 67), None);

        let mut link = TestLink::default();
        // Too short for even a minimal header.
        link.inbound.push_back(vec![0x45, 0x00, 0x00]);
        // Claims a header length below the minimum.
        link.inbound.push_back(vec![0x41; 40]);
        // Claims a header length past the end of the frame.
        link.inbound.push_back(vec![0x4f; 24]);
        link.inbound.push_back(matching);
        let mut conn = BroadcastUdpConn::new(link, Some(Endpoint::port(67)));

        let mut buffer = [0; 16];
        let (n, _) = conn.recv_from(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"fine");
    }

    #[test]
    fn transport_errors_terminate_the_loop() {
        let mut conn = BroadcastUdpConn::new(TestLink::default(), Some(Endpoint::port(67)));
        let mut buffer = [0; 16];
        match conn.recv_from(&mut buffer) {
            Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::WouldBlock),
            other => panic!("expected an io error, got {:?}", other.map(|(n, _)| n)),
        }
    }

    #[test]
    fn close_makes_reads_fail() {
        let mut conn = BroadcastUdpConn::new(TestLink::default(), Some(Endpoint::port(67)));
        conn.close().unwrap();
        let mut buffer = [0; 16];
        match conn.recv_from(&mut buffer) {
            Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::NotConnected),
            other => panic!("expected an io error, got {:?}", other.map(|(n, _)| n)),
        }
    }

    #[test]
    fn send_returns_payload_length() {
        let mut conn = BroadcastUdpConn::new(TestLink::default(), Some(Endpoint::port(68)));
        let n = conn.send_to(b"four", udp_to(addr(10, 0, 0, 5), 67)).unwrap();
        assert_eq!(n, 4);
        let link = conn.into_inner();
        // The frame on the wire is longer than the payload by both header sizes.
        assert_eq!(link.sent[0].0.len(), IPV4_MIN_HEADER_LEN + UDP_HEADER_LEN + 4);
    }

    #[test]
    fn local_addr_reports_binding() {
        let conn = BroadcastUdpConn::new(TestLink::default(), Some(Endpoint::port(68)));
        assert_eq!(conn.local_addr(), Addr::Udp(Endpoint::port(68)));

        let unbound = BroadcastUdpConn::new(TestLink::default(), None);
        assert_eq!(unbound.local_addr(), Addr::Udp(Endpoint::port(0)));
    }
}
