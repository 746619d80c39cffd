// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use core::fmt;
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};
use super::ip::checksum;
use super::ipv4::{Address as Ipv4Address, Protocol};

/// Length of a UDP header, which has no options.
pub const HEADER_LEN: usize = 8;

byte_wrapper! {
    /// A byte sequence representing a UDP packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct udp([u8]);
}

mod field {
    use crate::wire::field::*;

    pub(crate) const SRC_PORT: Field = 0..2;
    pub(crate) const DST_PORT: Field = 2..4;
    pub(crate) const LENGTH:   Field = 4..6;
    pub(crate) const CHECKSUM: Field = 6..8;
    pub(crate) const PAYLOAD:  Rest  = 8..;
}

/// Describes how to handle the UDP checksum.
///
/// The UDP checksum incorporates a pseudo header with the addresses of the enclosing IPv4 packet,
/// so computing or verifying it requires information not present in the UDP packet itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checksum {
    /// Compute or verify the checksum with the given pseudo header addresses.
    Manual {
        /// Source address of the enclosing IPv4 packet.
        src_addr: Ipv4Address,
        /// Destination address of the enclosing IPv4 packet.
        dst_addr: Ipv4Address,
    },

    /// Elide checksum calculation and verification.
    Ignored,
}

impl udp {
    /// Imbue a raw octet buffer with UDP packet structure.
    pub fn new_unchecked(buffer: &[u8]) -> &udp {
        Self::__from_macro_new_unchecked(buffer)
    }

    /// Imbue a mutable octet buffer with UDP packet structure.
    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut udp {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(data: &[u8]) -> Result<&udp> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// View the packet as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error::Truncated)` if the buffer is too short.
    /// Returns `Err(Error::Malformed)` if the length field claims less
    /// than a bare header.
    ///
    /// The result of this check is invalidated by calling [set_length].
    ///
    /// [set_length]: #method.set_length
    pub fn check_len(&self) -> Result<()> {
        let buffer_len = self.0.len();
        if buffer_len < HEADER_LEN {
            Err(Error::Truncated)
        } else {
            let field_len = self.length() as usize;
            if field_len < HEADER_LEN {
                Err(Error::Malformed)
            } else if buffer_len < field_len {
                Err(Error::Truncated)
            } else {
                Ok(())
            }
        }
    }

    /// Return the source port field.
    #[inline]
    pub fn src_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::SRC_PORT])
    }

    /// Return the destination port field.
    #[inline]
    pub fn dst_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::DST_PORT])
    }

    /// Return the length field, counting the header and the payload.
    #[inline]
    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::LENGTH])
    }

    /// Return the checksum field.
    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::CHECKSUM])
    }

    /// Validate the packet checksum.
    ///
    /// A checksum field of zero means the sender elided the checksum, which IPv4 permits; such
    /// packets always validate.
    pub fn verify_checksum(&self, checksum: Checksum) -> bool {
        let (src_addr, dst_addr) = match checksum {
            Checksum::Manual { src_addr, dst_addr } => (src_addr, dst_addr),
            Checksum::Ignored => return true,
        };

        if self.checksum() == 0 {
            return true;
        }

        let length = self.length();
        checksum::combine(&[
            checksum::pseudo_header(&src_addr, &dst_addr, Protocol::Udp, length.into()),
            checksum::data(&self.0[..length as usize]),
        ]) == !0
    }

    /// Set the source port field.
    #[inline]
    pub fn set_src_port(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::SRC_PORT], value)
    }

    /// Set the destination port field.
    #[inline]
    pub fn set_dst_port(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::DST_PORT], value)
    }

    /// Set the length field.
    #[inline]
    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::LENGTH], value)
    }

    /// Set the checksum field.
    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::CHECKSUM], value)
    }

    /// Compute and fill in the checksum.
    ///
    /// The checksum covers the pseudo header, the UDP header with the checksum field zeroed, and
    /// as many payload bytes as the length field claims. The payload must therefore already be in
    /// place. Does nothing when `checksum` is [`Ignored`].
    ///
    /// [`Ignored`]: enum.Checksum.html#variant.Ignored
    pub fn fill_checksum(&mut self, checksum: Checksum) {
        if let Checksum::Manual { src_addr, dst_addr } = checksum {
            self.set_checksum(0);
            let length = self.length();
            let value = !checksum::combine(&[
                checksum::pseudo_header(&src_addr, &dst_addr, Protocol::Udp, length.into()),
                checksum::data(&self.0[..length as usize]),
            ]);
            // A transmitted checksum of zero would read as "elided"; fold it to all ones.
            self.set_checksum(if value == 0 { 0xffff } else { value });
        }
    }

    /// Return the payload as a byte slice, as delimited by the length field.
    pub fn payload_slice(&self) -> &[u8] {
        let length = self.length() as usize;
        &self.0[field::PAYLOAD.start..length]
    }

    /// Return the payload as a mutable byte slice, as delimited by the length field.
    pub fn payload_mut_slice(&mut self) -> &mut [u8] {
        let length = self.length() as usize;
        &mut self.0[field::PAYLOAD.start..length]
    }
}

impl AsRef<[u8]> for udp {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for udp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

/// A high-level representation of a UDP header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    /// The source port.
    pub src_port: u16,
    /// The destination port.
    pub dst_port: u16,
}

impl Repr {
    /// Parse a UDP packet and return a high-level representation.
    pub fn parse(packet: &udp, checksum: Checksum) -> Result<Repr> {
        packet.check_len()?;
        // Destination port cannot be omitted (but source port can be).
        if packet.dst_port() == 0 { return Err(Error::Malformed) }
        if !packet.verify_checksum(checksum) { return Err(Error::WrongChecksum) }

        Ok(Repr {
            src_port: packet.src_port(),
            dst_port: packet.dst_port(),
        })
    }

    /// Return the length of a packet that will be emitted from this high-level representation.
    pub fn buffer_len(&self, payload_len: usize) -> usize {
        HEADER_LEN + payload_len
    }

    /// Emit a high-level representation into a UDP packet header.
    ///
    /// The checksum field is zeroed. Call [`fill_checksum`] after the payload bytes are in place
    /// to finalize the packet.
    ///
    /// [`fill_checksum`]: struct.udp.html#method.fill_checksum
    pub fn emit(&self, packet: &mut udp, payload_len: usize) {
        packet.set_src_port(self.src_port);
        packet.set_dst_port(self.dst_port);
        packet.set_length((HEADER_LEN + payload_len) as u16);
        packet.set_checksum(0);
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UDP src={} dst={}", self.src_port, self.dst_port)
    }
}
