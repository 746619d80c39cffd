// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use core::mem;
use std::os::unix::io::{RawFd, AsRawFd};

use libc;
use super::{ifreq, Errno, FdResult, IoLenResult, LibcResult};
use super::linux::IfIndex;

use crate::wire::{EthernetAddress, EthernetProtocol};

/// A packet socket bound to a network interface and an Ethernet protocol.
///
/// The socket is opened in datagram mode: the kernel strips the link-level header from received
/// frames and fabricates it on send from the address passed to [`send_to`]. Received and sent
/// buffers therefore begin directly at the network-layer header.
///
/// Reads and writes block; a blocked read can be unblocked from another thread by [`close`].
///
/// [`send_to`]: #method.send_to
/// [`close`]: #method.close
#[derive(Debug)]
pub struct PacketSocketDesc {
    lower: libc::c_int,
    ifreq: ifreq,
    protocol: EthernetProtocol,
    ifindex: libc::c_int,
}

impl AsRawFd for PacketSocketDesc {
    fn as_raw_fd(&self) -> RawFd {
        self.lower
    }
}

impl PacketSocketDesc {
    /// Open a packet socket and bind it to the named interface.
    ///
    /// Only frames carrying `protocol` in their Ethernet type field are delivered to the socket.
    pub fn open(name: &str, protocol: EthernetProtocol) -> Result<PacketSocketDesc, Errno> {
        let mut desc = Self::new(name, protocol)?;
        desc.bind_interface()?;
        Ok(desc)
    }

    /// Try to open a socket for the named interface.
    ///
    /// Note that this does *not* yet bind the interface to the socket, it only creates the
    /// necessary structures involved in doing so. Call [`bind_interface`] afterwards.
    ///
    /// [`bind_interface`]: #method.bind_interface
    pub fn new(name: &str, protocol: EthernetProtocol) -> Result<PacketSocketDesc, Errno> {
        let proto = u16::from(protocol);
        let lower = unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_DGRAM,
                proto.to_be() as libc::c_int)
        };

        FdResult(lower).errno()?;

        Ok(PacketSocketDesc {
            lower,
            ifreq: ifreq::new(name),
            protocol,
            ifindex: 0,
        })
    }

    /// Bind the socket to the named interface.
    ///
    /// Resolves the interface index, which later addresses outgoing frames.
    pub fn bind_interface(&mut self) -> Result<(), Errno> {
        self.ifindex = self.ifreq.get_if_index(self.lower)?;

        let sockaddr = self.sockaddr_ll(EthernetAddress::default());

        let res = unsafe {
            libc::bind(
                self.lower,
                &sockaddr as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as u32)
        };

        FdResult(res).errno()
    }

    /// Receive a single frame into the buffer, blocking until one arrives.
    ///
    /// A frame longer than the buffer is truncated to the buffer's length.
    pub fn recv(&mut self, buffer: &mut [u8]) -> Result<usize, Errno> {
        let len = unsafe {
            libc::recv(
                self.lower,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
                0)
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Send a single frame from a buffer to the given hardware address.
    pub fn send_to(&mut self, buffer: &[u8], addr: EthernetAddress) -> Result<usize, Errno> {
        let sockaddr = self.sockaddr_ll(addr);

        let len = unsafe {
            libc::sendto(
                self.lower,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len(),
                0,
                &sockaddr as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as u32)
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Close the socket.
    ///
    /// Reads blocked on the socket return an error once it is closed. Subsequent operations fail
    /// with `EBADF`.
    pub fn close(&mut self) -> Result<(), Errno> {
        if self.lower == -1 {
            return Ok(());
        }

        let res = unsafe { libc::close(self.lower) };
        self.lower = -1;
        FdResult(res).errno()
    }

    fn sockaddr_ll(&self, addr: EthernetAddress) -> libc::sockaddr_ll {
        let mut sll_addr = [0; 8];
        sll_addr[..6].copy_from_slice(addr.as_bytes());

        libc::sockaddr_ll {
            sll_family:   libc::AF_PACKET as u16,
            sll_protocol: u16::from(self.protocol).to_be(),
            sll_ifindex:  self.ifindex,
            sll_hatype:   1,
            sll_pkttype:  0,
            sll_halen:    6,
            sll_addr,
        }
    }
}

impl Drop for PacketSocketDesc {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
