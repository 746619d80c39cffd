// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use core::mem;
use std::net::UdpSocket;
use std::os::unix::io::FromRawFd;

use libc;
use super::{Errno, FdResult, LibcResult};

/// Open a kernel UDP socket bound to both the named interface and the port.
///
/// This is the non-raw sibling of the packet socket: once the interface has an address, ordinary
/// kernel UDP delivery works and no manual header handling is needed. The socket allows
/// broadcasting, and the address is marked reusable to aid debugging. It shares no code with the
/// header codec.
pub fn udp_socket(name: &str, port: u16) -> Result<UdpSocket, Errno> {
    let fd = unsafe {
        libc::socket(
            libc::AF_INET,
            libc::SOCK_DGRAM | libc::SOCK_CLOEXEC,
            libc::IPPROTO_UDP)
    };

    FdResult(fd).errno()?;

    // From here on the fd must not leak past an error return.
    configure(fd, name, port).map_err(|err| {
        unsafe { libc::close(fd) };
        err
    })?;

    Ok(unsafe { UdpSocket::from_raw_fd(fd) })
}

fn configure(fd: libc::c_int, name: &str, port: u16) -> Result<(), Errno> {
    setsockopt_int(fd, libc::SOL_SOCKET, libc::SO_BROADCAST, 1)?;
    setsockopt_int(fd, libc::SOL_SOCKET, libc::SO_REUSEADDR, 1)?;
    bind_to_device(fd, name)?;
    bind_port(fd, port)
}

fn setsockopt_int(
    fd: libc::c_int,
    level: libc::c_int,
    option: libc::c_int,
    value: libc::c_int,
) -> Result<(), Errno> {
    let res = unsafe {
        libc::setsockopt(
            fd,
            level,
            option,
            &value as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t)
    };

    FdResult(res).errno()
}

fn bind_to_device(fd: libc::c_int, name: &str) -> Result<(), Errno> {
    let res = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_BINDTODEVICE,
            name.as_ptr() as *const libc::c_void,
            name.len() as libc::socklen_t)
    };

    FdResult(res).errno()
}

fn bind_port(fd: libc::c_int, port: u16) -> Result<(), Errno> {
    let sockaddr = libc::sockaddr_in {
        sin_family: libc::AF_INET as libc::sa_family_t,
        sin_port:   port.to_be(),
        sin_addr:   libc::in_addr { s_addr: libc::INADDR_ANY },
        sin_zero:   [0; 8],
    };

    let res = unsafe {
        libc::bind(
            fd,
            &sockaddr as *const libc::sockaddr_in as *const libc::sockaddr,
            mem::size_of::<libc::sockaddr_in>() as u32)
    };

    FdResult(res).errno()
}
