#![allow(unsafe_code)]
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `linux.rs`
// * `mod.rs`
// * `packet_socket.rs`
// * `udp_socket.rs`

//! OS plumbing for the raw and kernel socket transports.
//!
//! Everything here is a thin wrapper over `libc` calls. Failures are captured as [`Errno`] values
//! which convert into `std::io::Error` for the conn layer. No protocol logic lives in this
//! module.
//!
//! [`Errno`]: struct.Errno.html

use core::mem;
use std::{io, ptr};
use std::os::unix::io::RawFd;
use std::time::Duration;

use libc;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
mod packet_socket;
#[cfg(target_os = "linux")]
mod udp_socket;

#[cfg(target_os = "linux")]
pub use self::packet_socket::PacketSocketDesc;
#[cfg(target_os = "linux")]
pub use self::udp_socket::udp_socket;

/// Wait until the given file descriptor becomes readable, but no longer than the given timeout.
///
/// The conn layer itself never imposes a timeout on reads; callers that cannot afford to block
/// indefinitely under unrelated traffic can poll with this before reading.
pub fn wait(fd: RawFd, duration: Option<Duration>) -> Result<(), Errno> {
    let mut readfds;

    unsafe {
        let mut readfds_init = mem::MaybeUninit::<libc::fd_set>::uninit();
        libc::FD_ZERO(readfds_init.as_mut_ptr());
        libc::FD_SET(fd, readfds_init.as_mut_ptr());
        readfds = readfds_init.assume_init();
    }

    let mut timeout = libc::timeval { tv_sec: 0, tv_usec: 0 };
    let timeout = duration.map(|duration| {
        timeout.tv_sec = duration.as_secs() as libc::time_t;
        timeout.tv_usec = duration.subsec_micros() as libc::suseconds_t;
        &mut timeout
    });

    let timeout_ptr = timeout
        .map(|reference| reference as *mut _)
        .unwrap_or_else(ptr::null_mut);

    let res = unsafe {
        libc::select(
            fd + 1,
            &mut readfds,
            ptr::null_mut(),
            ptr::null_mut(),
            timeout_ptr)
    };

    FdResult(res).errno()
}

/// An errno value.
///
/// This is used as the error representation of raw libc calls. It can be converted into a
/// `std::io::Error`, where it will consequently have much more extensive error information.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Errno(pub libc::c_int);

#[derive(Clone, Copy)]
struct FdResult(pub libc::c_int);

#[derive(Clone, Copy)]
struct IoLenResult(pub libc::ssize_t);

type IoctlResult = FdResult;
#[allow(non_snake_case)] // Emulate type alias also importing constructor.
fn IoctlResult(val: libc::c_int) -> IoctlResult { FdResult(val) }

/// Base for an if ioctl request.
///
/// Contains the name of the interface.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
struct ifreq {
    ifr_name: [libc::c_char; libc::IF_NAMESIZE],
}

/// Trait for interpreting integer return values.
///
/// Failure signals may vary between:
/// * `-1`
/// * arbitrary negative values
/// * non-zero
trait LibcResult: Copy {
    fn is_fail(self) -> bool;

    fn errno(self) -> Result<(), Errno> {
        if self.is_fail() {
            Err(Errno::new())
        } else {
            Ok(())
        }
    }
}

impl Errno {
    /// Capture the calling thread's current errno value.
    pub fn new() -> Errno {
        Errno(unsafe { *libc::__errno_location() })
    }
}

impl Default for Errno {
    fn default() -> Errno {
        Errno::new()
    }
}

impl LibcResult for FdResult {
    fn is_fail(self) -> bool {
        self.0 == -1
    }
}

impl LibcResult for IoLenResult {
    fn is_fail(self) -> bool {
        self.0 == -1
    }
}

impl From<Errno> for io::Error {
    fn from(err: Errno) -> io::Error {
        io::Error::from_raw_os_error(err.0 as i32)
    }
}

impl ifreq {
    fn new(name: &str) -> Self {
        let mut ifr_name = [0; libc::IF_NAMESIZE];

        // Names longer than the OS limit could not name an interface anyway; the bind will fail
        // with the truncated name instead of us panicking here.
        for (i, byte) in name.as_bytes().iter().take(libc::IF_NAMESIZE - 1).enumerate() {
            ifr_name[i] = *byte as libc::c_char
        }

        ifreq {
            ifr_name,
        }
    }
}
