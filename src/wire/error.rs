// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use core::fmt;

/// The error type for packet parsing and emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A buffer is too short to contain the claimed structure.
    Truncated,
    /// A structure is well-formed but uses features this crate does not handle.
    Unsupported,
    /// A structure violates an invariant of its format.
    Malformed,
    /// A checksum field does not validate against the packet contents.
    WrongChecksum,
}

/// The result type for packet parsing and emission.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Error::Truncated => "truncated packet",
            Error::Unsupported => "unsupported option",
            Error::Malformed => "malformed packet",
            Error::WrongChecksum => "checksum error",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
