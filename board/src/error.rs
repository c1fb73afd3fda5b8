use crate::lines::{LineSink, LineSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Unmapped access at {addr:#08x}")]
    UnmappedAccess { addr: u32 },

    #[error("Malformed ROM image ({len} bytes): {reason}")]
    MalformedRomImage { len: usize, reason: &'static str },

    #[error("Invalid wire configuration: {0}")]
    InvalidWireConfiguration(#[from] WireError),
}

// Why a wiring or address table was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("{sink:?} driven by both {first:?} and {second:?}")]
    MultipleDrivers {
        sink: LineSink,
        first: LineSource,
        second: LineSource,
    },

    #[error("Interrupt level {0} has no source")]
    MissingIrqSource(u8),

    #[error("Window {0} overlaps {1}")]
    Overlap(&'static str, &'static str),

    #[error("Window {0} extends past the address space")]
    OutOfRange(&'static str),

    #[error("Window {0} has an inconsistent mirror period")]
    BadMirror(&'static str),

    #[error("Window {0} is empty")]
    EmptyWindow(&'static str),
}
