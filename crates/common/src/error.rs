//! Fault kinds raised by the forthkern VM.

use crate::cell::Cell;
use thiserror::Error;

/// A checked, synchronous fault.
///
/// Every check runs before the operation that raised it mutates anything,
/// so an operation that faults leaves the VM as it found it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// An operation needed more data-stack cells than are present.
    #[error("data stack underflow: need {needed}, have {depth}")]
    DataStackUnderflow { needed: usize, depth: usize },

    /// An operation needed more return-stack cells than are present.
    #[error("return stack underflow: need {needed}, have {depth}")]
    ReturnStackUnderflow { needed: usize, depth: usize },

    /// A push would exceed the data stack's capacity.
    #[error("data stack overflow (capacity {capacity})")]
    DataStackOverflow { capacity: usize },

    /// A push would exceed the return stack's capacity.
    #[error("return stack overflow (capacity {capacity})")]
    ReturnStackOverflow { capacity: usize },

    /// Not enough data space left for an allocation.
    #[error("data space overflow: requested {requested} bytes, {available} available")]
    DataSpaceOverflow { requested: Cell, available: usize },

    /// The HERE cursor lies outside data space.
    #[error("invalid HERE {here} (data space is {capacity} bytes)")]
    InvalidHere { here: usize, capacity: usize },

    /// Cell access at an address that is not a multiple of the cell width.
    #[error("unaligned cell access at address {addr:#x}")]
    UnalignedAccess { addr: Cell },

    /// Access to bytes outside data space.
    #[error("address {addr:#x} (+{len}) is outside data space")]
    AddressOutOfBounds { addr: Cell, len: usize },

    /// `/`, `/MOD` or `MOD` with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// An index into a fixed table (such as the argument vector) is out of range.
    #[error("index {index} out of range (count {count})")]
    UnknownIndex { index: Cell, count: usize },

    /// The inner interpreter was stepped with no instruction to fetch.
    #[error("no instructions to process")]
    NoInstructions,

    /// A cell was invoked as an execution token but names no definition.
    #[error("invalid execution token {xt}")]
    InvalidExecutionToken { xt: Cell },

    /// The dictionary has no room for another definition.
    #[error("dictionary full (capacity {capacity})")]
    DictionaryFull { capacity: usize },

    /// A definition name cannot be length-prefixed in one byte.
    #[error("name of {len} bytes exceeds 255")]
    NameTooLong { len: usize },

    /// The input or output channel failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Fault {
    fn from(err: std::io::Error) -> Self {
        Fault::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_underflow() {
        assert_eq!(
            Fault::DataStackUnderflow {
                needed: 2,
                depth: 1
            }
            .to_string(),
            "data stack underflow: need 2, have 1"
        );
    }

    #[test]
    fn display_no_instructions() {
        assert_eq!(
            Fault::NoInstructions.to_string(),
            "no instructions to process"
        );
    }

    #[test]
    fn display_unaligned() {
        assert_eq!(
            Fault::UnalignedAccess { addr: 0x13 }.to_string(),
            "unaligned cell access at address 0x13"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert_eq!(Fault::from(err), Fault::Io("pipe closed".to_string()));
    }
}
