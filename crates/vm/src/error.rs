//! Ways a VM operation can stop.
//!
//! A [`Fault`] raised anywhere inside the kernel unwinds, through `?`, to
//! whichever host called into the VM. The host decides whether to abort the
//! session or reset and continue.

use forthkern_common::{ConfigError, Fault};
use thiserror::Error;

/// Why control came back to the host before an operation finished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Halt {
    /// BYE asked for the session to end successfully.
    #[error("bye")]
    Bye,

    /// A checked fault. The session should end with a failure outcome
    /// unless the host recovers by resetting.
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl Halt {
    /// Returns the fault, if this halt is one.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Halt::Bye => None,
            Halt::Fault(fault) => Some(fault),
        }
    }
}

/// Errors from creating a VM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootError {
    /// The capacities cannot describe a working VM.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The initial reset faulted (for example, the arguments do not fit in
    /// data space or the dictionary cannot hold the primitive set).
    #[error("reset failed: {0}")]
    Reset(#[from] Fault),
}
