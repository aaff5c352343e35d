//! Safety-check layer.
//!
//! Every primitive calls the checks its preconditions need before it mutates
//! anything. With the `unchecked` feature each check compiles down to
//! `Ok(())` and address translation becomes a plain cast.

use crate::arena::{DataSpace, Stack, StackKind};
use forthkern_common::{Cell, Fault, CELL_SIZE};

const ENABLED: bool = !cfg!(feature = "unchecked");

/// Require at least `needed` cells on `stack`.
#[inline]
pub fn require_depth(stack: &Stack, needed: usize) -> Result<(), Fault> {
    if ENABLED && stack.len() < needed {
        let depth = stack.len();
        return Err(match stack.kind() {
            StackKind::Data => Fault::DataStackUnderflow { needed, depth },
            StackKind::Return => Fault::ReturnStackUnderflow { needed, depth },
        });
    }
    Ok(())
}

/// Require room for `needed` more cells on `stack`.
#[inline]
pub fn require_room(stack: &Stack, needed: usize) -> Result<(), Fault> {
    if ENABLED && stack.room() < needed {
        let capacity = stack.capacity();
        return Err(match stack.kind() {
            StackKind::Data => Fault::DataStackOverflow { capacity },
            StackKind::Return => Fault::ReturnStackOverflow { capacity },
        });
    }
    Ok(())
}

/// Require `addr` to be a multiple of the cell width.
#[inline]
pub fn require_aligned(addr: Cell) -> Result<(), Fault> {
    if ENABLED && addr % CELL_SIZE as Cell != 0 {
        return Err(Fault::UnalignedAccess { addr });
    }
    Ok(())
}

/// Require HERE to lie inside data space, strictly below its end.
#[inline]
pub fn require_here(space: &DataSpace) -> Result<(), Fault> {
    if ENABLED && space.here() >= space.capacity() {
        return Err(Fault::InvalidHere {
            here: space.here(),
            capacity: space.capacity(),
        });
    }
    Ok(())
}

/// Require `bytes` of free data space past HERE.
///
/// The last byte of data space is never handed out, so HERE stays a valid
/// address after the allocation.
#[inline]
pub fn require_data_space(space: &DataSpace, bytes: Cell) -> Result<(), Fault> {
    require_here(space)?;
    let available = space.unused().saturating_sub(1);
    if ENABLED && bytes > available as Cell {
        return Err(Fault::DataSpaceOverflow {
            requested: bytes,
            available,
        });
    }
    Ok(())
}

/// Translate a cell address of `len` bytes into a data-space offset.
#[inline]
pub fn byte_range(space: &DataSpace, addr: Cell, len: usize) -> Result<usize, Fault> {
    if !ENABLED {
        return Ok(addr as usize);
    }
    let in_bounds = usize::try_from(addr)
        .ok()
        .and_then(|start| start.checked_add(len).map(|end| (start, end)))
        .filter(|&(_, end)| end <= space.capacity());
    match in_bounds {
        Some((start, _)) => Ok(start),
        None => Err(Fault::AddressOutOfBounds { addr, len }),
    }
}

/// Translate the address of a single byte.
#[inline]
pub fn byte_address(space: &DataSpace, addr: Cell) -> Result<usize, Fault> {
    byte_range(space, addr, 1)
}

/// Translate the address of a whole cell, which must be aligned.
#[inline]
pub fn cell_address(space: &DataSpace, addr: Cell) -> Result<usize, Fault> {
    require_aligned(addr)?;
    byte_range(space, addr, CELL_SIZE)
}
