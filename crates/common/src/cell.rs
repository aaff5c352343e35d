//! Cell representation and address arithmetic.
//!
//! A cell is the unit of both stacks and the granularity of `!` / `@`.
//! It is fixed at 64 bits so that data space looks the same on every host.

/// Unsigned view of a cell. Also used for addresses and execution tokens.
pub type Cell = u64;

/// Signed view of a cell.
pub type SignedCell = i64;

/// Width of a cell in bytes.
pub const CELL_SIZE: usize = core::mem::size_of::<Cell>();

/// Boolean true: all bits set.
pub const TRUE: Cell = Cell::MAX;

/// Boolean false: all bits clear.
pub const FALSE: Cell = 0;

/// Convert a native boolean into a cell flag.
#[inline]
pub fn flag(value: bool) -> Cell {
    if value {
        TRUE
    } else {
        FALSE
    }
}

/// Reinterpret a cell as signed.
#[inline]
pub fn signed(cell: Cell) -> SignedCell {
    cell as SignedCell
}

/// Reinterpret a signed value as a cell.
#[inline]
pub fn unsigned(value: SignedCell) -> Cell {
    value as Cell
}

/// Returns true if `addr` is a multiple of [`CELL_SIZE`].
#[inline]
pub fn is_aligned(addr: usize) -> bool {
    addr % CELL_SIZE == 0
}

/// Round `addr` up to the next cell boundary.
///
/// An address that is already aligned is returned unchanged. Returns `None`
/// if rounding up would overflow `usize`.
#[inline]
pub fn aligned(addr: usize) -> Option<usize> {
    match addr % CELL_SIZE {
        0 => Some(addr),
        rem => addr.checked_add(CELL_SIZE - rem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_all_or_nothing() {
        assert_eq!(flag(true), TRUE);
        assert_eq!(flag(false), FALSE);
        assert_eq!(signed(TRUE), -1);
    }

    #[test]
    fn aligned_leaves_boundaries_alone() {
        assert_eq!(aligned(0), Some(0));
        assert_eq!(aligned(8), Some(8));
        assert_eq!(aligned(64), Some(64));
    }

    #[test]
    fn aligned_rounds_up() {
        assert_eq!(aligned(1), Some(8));
        assert_eq!(aligned(7), Some(8));
        assert_eq!(aligned(9), Some(16));
    }

    #[test]
    fn aligned_overflow_is_none() {
        assert_eq!(aligned(usize::MAX), None);
    }

    #[test]
    fn signed_roundtrip_of_negative() {
        assert_eq!(unsigned(-5), Cell::MAX - 4);
        assert_eq!(signed(unsigned(-5)), -5);
    }
}
