//! Fixed-capacity memory arenas: data space and the two cell stacks.
//!
//! The accessors here do no fault checking of their own. Callers run the
//! relevant [`checks`](crate::checks) first; if they skip them, a bad access
//! panics on a slice bound rather than touching memory outside the arena.

use forthkern_common::{Cell, CELL_SIZE};

/// Which stack a [`Stack`] is. Only used to pick the right fault kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Data,
    Return,
}

/// A fixed-capacity stack of cells with an explicit element count.
#[derive(Debug, Clone)]
pub struct Stack {
    cells: Box<[Cell]>,
    len: usize,
    kind: StackKind,
}

impl Stack {
    /// Create an empty stack holding at most `capacity` cells.
    pub fn new(kind: StackKind, capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity].into_boxed_slice(),
            len: 0,
            kind,
        }
    }

    /// Whether this is the data or the return stack.
    pub fn kind(&self) -> StackKind {
        self.kind
    }

    /// Number of cells currently on the stack.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no cells are on the stack.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Free slots left before overflow.
    pub fn room(&self) -> usize {
        self.cells.len() - self.len
    }

    /// The live cells, bottom first.
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells[..self.len]
    }

    /// Append a cell on top.
    #[inline]
    pub(crate) fn put(&mut self, value: Cell) {
        self.cells[self.len] = value;
        self.len += 1;
    }

    /// Remove and return the top cell.
    #[inline]
    pub(crate) fn take(&mut self) -> Cell {
        let top = self.len.wrapping_sub(1);
        let value = self.cells[top];
        self.len = top;
        value
    }

    /// Read the cell `n` slots below the top (0 is the top).
    #[inline]
    pub(crate) fn peek(&self, n: usize) -> Cell {
        self.cells[self.len.wrapping_sub(n + 1)]
    }

    /// Overwrite the cell `n` slots below the top.
    #[inline]
    pub(crate) fn poke(&mut self, n: usize, value: Cell) {
        self.cells[self.len.wrapping_sub(n + 1)] = value;
    }

    /// Move the cell `n` slots below the top to the top, shifting the
    /// cells above it down by one. `n == 0` leaves the stack unchanged.
    pub(crate) fn roll(&mut self, n: usize) {
        let from = self.len.wrapping_sub(n + 1);
        let value = self.cells[from];
        self.cells.copy_within(from + 1..self.len, from);
        self.cells[self.len - 1] = value;
    }

    /// Drop every cell and zero the backing store.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(0);
        self.len = 0;
    }
}

/// Byte-addressed data space with a HERE cursor that only moves forward.
#[derive(Debug, Clone)]
pub struct DataSpace {
    bytes: Box<[u8]>,
    here: usize,
}

impl DataSpace {
    /// Create a zeroed data space of `capacity` bytes with HERE at 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity].into_boxed_slice(),
            here: 0,
        }
    }

    /// Size of data space in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Address of the next free byte.
    pub fn here(&self) -> usize {
        self.here
    }

    /// Bytes left between HERE and the end of data space.
    pub fn unused(&self) -> usize {
        self.bytes.len().saturating_sub(self.here)
    }

    /// Advance HERE by `bytes`.
    #[inline]
    pub(crate) fn allot(&mut self, bytes: usize) {
        self.here += bytes;
    }

    #[inline]
    pub(crate) fn fetch_cell(&self, addr: usize) -> Cell {
        let mut raw = [0u8; CELL_SIZE];
        raw.copy_from_slice(&self.bytes[addr..addr + CELL_SIZE]);
        Cell::from_le_bytes(raw)
    }

    #[inline]
    pub(crate) fn store_cell(&mut self, addr: usize, value: Cell) {
        self.bytes[addr..addr + CELL_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub(crate) fn fetch_byte(&self, addr: usize) -> u8 {
        self.bytes[addr]
    }

    #[inline]
    pub(crate) fn store_byte(&mut self, addr: usize, value: u8) {
        self.bytes[addr] = value;
    }

    pub(crate) fn bytes(&self, addr: usize, len: usize) -> &[u8] {
        &self.bytes[addr..addr + len]
    }

    pub(crate) fn write_bytes(&mut self, addr: usize, src: &[u8]) {
        self.bytes[addr..addr + src.len()].copy_from_slice(src);
    }

    /// Zero every byte and move HERE back to address 0.
    pub(crate) fn clear(&mut self) {
        self.bytes.fill(0);
        self.here = 0;
    }
}
