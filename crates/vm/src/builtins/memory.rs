//! Data-space access and the HERE cursor.

use crate::checks::{self, require_depth, require_room};
use crate::error::Halt;
use crate::machine::Vm;
use forthkern_common::{Cell, CELL_SIZE};

impl Vm {
    /// `!` ( x a-addr -- )
    pub(crate) fn exec_store(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        let addr = checks::cell_address(&self.space, self.data.peek(0))?;
        let value = self.data.peek(1);
        self.data.take();
        self.data.take();
        self.space.store_cell(addr, value);
        Ok(())
    }

    /// `@` ( a-addr -- x )
    pub(crate) fn exec_fetch(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let addr = checks::cell_address(&self.space, self.data.peek(0))?;
        self.data.poke(0, self.space.fetch_cell(addr));
        Ok(())
    }

    /// `C!` ( c c-addr -- ), storing the low byte of c.
    pub(crate) fn exec_c_store(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        let addr = checks::byte_address(&self.space, self.data.peek(0))?;
        let value = self.data.peek(1) as u8;
        self.data.take();
        self.data.take();
        self.space.store_byte(addr, value);
        Ok(())
    }

    /// `C@` ( c-addr -- c )
    pub(crate) fn exec_c_fetch(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let addr = checks::byte_address(&self.space, self.data.peek(0))?;
        self.data.poke(0, Cell::from(self.space.fetch_byte(addr)));
        Ok(())
    }

    pub(crate) fn exec_here(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        self.data.put(self.space.here() as Cell);
        Ok(())
    }

    pub(crate) fn exec_unused(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        self.data.put(self.space.unused() as Cell);
        Ok(())
    }

    /// `ALLOT` ( u -- ): reserve u bytes at HERE. HERE never moves back.
    pub(crate) fn exec_allot(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let bytes = self.data.peek(0);
        checks::require_data_space(&self.space, bytes)?;
        self.data.take();
        self.space.allot(bytes as usize);
        Ok(())
    }

    pub(crate) fn exec_align(&mut self) -> Result<(), Halt> {
        let pad = self.alignment_padding()?;
        checks::require_data_space(&self.space, pad as Cell)?;
        self.space.allot(pad);
        Ok(())
    }

    /// `ALIGNED` ( addr -- a-addr ), wrapping at the top of the cell range.
    pub(crate) fn exec_aligned(&mut self) -> Result<(), Halt> {
        const MASK: Cell = CELL_SIZE as Cell - 1;
        self.exec_unary(|addr| addr.wrapping_add(MASK) & !MASK)
    }

    /// `,` ( x -- ): append a cell at the aligned HERE.
    pub(crate) fn exec_comma(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        checks::require_aligned(self.space.here() as Cell)?;
        checks::require_data_space(&self.space, CELL_SIZE as Cell)?;
        let here = self.space.here();
        self.space.store_cell(here, self.data.take());
        self.space.allot(CELL_SIZE);
        Ok(())
    }

    /// `C,` ( c -- ): append one byte at HERE.
    pub(crate) fn exec_c_comma(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        checks::require_data_space(&self.space, 1)?;
        let here = self.space.here();
        self.space.store_byte(here, self.data.take() as u8);
        self.space.allot(1);
        Ok(())
    }
}
