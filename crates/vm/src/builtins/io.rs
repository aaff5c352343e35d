//! Console output and the line-oriented input buffer.

use crate::checks::{self, require_depth, require_room};
use crate::error::Halt;
use crate::machine::{Vm, INPUT_BUFFER_ADDR, TO_IN_ADDR};
use forthkern_common::{Cell, Fault, FALSE, TRUE};
use std::io::{BufRead, Write};
use tracing::warn;

impl Vm {
    /// `EMIT` ( c -- ), writing the low byte of c.
    pub(crate) fn exec_emit(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let byte = self.data.peek(0) as u8;
        self.console.output.write_all(&[byte]).map_err(Fault::from)?;
        self.data.take();
        Ok(())
    }

    /// `TYPE` ( c-addr u -- )
    pub(crate) fn exec_type(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        let len = usize::try_from(self.data.peek(0)).unwrap_or(usize::MAX);
        let addr = checks::byte_range(&self.space, self.data.peek(1), len)?;
        self.console
            .output
            .write_all(self.space.bytes(addr, len))
            .map_err(Fault::from)?;
        self.data.take();
        self.data.take();
        Ok(())
    }

    pub(crate) fn exec_cr(&mut self) -> Result<(), Halt> {
        self.console.output.write_all(b"\n").map_err(Fault::from)?;
        Ok(())
    }

    pub(crate) fn exec_to_in(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        self.data.put(TO_IN_ADDR as Cell);
        Ok(())
    }

    /// `SOURCE` ( -- c-addr u )
    pub(crate) fn exec_source(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 2)?;
        self.data.put(INPUT_BUFFER_ADDR as Cell);
        self.data.put(self.source_len as Cell);
        Ok(())
    }

    /// `REFILL` ( -- flag ): read the next line into the input buffer.
    ///
    /// At end of input the flag is FALSE and the current line and `>IN`
    /// are left as they were. Pending output is flushed first so prompts
    /// appear before the read blocks.
    pub(crate) fn exec_refill(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        self.console.output.flush().map_err(Fault::from)?;

        let mut line = Vec::new();
        let read = self
            .console
            .input
            .read_until(b'\n', &mut line)
            .map_err(Fault::from)?;
        if read == 0 {
            self.data.put(FALSE);
            return Ok(());
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        let capacity = self.config.input_buffer;
        if line.len() > capacity {
            warn!(len = line.len(), capacity, "input line truncated");
            line.truncate(capacity);
        }

        self.space.write_bytes(INPUT_BUFFER_ADDR, &line);
        self.source_len = line.len();
        self.space.store_cell(TO_IN_ADDR, 0);
        self.data.put(TRUE);
        Ok(())
    }
}
