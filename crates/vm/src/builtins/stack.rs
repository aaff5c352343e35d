//! Stack shuffling and return-stack transfer.

use crate::checks::{require_depth, require_room};
use crate::error::Halt;
use crate::machine::Vm;
use forthkern_common::{Cell, Fault};

impl Vm {
    pub(crate) fn exec_depth(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        let depth = self.data.len() as Cell;
        self.data.put(depth);
        Ok(())
    }

    pub(crate) fn exec_drop(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        self.data.take();
        Ok(())
    }

    pub(crate) fn exec_dup(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        require_room(&self.data, 1)?;
        self.data.put(self.data.peek(0));
        Ok(())
    }

    pub(crate) fn exec_over(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        require_room(&self.data, 1)?;
        self.data.put(self.data.peek(1));
        Ok(())
    }

    pub(crate) fn exec_swap(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        let top = self.data.peek(0);
        self.data.poke(0, self.data.peek(1));
        self.data.poke(1, top);
        Ok(())
    }

    pub(crate) fn exec_rot(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 3)?;
        self.data.roll(2);
        Ok(())
    }

    /// Index operand of PICK/ROLL, checked against the cells below it.
    fn stack_index(&self) -> Result<usize, Fault> {
        require_depth(&self.data, 1)?;
        let n = usize::try_from(self.data.peek(0)).unwrap_or(usize::MAX);
        require_depth(&self.data, n.saturating_add(2))?;
        Ok(n)
    }

    pub(crate) fn exec_pick(&mut self) -> Result<(), Halt> {
        let n = self.stack_index()?;
        self.data.take();
        self.data.put(self.data.peek(n));
        Ok(())
    }

    pub(crate) fn exec_roll(&mut self) -> Result<(), Halt> {
        let n = self.stack_index()?;
        self.data.take();
        self.data.roll(n);
        Ok(())
    }

    pub(crate) fn exec_question_dup(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let top = self.data.peek(0);
        if top != 0 {
            require_room(&self.data, 1)?;
            self.data.put(top);
        }
        Ok(())
    }

    pub(crate) fn exec_nip(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        let top = self.data.take();
        self.data.poke(0, top);
        Ok(())
    }

    pub(crate) fn exec_tuck(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        require_room(&self.data, 1)?;
        let top = self.data.peek(0);
        self.data.poke(0, self.data.peek(1));
        self.data.poke(1, top);
        self.data.put(top);
        Ok(())
    }

    pub(crate) fn exec_two_dup(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        require_room(&self.data, 2)?;
        let (x1, x2) = (self.data.peek(1), self.data.peek(0));
        self.data.put(x1);
        self.data.put(x2);
        Ok(())
    }

    pub(crate) fn exec_two_drop(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        self.data.take();
        self.data.take();
        Ok(())
    }

    pub(crate) fn exec_to_r(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        require_room(&self.ret, 1)?;
        self.ret.put(self.data.take());
        Ok(())
    }

    pub(crate) fn exec_r_from(&mut self) -> Result<(), Halt> {
        require_depth(&self.ret, 1)?;
        require_room(&self.data, 1)?;
        self.data.put(self.ret.take());
        Ok(())
    }

    pub(crate) fn exec_r_fetch(&mut self) -> Result<(), Halt> {
        require_depth(&self.ret, 1)?;
        require_room(&self.data, 1)?;
        self.data.put(self.ret.peek(0));
        Ok(())
    }
}
