//! Inner interpreter and primitive dispatch.
//!
//! Threaded code is a run of cells in data space, each an execution token,
//! some followed by an inline operand. Calls push the caller's instruction
//! cursor on the return stack; `EXIT` pops it back. No native recursion is
//! involved, so nesting depth is bounded only by the return stack.

use crate::checks;
use crate::dictionary::{Action, Xt};
use crate::error::Halt;
use crate::machine::Vm;
use forthkern_common::cell::{flag, signed};
use forthkern_common::{Cell, Fault, Primitive, CELL_SIZE};
use tracing::{debug, trace};

/// Return-stack encoding of "no instruction": the cursor a host-level
/// [`Vm::execute`] starts from. Never a valid data-space address.
pub const NO_INSTRUCTION: Cell = Cell::MAX;

/// Shift count for `LSHIFT`/`RSHIFT`; counts of a cell width or more
/// shift everything out.
fn shift(u: Cell) -> u32 {
    u32::try_from(u).unwrap_or(u32::MAX)
}

pub(crate) fn encode_ip(ip: Option<usize>) -> Cell {
    ip.map_or(NO_INSTRUCTION, |addr| addr as Cell)
}

pub(crate) fn decode_ip(cell: Cell) -> Option<usize> {
    if cell == NO_INSTRUCTION {
        None
    } else {
        usize::try_from(cell).ok()
    }
}

impl Vm {
    /// Invoke a definition from the host and run it to completion.
    ///
    /// A primitive or host word runs once. A nested definition is called
    /// and the inner interpreter steps until the instruction cursor is back
    /// at its value at entry, which only the call's final `EXIT` restores.
    /// Return-stack depth plays no part, so a body that drops its own frame
    /// keeps running and faults at that `EXIT`. The same holds when the
    /// token is `EXECUTE` applied to a nested definition.
    pub fn execute(&mut self, xt: Xt) -> Result<(), Halt> {
        let result = self.execute_inner(xt);
        if let Err(Halt::Fault(fault)) = &result {
            debug!(
                xt,
                current = ?self.current.and_then(|c| self.dict.get(c)).map(|d| d.name.as_str()),
                %fault,
                "execution faulted"
            );
        }
        result
    }

    fn execute_inner(&mut self, xt: Xt) -> Result<(), Halt> {
        let (xt, action) = self.resolve(xt as Cell)?;
        let base = self.ret.len();
        let entry = self.next;
        self.invoke(xt, action)?;
        let nested = self.ret.len() > base && self.next != entry;
        if nested {
            while self.next != entry {
                self.step()?;
            }
        }
        Ok(())
    }

    /// Run the inner interpreter until something stops it.
    ///
    /// There is no normal way out: the loop ends with `NoInstructions` once
    /// the cursor is unset, with [`Halt::Bye`], or with another fault.
    pub fn run(&mut self) -> Halt {
        loop {
            if let Err(halt) = self.step() {
                return halt;
            }
        }
    }

    /// Fetch the token at the instruction cursor, advance the cursor by one
    /// cell and invoke the token.
    pub fn step(&mut self) -> Result<(), Halt> {
        let ip = self.next.ok_or(Fault::NoInstructions)?;
        let addr = checks::cell_address(&self.space, ip as Cell)?;
        let (xt, action) = self.resolve(self.space.fetch_cell(addr))?;
        self.next = Some(ip + CELL_SIZE);
        trace!(ip, xt, name = %self.dict.get(xt).map_or("", |d| d.name.as_str()), "step");
        self.invoke(xt, action)
    }

    /// Map a cell to the definition it names.
    pub(crate) fn resolve(&self, xt: Cell) -> Result<(Xt, Action), Fault> {
        usize::try_from(xt)
            .ok()
            .and_then(|index| self.dict.get(index).map(|def| (index, def.action)))
            .ok_or(Fault::InvalidExecutionToken { xt })
    }

    pub(crate) fn invoke(&mut self, xt: Xt, action: Action) -> Result<(), Halt> {
        self.current = Some(xt);
        match action {
            Action::Primitive(primitive) => self.dispatch(primitive),
            Action::Host(func) => func(self),
            Action::Nested => self.nest(xt),
        }
    }

    /// Nested call: save the cursor on the return stack and jump to the body.
    fn nest(&mut self, xt: Xt) -> Result<(), Halt> {
        checks::require_room(&self.ret, 1)?;
        let body = self
            .dict
            .get(xt)
            .map(|def| def.body)
            .ok_or(Fault::InvalidExecutionToken { xt: xt as Cell })?;
        self.ret.put(encode_ip(self.next));
        self.next = Some(body);
        Ok(())
    }

    fn dispatch(&mut self, primitive: Primitive) -> Result<(), Halt> {
        match primitive {
            // Stack
            Primitive::Depth => self.exec_depth(),
            Primitive::Drop => self.exec_drop(),
            Primitive::Dup => self.exec_dup(),
            Primitive::Over => self.exec_over(),
            Primitive::Swap => self.exec_swap(),
            Primitive::Rot => self.exec_rot(),
            Primitive::Pick => self.exec_pick(),
            Primitive::Roll => self.exec_roll(),
            Primitive::QuestionDup => self.exec_question_dup(),
            Primitive::Nip => self.exec_nip(),
            Primitive::Tuck => self.exec_tuck(),
            Primitive::TwoDup => self.exec_two_dup(),
            Primitive::TwoDrop => self.exec_two_drop(),
            Primitive::ToR => self.exec_to_r(),
            Primitive::RFrom => self.exec_r_from(),
            Primitive::RFetch => self.exec_r_fetch(),

            // Data space
            Primitive::Store => self.exec_store(),
            Primitive::Fetch => self.exec_fetch(),
            Primitive::CStore => self.exec_c_store(),
            Primitive::CFetch => self.exec_c_fetch(),
            Primitive::Here => self.exec_here(),
            Primitive::Allot => self.exec_allot(),
            Primitive::Align => self.exec_align(),
            Primitive::Aligned => self.exec_aligned(),
            Primitive::CellPlus => self.exec_unary(|a| a.wrapping_add(CELL_SIZE as Cell)),
            Primitive::Cells => self.exec_unary(|n| n.wrapping_mul(CELL_SIZE as Cell)),
            Primitive::Unused => self.exec_unused(),
            Primitive::Comma => self.exec_comma(),
            Primitive::CComma => self.exec_c_comma(),

            // Arithmetic and logic
            Primitive::Plus => self.exec_binary(|a, b| a.wrapping_add(b)),
            Primitive::Minus => self.exec_binary(|a, b| a.wrapping_sub(b)),
            Primitive::Star => self.exec_binary(|a, b| a.wrapping_mul(b)),
            Primitive::Slash => self.exec_slash(),
            Primitive::SlashMod => self.exec_slash_mod(),
            Primitive::Mod => self.exec_mod(),
            Primitive::Negate => self.exec_unary(|a| a.wrapping_neg()),
            Primitive::OnePlus => self.exec_unary(|a| a.wrapping_add(1)),
            Primitive::OneMinus => self.exec_unary(|a| a.wrapping_sub(1)),
            Primitive::And => self.exec_binary(|a, b| a & b),
            Primitive::Or => self.exec_binary(|a, b| a | b),
            Primitive::Xor => self.exec_binary(|a, b| a ^ b),
            Primitive::Invert => self.exec_unary(|a| !a),
            Primitive::LShift => self.exec_binary(|x, u| x.checked_shl(shift(u)).unwrap_or(0)),
            Primitive::RShift => self.exec_binary(|x, u| x.checked_shr(shift(u)).unwrap_or(0)),
            Primitive::Equals => self.exec_compare(|a, b| a == b),
            Primitive::Less => self.exec_compare_signed(|a, b| a < b),
            Primitive::Greater => self.exec_compare_signed(|a, b| a > b),
            Primitive::ULess => self.exec_compare(|a, b| a < b),
            Primitive::NotEquals => self.exec_compare(|a, b| a != b),
            Primitive::ZeroEquals => self.exec_unary(|a| flag(a == 0)),
            Primitive::ZeroLess => self.exec_unary(|a| flag(signed(a) < 0)),

            // Threaded code
            Primitive::Exit => self.exec_exit(),
            Primitive::Literal => self.exec_literal(),
            Primitive::Branch => self.exec_branch(),
            Primitive::ZeroBranch => self.exec_zero_branch(),
            Primitive::Execute => self.exec_execute(),

            // Dictionary and compiler state
            Primitive::Find => self.exec_find(),
            Primitive::Words => self.exec_words(),
            Primitive::Latest => self.exec_latest(),
            Primitive::Immediate => self.exec_immediate(),
            Primitive::Hidden => self.exec_hidden(),
            Primitive::ToBody => self.exec_to_body(),
            Primitive::State => self.exec_state(),
            Primitive::LeftBracket => self.exec_set_state(false),
            Primitive::RightBracket => self.exec_set_state(true),

            // Input and output
            Primitive::Emit => self.exec_emit(),
            Primitive::Type => self.exec_type(),
            Primitive::Cr => self.exec_cr(),
            Primitive::ToIn => self.exec_to_in(),
            Primitive::Source => self.exec_source(),
            Primitive::Refill => self.exec_refill(),

            // Environment
            Primitive::ArgCount => self.exec_arg_count(),
            Primitive::Arg => self.exec_arg(),
            Primitive::Bye => self.exec_bye(),
            Primitive::Ms => self.exec_ms(),
            Primitive::TimeAndDate => self.exec_time_and_date(),
            Primitive::UtcTimeAndDate => self.exec_utc_time_and_date(),
        }
    }

    // ---- Threaded code ----

    /// `EXIT`: pop the caller's cursor off the return stack.
    fn exec_exit(&mut self) -> Result<(), Halt> {
        checks::require_depth(&self.ret, 1)?;
        self.next = decode_ip(self.ret.take());
        Ok(())
    }

    /// Address of the operand slot following the current token.
    fn operand_address(&self) -> Result<(usize, usize), Fault> {
        let ip = self.next.ok_or(Fault::NoInstructions)?;
        let addr = checks::cell_address(&self.space, ip as Cell)?;
        Ok((ip, addr))
    }

    /// `(LITERAL)`: push the operand cell and skip it.
    fn exec_literal(&mut self) -> Result<(), Halt> {
        let (ip, addr) = self.operand_address()?;
        checks::require_room(&self.data, 1)?;
        self.data.put(self.space.fetch_cell(addr));
        self.next = Some(ip + CELL_SIZE);
        Ok(())
    }

    /// Target of a branch whose signed byte offset sits at `ip`.
    fn branch_target(&self, ip: usize, addr: usize) -> Result<usize, Fault> {
        let offset = signed(self.space.fetch_cell(addr));
        let target = (ip as i64).wrapping_add(offset);
        usize::try_from(target).map_err(|_| Fault::AddressOutOfBounds {
            addr: target as Cell,
            len: CELL_SIZE,
        })
    }

    /// `(BRANCH)`: jump by the operand offset, relative to the operand slot.
    fn exec_branch(&mut self) -> Result<(), Halt> {
        let (ip, addr) = self.operand_address()?;
        self.next = Some(self.branch_target(ip, addr)?);
        Ok(())
    }

    /// `(0BRANCH)`: branch if the top of stack is zero, else skip the offset.
    fn exec_zero_branch(&mut self) -> Result<(), Halt> {
        checks::require_depth(&self.data, 1)?;
        let (ip, addr) = self.operand_address()?;
        let target = if self.data.peek(0) == 0 {
            self.branch_target(ip, addr)?
        } else {
            ip + CELL_SIZE
        };
        self.data.take();
        self.next = Some(target);
        Ok(())
    }

    /// `EXECUTE`: invoke the token on top of the stack. A nested definition
    /// continues in whatever inner loop is already running.
    fn exec_execute(&mut self) -> Result<(), Halt> {
        checks::require_depth(&self.data, 1)?;
        let (xt, action) = self.resolve(self.data.peek(0))?;
        self.data.take();
        self.invoke(xt, action)
    }
}
