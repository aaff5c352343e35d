//! VM state: arenas, dictionary, interpreter registers and session lifecycle.

use crate::arena::{DataSpace, Stack, StackKind};
use crate::checks;
use crate::console::Console;
use crate::dictionary::{Action, Definition, Dictionary, Flags, HostFn, Xt};
use crate::error::BootError;
use forthkern_common::cell::{aligned, flag};
use forthkern_common::{Cell, Config, Fault, Primitive, ALL_PRIMITIVES, CELL_SIZE};
use std::io::Write;
use tracing::debug;

/// Address of the `>IN` cell.
pub const TO_IN_ADDR: usize = 0;

/// Address of the `STATE` cell.
pub const STATE_ADDR: usize = CELL_SIZE;

/// Address of the first byte of the input buffer.
pub const INPUT_BUFFER_ADDR: usize = 2 * CELL_SIZE;

/// One interpreter session.
///
/// All state a running program can observe lives here; two sessions share
/// nothing. A `Vm` is not meant to cross threads.
#[derive(Debug)]
pub struct Vm {
    pub(crate) config: Config,
    pub(crate) space: DataSpace,
    pub(crate) data: Stack,
    pub(crate) ret: Stack,
    pub(crate) dict: Dictionary,
    /// Address of the next body slot to run, if any.
    pub(crate) next: Option<usize>,
    /// The definition most recently invoked.
    pub(crate) current: Option<Xt>,
    /// Length of the line in the input buffer.
    pub(crate) source_len: usize,
    pub(crate) args: Vec<String>,
    /// `(address, length)` of each argument inside data space.
    pub(crate) arg_spans: Vec<(usize, usize)>,
    pub(crate) console: Console,
}

impl Vm {
    /// Create a session and reset it.
    ///
    /// `args` is the process argument vector; by convention `args[0]` is
    /// the program name.
    pub fn new(config: Config, args: Vec<String>, console: Console) -> Result<Self, BootError> {
        config.validate()?;
        let mut vm = Self {
            config,
            space: DataSpace::new(config.data_space),
            data: Stack::new(StackKind::Data, config.data_stack),
            ret: Stack::new(StackKind::Return, config.return_stack),
            dict: Dictionary::new(config.dictionary),
            next: None,
            current: None,
            source_len: 0,
            args,
            arg_spans: Vec::new(),
            console,
        };
        vm.reset()?;
        Ok(vm)
    }

    /// Zero every arena, clear both stacks and the interpreter registers,
    /// and reinstall exactly the primitive set. Definitions added since the
    /// last reset are discarded.
    pub fn reset(&mut self) -> Result<(), Fault> {
        self.space.clear();
        self.data.clear();
        self.ret.clear();
        self.dict.clear();
        self.next = None;
        self.current = None;
        self.source_len = 0;
        self.arg_spans.clear();

        let system = self.config.system_area() as Cell;
        checks::require_data_space(&self.space, system)?;
        self.space.allot(self.config.system_area());

        for arg in &self.args {
            let bytes = arg.as_bytes();
            checks::require_data_space(&self.space, bytes.len() as Cell)?;
            let addr = self.space.here();
            self.space.write_bytes(addr, bytes);
            self.space.allot(bytes.len());
            self.arg_spans.push((addr, bytes.len()));
        }

        for primitive in ALL_PRIMITIVES {
            let flags = Flags {
                immediate: primitive.is_immediate(),
                ..Flags::default()
            };
            self.register(primitive.name(), Action::Primitive(primitive), flags)?;
        }

        debug!(
            primitives = ALL_PRIMITIVES.len(),
            here = self.space.here(),
            args = self.args.len(),
            "session reset"
        );
        Ok(())
    }

    /// Append a definition whose body starts at the aligned HERE.
    fn register(&mut self, name: &str, action: Action, flags: Flags) -> Result<Xt, Fault> {
        self.dict.check_append(name)?;
        let pad = self.alignment_padding()?;
        checks::require_data_space(&self.space, pad as Cell)?;
        self.space.allot(pad);
        self.dict.append(Definition {
            name: name.to_string(),
            action,
            body: self.space.here(),
            flags,
        })
    }

    /// Bytes needed to bring HERE to a cell boundary.
    pub(crate) fn alignment_padding(&self) -> Result<usize, Fault> {
        checks::require_here(&self.space)?;
        let here = self.space.here();
        let target = aligned(here).ok_or(Fault::InvalidHere {
            here,
            capacity: self.space.capacity(),
        })?;
        Ok(target - here)
    }

    // ---- Host extension ----

    /// Register a native host function under `name`.
    pub fn define_code_word(&mut self, name: &str, func: HostFn) -> Result<Xt, Fault> {
        let xt = self.register(name, Action::Host(func), Flags::default())?;
        debug!(name, xt, "defined code word");
        Ok(xt)
    }

    /// Start a threaded-code definition whose body begins at the aligned
    /// HERE. Compile its body with [`compile_xt`](Self::compile_xt) and
    /// [`compile_literal`](Self::compile_literal), ending with `EXIT`.
    pub fn define_colon(&mut self, name: &str) -> Result<Xt, Fault> {
        let xt = self.register(name, Action::Nested, Flags::default())?;
        debug!(name, xt, body = self.space.here(), "defined colon word");
        Ok(xt)
    }

    /// Append one cell at HERE, which must be aligned.
    pub fn compile_cell(&mut self, value: Cell) -> Result<(), Fault> {
        checks::require_aligned(self.space.here() as Cell)?;
        checks::require_data_space(&self.space, CELL_SIZE as Cell)?;
        let here = self.space.here();
        self.space.store_cell(here, value);
        self.space.allot(CELL_SIZE);
        Ok(())
    }

    /// Append an execution token at HERE.
    pub fn compile_xt(&mut self, xt: Xt) -> Result<(), Fault> {
        self.compile_cell(xt as Cell)
    }

    /// Append `(LITERAL) value` at HERE.
    pub fn compile_literal(&mut self, value: Cell) -> Result<(), Fault> {
        checks::require_aligned(self.space.here() as Cell)?;
        checks::require_data_space(&self.space, 2 * CELL_SIZE as Cell)?;
        self.compile_xt(self.primitive_xt(Primitive::Literal))?;
        self.compile_cell(value)
    }

    /// Execution token a primitive receives at reset.
    pub fn primitive_xt(&self, primitive: Primitive) -> Xt {
        primitive.index()
    }

    /// Look up a visible definition by name.
    pub fn find(&self, name: &str) -> Option<Xt> {
        self.dict.find(name.as_bytes())
    }

    /// The dictionary entry for `xt`.
    pub fn definition(&self, xt: Xt) -> Option<&Definition> {
        self.dict.get(xt)
    }

    /// The whole dictionary, for listing and inspection.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Show or hide a definition from lookup.
    pub fn set_hidden(&mut self, xt: Xt, hidden: bool) -> Result<(), Fault> {
        let def = self
            .dict
            .get_mut(xt)
            .ok_or(Fault::InvalidExecutionToken { xt: xt as Cell })?;
        def.flags.hidden = hidden;
        Ok(())
    }

    // ---- Stacks ----

    /// Push onto the data stack.
    pub fn push(&mut self, value: Cell) -> Result<(), Fault> {
        checks::require_room(&self.data, 1)?;
        self.data.put(value);
        Ok(())
    }

    /// Pop from the data stack.
    pub fn pop(&mut self) -> Result<Cell, Fault> {
        checks::require_depth(&self.data, 1)?;
        Ok(self.data.take())
    }

    /// Data stack contents, bottom first.
    pub fn data_stack(&self) -> &[Cell] {
        self.data.as_slice()
    }

    /// Number of cells on the data stack.
    pub fn depth(&self) -> usize {
        self.data.len()
    }

    /// Return stack contents, bottom first.
    pub fn return_stack(&self) -> &[Cell] {
        self.ret.as_slice()
    }

    /// Number of cells on the return stack.
    pub fn return_depth(&self) -> usize {
        self.ret.len()
    }

    // ---- Data space ----

    /// Address of the next free data-space byte.
    pub fn here(&self) -> usize {
        self.space.here()
    }

    /// Bytes between HERE and the end of data space.
    pub fn unused(&self) -> usize {
        self.space.unused()
    }

    /// Read the cell at `addr`, with the same checks as `@`.
    pub fn fetch_cell(&self, addr: Cell) -> Result<Cell, Fault> {
        let addr = checks::cell_address(&self.space, addr)?;
        Ok(self.space.fetch_cell(addr))
    }

    /// Write the cell at `addr`, with the same checks as `!`.
    pub fn store_cell(&mut self, addr: Cell, value: Cell) -> Result<(), Fault> {
        let addr = checks::cell_address(&self.space, addr)?;
        self.space.store_cell(addr, value);
        Ok(())
    }

    /// Borrow `len` bytes of data space starting at `addr`.
    pub fn bytes(&self, addr: Cell, len: usize) -> Result<&[u8], Fault> {
        let addr = checks::byte_range(&self.space, addr, len)?;
        Ok(self.space.bytes(addr, len))
    }

    // ---- Session state ----

    /// True while `STATE` holds a non-zero value.
    pub fn is_compiling(&self) -> bool {
        self.space.fetch_cell(STATE_ADDR) != 0
    }

    pub(crate) fn set_compiling(&mut self, compiling: bool) {
        self.space.store_cell(STATE_ADDR, flag(compiling));
    }

    /// Current input line.
    pub fn source(&self) -> &[u8] {
        self.space.bytes(INPUT_BUFFER_ADDR, self.source_len)
    }

    /// Scan offset into the current input line.
    pub fn to_in(&self) -> Cell {
        self.space.fetch_cell(TO_IN_ADDR)
    }

    /// Session arguments, program name first.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Capacities this session was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address of the next body slot the inner interpreter will run.
    pub fn next_instruction(&self) -> Option<usize> {
        self.next
    }

    /// Seed (or clear) the inner interpreter's instruction cursor.
    pub fn set_next_instruction(&mut self, addr: Option<usize>) {
        self.next = addr;
    }

    /// The definition most recently invoked.
    pub fn current(&self) -> Option<Xt> {
        self.current
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<(), Fault> {
        self.console.output.flush()?;
        Ok(())
    }
}
