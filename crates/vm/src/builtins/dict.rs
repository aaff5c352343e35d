//! Dictionary lookup and the compiler-state words.

use crate::checks::{self, require_depth, require_room};
use crate::error::Halt;
use crate::machine::{Vm, STATE_ADDR};
use forthkern_common::{Cell, Fault, TRUE};
use std::io::Write;

impl Vm {
    /// Definition named by a cell, for words that take an xt operand.
    fn checked_xt(&self, xt: Cell) -> Result<usize, Fault> {
        usize::try_from(xt)
            .ok()
            .filter(|&index| index < self.dict.len())
            .ok_or(Fault::InvalidExecutionToken { xt })
    }

    /// `FIND` ( c-addr -- 0 | xt 1 | xt -1 )
    ///
    /// `c-addr` points at a length byte followed by the name.
    pub(crate) fn exec_find(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let addr = self.data.peek(0);
        let len_at = checks::byte_address(&self.space, addr)?;
        let len = usize::from(self.space.fetch_byte(len_at));
        let name_at = checks::byte_range(&self.space, addr.wrapping_add(1), len)?;
        let found = self.dict.find(self.space.bytes(name_at, len));
        match found {
            None => self.data.poke(0, 0),
            Some(xt) => {
                require_room(&self.data, 1)?;
                let immediate = self.dict.get(xt).is_some_and(|def| def.flags.immediate);
                self.data.poke(0, xt as Cell);
                self.data.put(if immediate { 1 } else { TRUE });
            }
        }
        Ok(())
    }

    /// `WORDS`: every name, newest first, hidden ones included.
    pub(crate) fn exec_words(&mut self) -> Result<(), Halt> {
        let listing = self
            .dict
            .iter_latest_first()
            .map(|(_, def)| def.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.console.output, "{listing}").map_err(Fault::from)?;
        Ok(())
    }

    pub(crate) fn exec_latest(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        let xt = self.latest_xt()?;
        self.data.put(xt as Cell);
        Ok(())
    }

    fn latest_xt(&self) -> Result<usize, Fault> {
        self.dict
            .latest()
            .ok_or(Fault::UnknownIndex { index: 0, count: 0 })
    }

    pub(crate) fn exec_immediate(&mut self) -> Result<(), Halt> {
        let xt = self.latest_xt()?;
        if let Some(def) = self.dict.get_mut(xt) {
            def.flags.immediate = true;
        }
        Ok(())
    }

    /// `HIDDEN` ( xt -- ): toggle whether lookup sees xt.
    pub(crate) fn exec_hidden(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let xt = self.checked_xt(self.data.peek(0))?;
        self.data.take();
        if let Some(def) = self.dict.get_mut(xt) {
            def.flags.hidden = !def.flags.hidden;
        }
        Ok(())
    }

    /// `>BODY` ( xt -- a-addr )
    pub(crate) fn exec_to_body(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let xt = self.checked_xt(self.data.peek(0))?;
        let body = self.dict.get(xt).map_or(0, |def| def.body);
        self.data.poke(0, body as Cell);
        Ok(())
    }

    pub(crate) fn exec_state(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        self.data.put(STATE_ADDR as Cell);
        Ok(())
    }

    /// `[` and `]`.
    pub(crate) fn exec_set_state(&mut self, compiling: bool) -> Result<(), Halt> {
        self.set_compiling(compiling);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Console, SharedOutput, Vm};
    use forthkern_common::{Cell, Config, Primitive, TRUE};
    use std::io;

    fn vm() -> Vm {
        Vm::new(Config::default(), vec![], Console::null()).unwrap()
    }

    fn run(vm: &mut Vm, p: Primitive) {
        let xt = vm.primitive_xt(p);
        vm.execute(xt).unwrap();
    }

    /// Lay down a counted string at HERE and return its address.
    fn counted(vm: &mut Vm, name: &str) -> Cell {
        let addr = vm.here() as Cell;
        vm.push(name.len() as Cell).unwrap();
        run(vm, Primitive::CComma);
        for b in name.bytes() {
            vm.push(Cell::from(b)).unwrap();
            run(vm, Primitive::CComma);
        }
        addr
    }

    #[test]
    fn find_reports_immediacy() {
        let mut vm = vm();
        let addr = counted(&mut vm, "[");
        vm.push(addr).unwrap();
        run(&mut vm, Primitive::Find);
        assert_eq!(
            vm.data_stack(),
            &[vm.primitive_xt(Primitive::LeftBracket) as Cell, 1]
        );

        let addr = counted(&mut vm, "dup");
        vm.push(addr).unwrap();
        run(&mut vm, Primitive::Find);
        assert_eq!(
            &vm.data_stack()[2..],
            &[vm.primitive_xt(Primitive::Dup) as Cell, TRUE]
        );
    }

    #[test]
    fn find_miss_leaves_single_zero() {
        let mut vm = vm();
        let addr = counted(&mut vm, "NOPE");
        vm.push(addr).unwrap();
        run(&mut vm, Primitive::Find);
        assert_eq!(vm.data_stack(), &[0]);
    }

    #[test]
    fn hidden_toggles() {
        let mut vm = vm();
        let xt = vm.define_colon("thing").unwrap();
        vm.push(xt as Cell).unwrap();
        run(&mut vm, Primitive::Hidden);
        assert_eq!(vm.find("thing"), None);
        vm.push(xt as Cell).unwrap();
        run(&mut vm, Primitive::Hidden);
        assert_eq!(vm.find("thing"), Some(xt));
    }

    #[test]
    fn immediate_marks_latest() {
        let mut vm = vm();
        let xt = vm.define_colon("now").unwrap();
        run(&mut vm, Primitive::Latest);
        assert_eq!(vm.pop().unwrap(), xt as Cell);
        run(&mut vm, Primitive::Immediate);
        assert!(vm.definition(xt).unwrap().flags.immediate);
    }

    #[test]
    fn to_body_matches_definition() {
        let mut vm = vm();
        let xt = vm.define_colon("body").unwrap();
        vm.push(xt as Cell).unwrap();
        run(&mut vm, Primitive::ToBody);
        assert_eq!(vm.pop().unwrap(), vm.definition(xt).unwrap().body as Cell);
    }

    #[test]
    fn brackets_drive_state_cell() {
        let mut vm = vm();
        run(&mut vm, Primitive::RightBracket);
        assert!(vm.is_compiling());
        run(&mut vm, Primitive::State);
        run(&mut vm, Primitive::Fetch);
        assert_eq!(vm.pop().unwrap(), TRUE);
        run(&mut vm, Primitive::LeftBracket);
        assert!(!vm.is_compiling());
    }

    #[test]
    fn words_lists_newest_first() {
        let out = SharedOutput::new();
        let mut vm = Vm::new(
            Config::default(),
            vec![],
            Console::new(io::empty(), out.clone()),
        )
        .unwrap();
        vm.define_colon("newest").unwrap();
        run(&mut vm, Primitive::Words);
        let text = out.text();
        assert!(text.starts_with("newest UTCTIME&DATE TIME&DATE MS BYE"));
        assert!(text.ends_with("DROP DEPTH\n"));
    }
}
