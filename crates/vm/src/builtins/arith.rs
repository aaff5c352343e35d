//! Single-cell arithmetic, logic and comparison.
//!
//! Arithmetic wraps modulo 2^64. Division truncates toward zero and treats
//! its operands as signed.

use crate::checks::require_depth;
use crate::error::Halt;
use crate::machine::Vm;
use forthkern_common::cell::{flag, signed, unsigned};
use forthkern_common::{Cell, Fault, SignedCell};

impl Vm {
    /// Replace the top cell with `op(top)`.
    pub(crate) fn exec_unary(&mut self, op: impl Fn(Cell) -> Cell) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        self.data.poke(0, op(self.data.peek(0)));
        Ok(())
    }

    /// `( a b -- op(a, b) )`
    pub(crate) fn exec_binary(&mut self, op: impl Fn(Cell, Cell) -> Cell) -> Result<(), Halt> {
        require_depth(&self.data, 2)?;
        let b = self.data.take();
        self.data.poke(0, op(self.data.peek(0), b));
        Ok(())
    }

    pub(crate) fn exec_compare(&mut self, op: impl Fn(Cell, Cell) -> bool) -> Result<(), Halt> {
        self.exec_binary(|a, b| flag(op(a, b)))
    }

    pub(crate) fn exec_compare_signed(
        &mut self,
        op: impl Fn(SignedCell, SignedCell) -> bool,
    ) -> Result<(), Halt> {
        self.exec_binary(|a, b| flag(op(signed(a), signed(b))))
    }

    /// Signed dividend and divisor, checked before anything is popped.
    fn division_operands(&self) -> Result<(SignedCell, SignedCell), Fault> {
        require_depth(&self.data, 2)?;
        let divisor = signed(self.data.peek(0));
        if divisor == 0 {
            return Err(Fault::DivisionByZero);
        }
        Ok((signed(self.data.peek(1)), divisor))
    }

    /// `/` ( n1 n2 -- quot )
    pub(crate) fn exec_slash(&mut self) -> Result<(), Halt> {
        let (n1, n2) = self.division_operands()?;
        self.data.take();
        self.data.poke(0, unsigned(n1.wrapping_div(n2)));
        Ok(())
    }

    /// `MOD` ( n1 n2 -- rem )
    pub(crate) fn exec_mod(&mut self) -> Result<(), Halt> {
        let (n1, n2) = self.division_operands()?;
        self.data.take();
        self.data.poke(0, unsigned(n1.wrapping_rem(n2)));
        Ok(())
    }

    /// `/MOD` ( n1 n2 -- rem quot )
    pub(crate) fn exec_slash_mod(&mut self) -> Result<(), Halt> {
        let (n1, n2) = self.division_operands()?;
        self.data.poke(1, unsigned(n1.wrapping_rem(n2)));
        self.data.poke(0, unsigned(n1.wrapping_div(n2)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Console, Vm};
    use forthkern_common::{Config, Primitive, TRUE};

    fn eval(stack: &[u64], p: Primitive) -> Vec<u64> {
        let mut vm = Vm::new(Config::default(), vec![], Console::null()).unwrap();
        for &v in stack {
            vm.push(v).unwrap();
        }
        let xt = vm.primitive_xt(p);
        vm.execute(xt).unwrap();
        vm.data_stack().to_vec()
    }

    fn n(v: i64) -> u64 {
        v as u64
    }

    #[test]
    fn addition_wraps() {
        assert_eq!(eval(&[u64::MAX, 2], Primitive::Plus), vec![1]);
        assert_eq!(eval(&[3, 5], Primitive::Minus), vec![n(-2)]);
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(eval(&[n(-7), 2], Primitive::Slash), vec![n(-3)]);
        assert_eq!(eval(&[n(-7), 2], Primitive::Mod), vec![n(-1)]);
        assert_eq!(eval(&[7, n(-2)], Primitive::SlashMod), vec![1, n(-3)]);
    }

    #[test]
    fn most_negative_over_minus_one_wraps() {
        assert_eq!(
            eval(&[n(i64::MIN), n(-1)], Primitive::SlashMod),
            vec![0, n(i64::MIN)]
        );
    }

    #[test]
    fn comparisons_yield_full_flags() {
        assert_eq!(eval(&[n(-1), 1], Primitive::Less), vec![TRUE]);
        assert_eq!(eval(&[n(-1), 1], Primitive::ULess), vec![0]);
        assert_eq!(eval(&[2, 1], Primitive::Greater), vec![TRUE]);
        assert_eq!(eval(&[4, 4], Primitive::NotEquals), vec![0]);
        assert_eq!(eval(&[0], Primitive::ZeroEquals), vec![TRUE]);
        assert_eq!(eval(&[n(-5)], Primitive::ZeroLess), vec![TRUE]);
    }

    #[test]
    fn shifts_are_logical() {
        assert_eq!(eval(&[1, 4], Primitive::LShift), vec![16]);
        assert_eq!(eval(&[u64::MAX, 60], Primitive::RShift), vec![0xF]);
        assert_eq!(eval(&[1, 64], Primitive::LShift), vec![0]);
        assert_eq!(eval(&[u64::MAX, 200], Primitive::RShift), vec![0]);
    }

    #[test]
    fn unary_ops() {
        assert_eq!(eval(&[5], Primitive::Negate), vec![n(-5)]);
        assert_eq!(eval(&[0], Primitive::Invert), vec![TRUE]);
        assert_eq!(eval(&[u64::MAX], Primitive::OnePlus), vec![0]);
        assert_eq!(eval(&[3], Primitive::Cells), vec![24]);
        assert_eq!(eval(&[16], Primitive::CellPlus), vec![24]);
    }

    #[cfg(not(feature = "unchecked"))]
    #[test]
    fn zero_divisor_faults_without_popping() {
        use crate::Halt;
        use forthkern_common::Fault;

        let mut vm = Vm::new(Config::default(), vec![], Console::null()).unwrap();
        vm.push(10).unwrap();
        vm.push(0).unwrap();
        for p in [Primitive::Slash, Primitive::SlashMod, Primitive::Mod] {
            let xt = vm.primitive_xt(p);
            assert_eq!(vm.execute(xt), Err(Halt::Fault(Fault::DivisionByZero)));
            assert_eq!(vm.data_stack(), &[10, 0]);
        }
    }
}
