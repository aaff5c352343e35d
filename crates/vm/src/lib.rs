//! forthkern virtual machine: a safety-checked threaded-code kernel.
//!
//! The VM holds:
//! - A byte-addressed data space with a forward-only HERE cursor
//! - A data stack and a return stack of fixed capacity
//! - A dictionary of named definitions, looked up newest first
//! - An inner interpreter that walks threaded code without native recursion
//!
//! Everything above the primitive set (reading source text, compiling
//! colon definitions, control structures) is left to the host.
//!
//! # Usage
//!
//! ```
//! use forthkern_common::{Config, Primitive};
//! use forthkern_vm::{Console, Vm};
//!
//! let mut vm = Vm::new(Config::default(), vec!["demo".into()], Console::null()).unwrap();
//!
//! // Compile `: seven 3 4 + ;` by hand and run it.
//! let seven = vm.define_colon("seven").unwrap();
//! vm.compile_literal(3).unwrap();
//! vm.compile_literal(4).unwrap();
//! vm.compile_xt(vm.primitive_xt(Primitive::Plus)).unwrap();
//! vm.compile_xt(vm.primitive_xt(Primitive::Exit)).unwrap();
//!
//! vm.execute(seven).unwrap();
//! assert_eq!(vm.data_stack(), &[7]);
//! ```

pub mod arena;
mod builtins;
pub mod checks;
pub mod console;
pub mod dictionary;
pub mod error;
pub mod execute;
pub mod machine;

pub use console::{Console, SharedOutput};
pub use dictionary::{Action, Definition, Dictionary, Flags, HostFn, Xt, MAX_NAME_LEN};
pub use error::{BootError, Halt};
pub use execute::NO_INSTRUCTION;
pub use machine::{Vm, INPUT_BUFFER_ADDR, STATE_ADDR, TO_IN_ADDR};

pub use forthkern_common::{
    Cell, Config, Fault, Primitive, ALL_PRIMITIVES, CELL_SIZE, FALSE, TRUE,
};
