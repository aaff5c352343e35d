//! The primitive library.
//!
//! Each primitive is a method on [`Vm`](crate::Vm) that runs its checks
//! first and only then touches the stacks or data space. Dispatch from a
//! [`Primitive`](forthkern_common::Primitive) to these methods lives in
//! [`execute`](crate::execute).

mod arith;
mod dict;
mod env;
mod io;
mod memory;
mod stack;
