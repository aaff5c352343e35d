//! forthkern common types.
//!
//! This crate provides the vocabulary shared by the VM and its hosts:
//!
//! - [`Cell`] and friends: the machine word, flags and alignment helpers
//! - [`Fault`]: every checked fault the kernel can raise
//! - [`Primitive`]: the native primitive table
//! - [`Config`]: arena and table capacities
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod cell;
pub mod config;
pub mod error;
pub mod primitive;

// Re-export commonly used types at the crate root.
pub use cell::{Cell, SignedCell, CELL_SIZE, FALSE, TRUE};
pub use config::{Config, ConfigError};
pub use error::Fault;
pub use primitive::{Primitive, ALL_PRIMITIVES};
