#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

extern crate alloc;

mod utils;
pub use utils::Color;

mod rb_tree;
pub use rb_tree::RbTree;

mod dump;
pub use dump::{Dump, DumpEntry, Iter};

mod validate;
pub use validate::InvariantViolation;

mod float_set;
pub use float_set::FloatSet;
