//! Common utilities used by the mspgemm crates.
//!
//! This is an internal crate which contains low-level building blocks that
//! know nothing about sparse matrices: bit vectors, numeric traits and range
//! splitting.

pub mod bit_vec;
pub mod iter;
pub mod num;
