//! Adapter implementations of the board ports.

pub mod console;
pub mod memory;
pub mod render;
