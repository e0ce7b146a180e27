//! Step definitions for task board lifecycle scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
