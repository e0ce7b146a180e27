//! Unit tests for the task board module.
