//! Kernel - shared dependencies wired once at startup.

pub mod deps;

pub use deps::*;
