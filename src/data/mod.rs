//! Dataset preparation: sanitization and synthetic sample generation.

pub mod sample;
pub mod sanitize;

pub use sample::*;
pub use sanitize::*;
