//! Shared primitives: errors, viewport metrics, colors and pixel math.

pub mod color;
pub mod core;
pub mod error;
pub(crate) mod math;
