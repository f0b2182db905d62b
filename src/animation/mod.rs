//! Frame-driven animation helpers.

pub mod smooth;
