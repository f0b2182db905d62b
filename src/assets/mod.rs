//! Asset loading: where bytes come from and how the logo is decoded.

pub mod decode;
pub mod source;
