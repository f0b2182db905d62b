//! CPU rendering for the hero canvas.
//!
//! Vector geometry goes through `vello_cpu`; gradients, blur and blending run in software on
//! premultiplied RGBA8 [`surface::Surface`]s.

/// Golden aurora blobs and vignette.
pub mod aurora;
/// Prepared tinted bitmaps (logo or emblem).
pub mod bitmap;
pub mod blur;
pub mod composite;
pub mod emblem;
/// The scroll-driven renderer.
pub mod engraving;
pub mod gradient;
pub(crate) mod raster;
/// Pure reveal math: regimes, scan bands, glow and bloom.
pub mod reveal;
pub mod surface;
pub mod tint;
