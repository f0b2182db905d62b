use crate::foundation::error::{EngraveError, EngraveResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Upper bound for the device pixel ratio used for every cached raster.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// Viewport size in CSS pixels plus the clamped device pixel ratio.
///
/// Every raster the renderer owns (frame and bitmap) is sized from these metrics; a new value
/// arrives on every resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    width: f64,
    height: f64,
    dpr: f64,
}

impl ViewportMetrics {
    /// Build validated metrics.
    ///
    /// Non-finite or non-positive ratios fall back to `1.0`; ratios above
    /// [`MAX_DEVICE_PIXEL_RATIO`] are clamped. The resulting device size must be at least one
    /// pixel and fit the rasterizer's `u16` limit.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> EngraveResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(EngraveError::validation(format!(
                "viewport must have positive finite size, got {width}x{height}"
            )));
        }
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };

        let out = Self { width, height, dpr };
        let (dw, dh) = out.device_size();
        if dw == 0 || dh == 0 {
            return Err(EngraveError::validation(format!(
                "viewport {width}x{height} at dpr {dpr} has no device pixels"
            )));
        }
        if dw > u32::from(u16::MAX) || dh > u32::from(u16::MAX) {
            return Err(EngraveError::validation(format!(
                "viewport device size {dw}x{dh} exceeds {0}x{0}",
                u16::MAX
            )));
        }
        Ok(out)
    }

    /// Width in CSS pixels.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Height in CSS pixels.
    pub fn height(self) -> f64 {
        self.height
    }

    /// Clamped device pixel ratio.
    pub fn dpr(self) -> f64 {
        self.dpr
    }

    /// Backing store size in device pixels (truncating, like a canvas size assignment).
    pub fn device_size(self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor() as u32,
            (self.height * self.dpr).floor() as u32,
        )
    }

    /// CSS-to-device transform.
    pub fn css_to_device(self) -> Affine {
        Affine::scale(self.dpr)
    }
}

/// Integer pixel rectangle in device space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grow by `pad` on every side, clamped to a `bound_w x bound_h` surface.
    pub fn expand_within(self, pad: u32, bound_w: u32, bound_h: u32) -> Self {
        let x0 = self.x.saturating_sub(pad);
        let y0 = self.y.saturating_sub(pad);
        let x1 = self.x.saturating_add(self.width).saturating_add(pad).min(bound_w);
        let y1 = self.y.saturating_add(self.height).saturating_add(pad).min(bound_h);
        Self {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: premul_channel(r, a),
            g: premul_channel(g, a),
            b: premul_channel(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub(crate) fn premul_channel(c: u8, a: u8) -> u8 {
    let c = u16::from(c);
    let a = u16::from(a);
    (((c * a) + 127) / 255) as u8
}

pub(crate) fn unpremul_channel(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}
