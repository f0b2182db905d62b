use crate::assets::decode::{LogoImage, rasterize_logo};
use crate::foundation::color::Color;
use crate::foundation::core::{ViewportMetrics, premul_channel};
use crate::foundation::error::EngraveResult;
use crate::render::surface::Surface;

/// Fraction of the smaller viewport side the logo may occupy.
pub const LOGO_FIT_FRACTION: f64 = 0.45;

/// Alpha below which a pixel is treated as empty and left alone.
const ALPHA_THRESHOLD: f64 = 0.01;

/// Placement of the logo in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogoPlacement {
    /// Fit `(logo_w, logo_h)` inside `0.45 * min(width, height)`, centered.
    pub fn fit(metrics: ViewportMetrics, logo_w: f64, logo_h: f64) -> Self {
        let max_dim = metrics.width().min(metrics.height()) * LOGO_FIT_FRACTION;
        let scale = (max_dim / logo_w).min(max_dim / logo_h);
        let width = logo_w * scale;
        let height = logo_h * scale;
        Self {
            x: (metrics.width() - width) / 2.0,
            y: (metrics.height() - height) / 2.0,
            width,
            height,
        }
    }
}

/// Perceived brightness of a straight-alpha pixel in `[0, 1]`.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (f64::from(r) * 0.299 + f64::from(g) * 0.587 + f64::from(b) * 0.114) / 255.0
}

/// Recolor a straight-alpha pixel to `accent * luminance`, preserving alpha.
///
/// Pixels at or below the alpha threshold are returned unchanged.
pub fn tint_pixel(px: [u8; 4], accent: [u8; 3]) -> [u8; 4] {
    let alpha = f64::from(px[3]) / 255.0;
    if alpha <= ALPHA_THRESHOLD {
        return px;
    }
    let l = luminance(px[0], px[1], px[2]);
    let ch = |c: u8| (f64::from(c) * l).round().clamp(0.0, 255.0) as u8;
    [ch(accent[0]), ch(accent[1]), ch(accent[2]), px[3]]
}

/// Draw the logo centered at device resolution and recolor it to the accent hue.
#[tracing::instrument(skip(logo, accent))]
pub fn render_tinted_logo(
    logo: &LogoImage,
    metrics: ViewportMetrics,
    accent: Color,
) -> EngraveResult<Surface> {
    let (dw, dh) = metrics.device_size();
    let mut out = Surface::new(dw, dh);

    let (lw, lh) = logo.size();
    let place = LogoPlacement::fit(metrics, lw, lh);
    let dpr = metrics.dpr();
    let px_w = (place.width * dpr).round().max(0.0) as u32;
    let px_h = (place.height * dpr).round().max(0.0) as u32;
    if px_w == 0 || px_h == 0 {
        return Ok(out);
    }
    let ox = (place.x * dpr).round().max(0.0) as u32;
    let oy = (place.y * dpr).round().max(0.0) as u32;

    let raster = rasterize_logo(logo, px_w, px_h)?;
    let [ar, ag, ab, _] = accent.to_rgba8();

    for (x, y, src) in raster.enumerate_pixels() {
        let (tx, ty) = (ox + x, oy + y);
        if tx >= dw || ty >= dh {
            continue;
        }
        let [r, g, b, a] = tint_pixel(src.0, [ar, ag, ab]);
        let i = out.index(tx, ty);
        out.data_mut()[i..i + 4].copy_from_slice(&[
            premul_channel(r, a),
            premul_channel(g, a),
            premul_channel(b, a),
            a,
        ]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const GOLD: [u8; 3] = [201, 169, 110];

    #[test]
    fn white_maps_to_accent_and_black_to_black() {
        assert_eq!(tint_pixel([255, 255, 255, 255], GOLD), [201, 169, 110, 255]);
        assert_eq!(tint_pixel([0, 0, 0, 255], GOLD), [0, 0, 0, 255]);
    }

    #[test]
    fn alpha_is_preserved_and_near_transparent_is_skipped() {
        assert_eq!(tint_pixel([255, 255, 255, 77], GOLD)[3], 77);
        // 2/255 is below the 1% threshold: untouched, including color.
        assert_eq!(tint_pixel([12, 200, 40, 2], GOLD), [12, 200, 40, 2]);
        assert_ne!(tint_pixel([12, 200, 40, 3], GOLD), [12, 200, 40, 3]);
    }

    #[test]
    fn luminance_weights_sum_to_one() {
        assert!((luminance(255, 255, 255) - 1.0).abs() < 1e-12);
        assert!((luminance(255, 0, 0) - 0.299).abs() < 1e-12);
    }

    #[test]
    fn placement_fits_and_centers() {
        let m = ViewportMetrics::new(200.0, 100.0, 1.0).unwrap();
        let p = LogoPlacement::fit(m, 90.0, 45.0);
        assert!((p.width - 45.0).abs() < 1e-12);
        assert!((p.height - 22.5).abs() < 1e-12);
        assert!((p.x - 77.5).abs() < 1e-12);
        assert!((p.y - 38.75).abs() < 1e-12);
    }

    #[test]
    fn tinted_logo_is_centered_and_premultiplied() {
        let m = ViewportMetrics::new(100.0, 100.0, 1.0).unwrap();
        let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 255, 255, 255]));
        let logo = LogoImage::Raster(Arc::new(img));
        let s = render_tinted_logo(&logo, m, Color::from_rgb8(201, 169, 110)).unwrap();
        assert_eq!(s.size(), (100, 100));
        assert_eq!(s.pixel(50, 50), [201, 169, 110, 255]);
        assert_eq!(s.pixel(5, 5), [0, 0, 0, 0]);
        let b = s.content_bounds().unwrap();
        // 45px logo centered at 27.5 rounds to 28.
        assert_eq!((b.x, b.y, b.width, b.height), (28, 28, 45, 45));
    }
}
