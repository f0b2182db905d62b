//! Golden aurora blobs and the framing vignette.

use crate::foundation::core::{Point, ViewportMetrics};
use crate::foundation::math::clamp01;
use crate::render::gradient::{BlendMode, ColorStop, RadialGradient};
use crate::render::surface::Surface;

/// How a blob coordinate drifts with reveal progress.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Drift {
    Sin { freq: f64, amp: f64 },
    Cos { freq: f64, amp: f64 },
    Linear { amp: f64 },
}

impl Drift {
    fn offset(self, rp: f64) -> f64 {
        match self {
            Self::Sin { freq, amp } => (rp * freq).sin() * amp,
            Self::Cos { freq, amp } => (rp * freq).cos() * amp,
            Self::Linear { amp } => rp * amp,
        }
    }
}

/// One blob: base position as a fraction of the viewport, per-axis drift (fraction of width or
/// height), radius as a fraction of the width, and the non-transparent stops.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Blob {
    base: (f64, f64),
    drift: (Drift, Drift),
    radius: f64,
    stops: &'static [ColorStop],
}

const BLOBS: [Blob; 5] = [
    // Upper-left amber.
    Blob {
        base: (0.28, 0.25),
        drift: (
            Drift::Sin { freq: 2.5, amp: 0.06 },
            Drift::Cos { freq: 1.8, amp: 0.05 },
        ),
        radius: 0.45,
        stops: &[
            ColorStop::new(0.0, [160, 110, 40], 0.35),
            ColorStop::new(0.25, [120, 75, 20], 0.2),
            ColorStop::new(0.55, [60, 35, 8], 0.1),
        ],
    },
    // Lower-right deep gold.
    Blob {
        base: (0.75, 0.72),
        drift: (
            Drift::Cos { freq: 2.0, amp: 0.05 },
            Drift::Sin { freq: 2.2, amp: 0.06 },
        ),
        radius: 0.5,
        stops: &[
            ColorStop::new(0.0, [140, 90, 25], 0.3),
            ColorStop::new(0.3, [100, 60, 15], 0.18),
            ColorStop::new(0.6, [45, 25, 5], 0.08),
        ],
    },
    // Upper-right copper.
    Blob {
        base: (0.8, 0.18),
        drift: (
            Drift::Sin { freq: 1.6, amp: 0.04 },
            Drift::Cos { freq: 2.8, amp: 0.04 },
        ),
        radius: 0.35,
        stops: &[
            ColorStop::new(0.0, [180, 100, 30], 0.22),
            ColorStop::new(0.3, [100, 55, 15], 0.12),
            ColorStop::new(0.6, [40, 20, 5], 0.05),
        ],
    },
    // Bottom-left dark amber.
    Blob {
        base: (0.15, 0.8),
        drift: (
            Drift::Cos { freq: 3.0, amp: 0.05 },
            Drift::Sin { freq: 1.5, amp: 0.04 },
        ),
        radius: 0.38,
        stops: &[
            ColorStop::new(0.0, [130, 80, 20], 0.2),
            ColorStop::new(0.35, [80, 45, 10], 0.1),
            ColorStop::new(0.65, [30, 15, 3], 0.04),
        ],
    },
    // Top-center highlight.
    Blob {
        base: (0.5, 0.12),
        drift: (
            Drift::Sin { freq: 2.0, amp: 0.08 },
            Drift::Linear { amp: 0.05 },
        ),
        radius: 0.4,
        stops: &[
            ColorStop::new(0.0, [200, 150, 50], 0.18),
            ColorStop::new(0.2, [140, 95, 30], 0.12),
            ColorStop::new(0.5, [60, 35, 10], 0.05),
        ],
    },
];

pub const BLOB_COUNT: usize = BLOBS.len();

const VIGNETTE_INNER: f64 = 0.22;
const VIGNETTE_OUTER: f64 = 0.72;

/// Gradients for the five blobs at `reveal_progress`; stop alphas are scaled by the veil
/// intensity (`reveal_progress` clamped to `[0, 1]`).
pub fn aurora_gradients(metrics: ViewportMetrics, reveal_progress: f64) -> Vec<RadialGradient> {
    let (w, h) = (metrics.width(), metrics.height());
    let veil = clamp01(reveal_progress);
    BLOBS
        .iter()
        .map(|blob| {
            let center = Point::new(
                w * blob.base.0 + blob.drift.0.offset(veil) * w,
                h * blob.base.1 + blob.drift.1.offset(veil) * h,
            );
            let mut stops: Vec<ColorStop> = blob
                .stops
                .iter()
                .map(|s| ColorStop::new(s.offset, s.rgb, s.alpha * veil))
                .collect();
            stops.push(ColorStop::new(1.0, [0, 0, 0], 0.0));
            RadialGradient::new(center, 0.0, w * blob.radius, stops)
        })
        .collect()
}

/// Screen-blend the aurora onto `dst` with a global alpha. Zero alpha draws nothing.
pub fn paint_aurora(
    dst: &mut Surface,
    metrics: ViewportMetrics,
    reveal_progress: f64,
    global_alpha: f64,
) {
    if global_alpha <= 0.0 {
        return;
    }
    for g in aurora_gradients(metrics, reveal_progress) {
        g.paint(dst, metrics, BlendMode::Screen, global_alpha);
    }
}

/// Black vignette centered on the viewport, transparent inside `0.22 * min(w, h)` and reaching
/// `alpha` at `0.72 * max(w, h)`.
pub fn vignette_gradient(metrics: ViewportMetrics, alpha: f64) -> RadialGradient {
    let (w, h) = (metrics.width(), metrics.height());
    RadialGradient::new(
        Point::new(w / 2.0, h / 2.0),
        w.min(h) * VIGNETTE_INNER,
        w.max(h) * VIGNETTE_OUTER,
        vec![
            ColorStop::new(0.0, [0, 0, 0], 0.0),
            ColorStop::new(0.45, [0, 0, 0], alpha * 0.15),
            ColorStop::new(0.7, [0, 0, 0], alpha * 0.55),
            ColorStop::new(1.0, [0, 0, 0], alpha),
        ],
    )
}

pub fn paint_vignette(dst: &mut Surface, metrics: ViewportMetrics, alpha: f64) {
    vignette_gradient(metrics, alpha).paint(dst, metrics, BlendMode::Normal, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8Premul;

    fn metrics() -> ViewportMetrics {
        ViewportMetrics::new(200.0, 100.0, 1.0).unwrap()
    }

    #[test]
    fn five_blobs_with_transparent_tail() {
        let gs = aurora_gradients(metrics(), 1.0);
        assert_eq!(gs.len(), BLOB_COUNT);
        for g in &gs {
            assert_eq!(g.r0, 0.0);
            assert_eq!(g.color_at(1.0), [0, 0, 0, 0]);
        }
        assert!((gs[0].r1 - 90.0).abs() < 1e-12);
        assert!((gs[1].r1 - 100.0).abs() < 1e-12);
    }

    #[test]
    fn blob_positions_drift_with_progress() {
        let m = metrics();
        let at0 = aurora_gradients(m, 0.0);
        // Blob 1 at rp = 0: sin(0) = 0, cos(0) = 1.
        assert!((at0[0].center.x - 56.0).abs() < 1e-9);
        assert!((at0[0].center.y - 30.0).abs() < 1e-9);
        // Blob 5 drifts linearly in y.
        let at1 = aurora_gradients(m, 1.0);
        assert!((at1[4].center.y - (12.0 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_veil_or_alpha_leaves_frame_untouched() {
        let m = metrics();
        let bg = Rgba8Premul::from_straight_rgba(10, 10, 10, 255);
        let mut s = Surface::filled(200, 100, bg);
        paint_aurora(&mut s, m, 0.0, 1.0);
        paint_aurora(&mut s, m, 1.0, 0.0);
        assert_eq!(s, Surface::filled(200, 100, bg));

        paint_aurora(&mut s, m, 1.0, 1.0);
        assert!(s.pixel(56, 25)[0] > 10);
    }

    #[test]
    fn vignette_is_clear_in_center_and_dark_at_corners() {
        let m = metrics();
        let bg = Rgba8Premul::from_straight_rgba(100, 100, 100, 255);
        let mut s = Surface::filled(200, 100, bg);
        paint_vignette(&mut s, m, 0.9);
        assert_eq!(s.pixel(100, 50), [100, 100, 100, 255]);
        assert!(s.pixel(0, 0)[0] < 100);
        assert_eq!(s.pixel(0, 0)[3], 255);
    }
}
