//! Scroll-progress math for the engraving reveal. Everything here is pure and in CSS pixels
//! unless a name says otherwise.

use crate::foundation::math::clamp01;

/// Progress at which the reveal completes and the fade-out begins.
pub const REVEAL_END: f64 = 0.76;
/// Length of the fade-out tail after [`REVEAL_END`].
pub const FADE_SPAN: f64 = 0.24;
/// The reveal overshoots the half-height so the outermost lines fully open before the end.
pub const REVEAL_OVERSHOOT: f64 = 1.3;
const THICKNESS_GROWTH: f64 = 2.5;

const GLOW_START: f64 = 0.35;
const GLOW_RAMP: f64 = 0.5;
const GLOW_BLUR: f64 = 7.0;
const GLOW_ALPHA: f64 = 0.13;

const BLOOM_START: f64 = 0.6;
const BLOOM_ALPHA_SLOPE: f64 = 0.067;
const BLOOM_BLUR: f64 = 5.0;

const VIGNETTE_BASE: f64 = 0.55;
const VIGNETTE_GAIN: f64 = 0.35;

/// Which of the three drawing regimes a progress sample falls in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Regime {
    /// Background only.
    Blank,
    /// Scan-line reveal with `reveal_progress` in `(0, 1]`.
    Reveal { reveal_progress: f64 },
    /// Bitmap and aurora fading out; `fade` in `(0, 1]`.
    FadeOut { fade: f64 },
}

/// Non-finite progress is treated as 0.
pub fn sanitize_progress(progress: f64) -> f64 {
    if progress.is_finite() { progress } else { 0.0 }
}

pub fn classify(progress: f64) -> Regime {
    let p = sanitize_progress(progress);
    if p > REVEAL_END {
        Regime::FadeOut {
            fade: clamp01((p - REVEAL_END) / FADE_SPAN),
        }
    } else if p <= 0.0 {
        Regime::Blank
    } else {
        Regime::Reveal {
            reveal_progress: reveal_progress(p),
        }
    }
}

/// `clamp(progress / 0.76, 0, 1)`.
pub fn reveal_progress(progress: f64) -> f64 {
    clamp01(sanitize_progress(progress) / REVEAL_END)
}

/// Vertical distance from center inside which scan-lines are open.
pub fn reveal_dist(reveal_progress: f64, height: f64) -> f64 {
    clamp01(reveal_progress) * (height / 2.0) * REVEAL_OVERSHOOT
}

/// One open scan-line band, `[top, top + thickness)` across the full width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanBand {
    pub top: f64,
    pub thickness: f64,
}

impl ScanBand {
    pub fn bottom(&self) -> f64 {
        self.top + self.thickness
    }
}

/// Open bands for a reveal progress. Lines sit at `i * spacing` for `i in 0..ceil(h/spacing)`;
/// a line opens once its distance to the vertical center is below the reveal distance, and its
/// band thickens with age up to `spacing`.
pub fn scan_bands(reveal_progress: f64, height: f64, spacing: f64) -> Vec<ScanBand> {
    if spacing.is_nan() || spacing <= 0.0 || height.is_nan() || height <= 0.0 {
        return Vec::new();
    }
    let center = height / 2.0;
    let max_dist = height / 2.0;
    let dist = reveal_dist(reveal_progress, height);
    let lines = (height / spacing).ceil() as usize;

    let mut bands = Vec::new();
    for i in 0..lines {
        let y = i as f64 * spacing;
        let from_center = (y - center).abs();
        if from_center >= dist {
            continue;
        }
        let age = (dist - from_center) / max_dist;
        let thickness = spacing.min(spacing * age * THICKNESS_GROWTH);
        bands.push(ScanBand {
            top: y - thickness / 2.0,
            thickness,
        });
    }
    bands
}

/// Fractional coverage of each device row by the union of `bands`.
///
/// Bands never overlap (each is at most `spacing` thick and centered on its own line), so
/// per-band overlaps can be summed.
pub fn row_coverage(bands: &[ScanBand], device_rows: u32, dpr: f64) -> Vec<f32> {
    let mut cov = vec![0.0f64; device_rows as usize];
    if dpr.is_nan() || dpr <= 0.0 {
        return vec![0.0; device_rows as usize];
    }
    for band in bands {
        let top = (band.top * dpr).max(0.0);
        let bottom = (band.bottom() * dpr).min(f64::from(device_rows));
        if bottom <= top {
            continue;
        }
        let first = top.floor() as usize;
        let last = (bottom.ceil() as usize).min(device_rows as usize);
        for (row, c) in cov.iter_mut().enumerate().take(last).skip(first) {
            let r0 = row as f64;
            let overlap = bottom.min(r0 + 1.0) - top.max(r0);
            if overlap > 0.0 {
                *c += overlap;
            }
        }
    }
    cov.into_iter().map(|c| c.min(1.0) as f32).collect()
}

/// Glow shadow under the revealed bitmap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Canvas `shadowBlur`, in device pixels.
    pub blur: f64,
    /// Alpha applied to the accent color.
    pub alpha: f64,
}

pub fn glow(reveal_progress: f64) -> Option<Glow> {
    if reveal_progress <= GLOW_START {
        return None;
    }
    let g = clamp01((reveal_progress - GLOW_START) / GLOW_RAMP);
    Some(Glow {
        blur: GLOW_BLUR * g,
        alpha: GLOW_ALPHA * g,
    })
}

/// Blurred low-opacity copy of the bitmap drawn on top of the reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bloom {
    pub alpha: f64,
    /// CSS `blur()` radius in CSS pixels.
    pub blur: f64,
}

pub fn bloom(reveal_progress: f64) -> Option<Bloom> {
    if reveal_progress <= BLOOM_START {
        return None;
    }
    Some(Bloom {
        alpha: (reveal_progress - BLOOM_START) * BLOOM_ALPHA_SLOPE,
        blur: BLOOM_BLUR * reveal_progress,
    })
}

/// Edge alpha of the vignette, `0.55` at the start of the reveal and `0.9` at its end.
pub fn vignette_alpha(reveal_progress: f64) -> f64 {
    VIGNETTE_BASE + clamp01(reveal_progress) * VIGNETTE_GAIN
}
