//! Procedural fallback emblem drawn when the logo asset is unavailable.
//!
//! The emblem is a ring medallion around a blackletter "U": cross-hatched disc, outer ring with a
//! radial hatch border, inner ring, the filled glyph with its own engraving hatch, and four dots
//! on the ring.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Circle, Point, Shape};

use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, ViewportMetrics};
use crate::foundation::error::EngraveResult;
use crate::render::composite::{mask_in_place, over_in_place};
use crate::render::raster::VectorLayer;
use crate::render::surface::Surface;

const RADIUS_FRACTION: f64 = 0.22;
const DISC_CLIP: f64 = 0.88;
const BORDER_INNER: f64 = 0.93;
const INNER_RING: f64 = 0.9;
const DOT_RING: f64 = 0.915;
const DOT_RADIUS: f64 = 3.0;
const BORDER_STEP: f64 = 0.04;
const BORDER_TWIST: f64 = 0.015;
const CIRCLE_TOLERANCE: f64 = 0.05;

/// Emblem geometry for a viewport, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmblemGeometry {
    pub center: Point,
    pub radius: f64,
}

impl EmblemGeometry {
    pub fn for_viewport(metrics: ViewportMetrics) -> Self {
        Self {
            center: Point::new(metrics.width() / 2.0, metrics.height() / 2.0),
            radius: metrics.width().min(metrics.height()) * RADIUS_FRACTION,
        }
    }

    /// The four dot centers at 0, 90, 180 and 270 degrees.
    pub fn dot_centers(&self) -> [Point; 4] {
        [0.0, FRAC_PI_2, PI, PI * 1.5].map(|angle: f64| {
            Point::new(
                self.center.x + angle.cos() * self.radius * DOT_RING,
                self.center.y + angle.sin() * self.radius * DOT_RING,
            )
        })
    }
}

/// Blackletter "U": outer contour clockwise from the left thorn, around the bowl, up to the
/// forked right tip, then the inner contour counter-clockwise back up the left side.
pub fn glyph_path(center: Point, s: f64) -> BezPath {
    let p = |x: f64, y: f64| Point::new(center.x + x * s, center.y + y * s);
    let mut path = BezPath::new();

    path.move_to(p(-0.40, -0.62));
    path.curve_to(p(-0.32, -0.48), p(-0.30, -0.30), p(-0.30, 0.08));
    path.curve_to(p(-0.30, 0.40), p(-0.16, 0.56), p(0.00, 0.56));
    path.curve_to(p(0.16, 0.56), p(0.30, 0.40), p(0.30, 0.08));
    path.curve_to(p(0.30, -0.28), p(0.30, -0.44), p(0.24, -0.54));
    path.line_to(p(0.27, -0.66));
    path.line_to(p(0.40, -0.50));
    path.line_to(p(0.32, -0.42));

    path.curve_to(p(0.25, -0.30), p(0.22, -0.15), p(0.22, 0.08));
    path.curve_to(p(0.22, 0.32), p(0.12, 0.45), p(0.00, 0.45));
    path.curve_to(p(-0.12, 0.45), p(-0.22, 0.32), p(-0.22, 0.08));
    path.curve_to(p(-0.22, -0.15), p(-0.22, -0.32), p(-0.28, -0.46));
    path.close_path();
    path
}

fn line(a: Point, b: Point) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(a);
    p.line_to(b);
    p
}

fn circle(center: Point, r: f64) -> BezPath {
    Circle::new(center, r).to_path(CIRCLE_TOLERANCE)
}

/// Render the emblem into a transparent device-size surface.
#[tracing::instrument(skip(accent))]
pub fn render_emblem(metrics: ViewportMetrics, accent: Color) -> EngraveResult<Surface> {
    let geo = EmblemGeometry::for_viewport(metrics);
    let (cx, cy) = (geo.center.x, geo.center.y);
    let radius = geo.radius;
    let [r, g, b, _] = accent.to_rgba8();
    let solid = [r, g, b, 255];
    let faint = |alpha: f64| accent.with_alpha(alpha).to_rgba8();

    let (w, h) = metrics.device_size();
    let mut out = Surface::new(w, h);

    // Disc hatching, clipped to the inner disc.
    let mut hatch = VectorLayer::new(metrics)?;
    let disc_line = faint(0.06);
    let mut y = cy - radius;
    while y < cy + radius {
        hatch.stroke(
            &line(Point::new(cx - radius, y), Point::new(cx + radius, y)),
            0.5,
            disc_line,
        );
        y += 3.0;
    }
    let mut y = cy - radius;
    while y < cy + radius {
        hatch.stroke(
            &line(
                Point::new(cx - radius, y),
                Point::new(cx + radius, y - radius * 0.3),
            ),
            0.5,
            disc_line,
        );
        y += 5.0;
    }
    let mut hatch = hatch.finish();
    let mut disc = VectorLayer::new(metrics)?;
    disc.fill(&circle(geo.center, radius * DISC_CLIP), [255, 255, 255, 255]);
    mask_in_place(&mut hatch, &disc.finish());
    over_in_place(&mut out, &hatch, 1.0);

    // Rings, border hatch and the glyph body.
    let mut body = VectorLayer::new(metrics)?;
    body.stroke(&circle(geo.center, radius), 2.0, solid);
    let border = faint(0.3);
    let inner_r = radius * BORDER_INNER;
    let mut angle = 0.0f64;
    while angle < TAU {
        let a = Point::new(cx + angle.cos() * inner_r, cy + angle.sin() * inner_r);
        let b = Point::new(
            cx + (angle + BORDER_TWIST).cos() * radius,
            cy + (angle + BORDER_TWIST).sin() * radius,
        );
        body.stroke(&line(a, b), 0.5, border);
        angle += BORDER_STEP;
    }
    body.stroke(&circle(geo.center, radius * INNER_RING), 1.0, solid);
    let glyph = glyph_path(geo.center, radius);
    body.fill(&glyph, solid);
    over_in_place(&mut out, &body.finish(), 1.0);

    // Engraving hatch inside the glyph: primary diagonals, then lighter counter-diagonals.
    let s = radius;
    let mut engraving = VectorLayer::new(metrics)?;
    let primary = faint(0.18);
    let mut i = -2.0 * s;
    while i < 2.0 * s {
        engraving.stroke(
            &line(Point::new(cx - s + i, cy + s), Point::new(cx + i, cy - s)),
            0.6,
            primary,
        );
        i += 3.0;
    }
    let secondary = faint(0.08);
    let mut i = -2.0 * s;
    while i < 2.0 * s {
        engraving.stroke(
            &line(Point::new(cx + s + i, cy + s), Point::new(cx + i, cy - s)),
            0.4,
            secondary,
        );
        i += 5.0;
    }
    let mut engraving = engraving.finish();
    let mut glyph_mask = VectorLayer::new(metrics)?;
    glyph_mask.fill(&glyph, [255, 255, 255, 255]);
    mask_in_place(&mut engraving, &glyph_mask.finish());
    over_in_place(&mut out, &engraving, 1.0);

    let mut dots = VectorLayer::new(metrics)?;
    for c in geo.dot_centers() {
        dots.fill(&circle(c, DOT_RADIUS), solid);
    }
    over_in_place(&mut out, &dots.finish(), 1.0);

    Ok(out)
}
