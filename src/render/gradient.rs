use crate::foundation::core::{Point, ViewportMetrics};
use crate::foundation::math::clamp01;
use crate::render::composite::{PremulRgba8, over, screen};
use crate::render::surface::Surface;

const LUT_SIZE: usize = 256;

/// A gradient color stop: straight `rgb` and a `0..=1` alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub rgb: [u8; 3],
    pub alpha: f64,
}

impl ColorStop {
    pub const fn new(offset: f64, rgb: [u8; 3], alpha: f64) -> Self {
        Self { offset, rgb, alpha }
    }

    fn premul(self) -> [f64; 4] {
        let a = clamp01(self.alpha);
        [
            f64::from(self.rgb[0]) * a,
            f64::from(self.rgb[1]) * a,
            f64::from(self.rgb[2]) * a,
            255.0 * a,
        ]
    }
}

/// How a gradient layer combines with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Screen,
}

/// Two concentric circles in CSS pixels with stops between them.
///
/// Points inside `r0` take the first stop, points beyond `r1` the last (pad extend). Colors are
/// interpolated in premultiplied space.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub r0: f64,
    pub r1: f64,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Point, r0: f64, r1: f64, stops: Vec<ColorStop>) -> Self {
        Self {
            center,
            r0,
            r1,
            stops,
        }
    }

    /// Premultiplied color at gradient parameter `t`.
    pub fn color_at(&self, t: f64) -> PremulRgba8 {
        let Some(first) = self.stops.first() else {
            return [0, 0, 0, 0];
        };
        let t = clamp01(t);
        let mut prev = *first;
        if t <= prev.offset {
            return quantize(prev.premul());
        }
        for &stop in &self.stops[1..] {
            if t <= stop.offset {
                let span = stop.offset - prev.offset;
                let k = if span > 0.0 {
                    (t - prev.offset) / span
                } else {
                    1.0
                };
                let a = prev.premul();
                let b = stop.premul();
                return quantize([
                    a[0] + (b[0] - a[0]) * k,
                    a[1] + (b[1] - a[1]) * k,
                    a[2] + (b[2] - a[2]) * k,
                    a[3] + (b[3] - a[3]) * k,
                ]);
            }
            prev = stop;
        }
        quantize(prev.premul())
    }

    /// Gradient parameter for a CSS-space point.
    pub fn t_at(&self, p: Point) -> f64 {
        let d = (p - self.center).hypot();
        let span = self.r1 - self.r0;
        if span <= 0.0 {
            return if d >= self.r1 { 1.0 } else { 0.0 };
        }
        (d - self.r0) / span
    }

    fn lut(&self) -> Vec<PremulRgba8> {
        (0..LUT_SIZE)
            .map(|i| self.color_at(i as f64 / (LUT_SIZE - 1) as f64))
            .collect()
    }

    /// Paint the gradient over the whole surface, sampling at device pixel centers.
    pub fn paint(&self, dst: &mut Surface, metrics: ViewportMetrics, mode: BlendMode, opacity: f64) {
        let lut = self.lut();
        if lut.iter().all(|px| px[3] == 0) {
            return;
        }
        let inv_dpr = 1.0 / metrics.dpr();
        for y in 0..dst.height() {
            let cy = (f64::from(y) + 0.5) * inv_dpr;
            let row = dst.row_mut(y);
            for (x, d) in row.chunks_exact_mut(4).enumerate() {
                let cx = (x as f64 + 0.5) * inv_dpr;
                let t = clamp01(self.t_at(Point::new(cx, cy)));
                let src = lut[(t * (LUT_SIZE - 1) as f64).round() as usize];
                if src[3] == 0 {
                    continue;
                }
                let cur = [d[0], d[1], d[2], d[3]];
                let out = match mode {
                    BlendMode::Normal => over(cur, src, opacity),
                    BlendMode::Screen => screen(cur, src, opacity),
                };
                d.copy_from_slice(&out);
            }
        }
    }
}

fn quantize(c: [f64; 4]) -> PremulRgba8 {
    let a = c[3].round().clamp(0.0, 255.0);
    let ch = |v: f64| v.round().clamp(0.0, a) as u8;
    [ch(c[0]), ch(c[1]), ch(c[2]), a as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> RadialGradient {
        RadialGradient::new(
            Point::new(5.0, 5.0),
            0.0,
            10.0,
            vec![
                ColorStop::new(0.0, [200, 100, 50], 1.0),
                ColorStop::new(1.0, [0, 0, 0], 0.0),
            ],
        )
    }

    #[test]
    fn endpoints_match_stops() {
        let g = two_stop();
        assert_eq!(g.color_at(0.0), [200, 100, 50, 255]);
        assert_eq!(g.color_at(1.0), [0, 0, 0, 0]);
        assert_eq!(g.color_at(0.5), [100, 50, 25, 128]);
    }

    #[test]
    fn inner_radius_pads_first_stop() {
        let g = RadialGradient::new(
            Point::new(0.0, 0.0),
            4.0,
            8.0,
            vec![
                ColorStop::new(0.0, [0, 0, 0], 0.0),
                ColorStop::new(1.0, [0, 0, 0], 1.0),
            ],
        );
        assert!(g.t_at(Point::new(1.0, 0.0)) < 0.0);
        assert_eq!(g.color_at(g.t_at(Point::new(1.0, 0.0))), [0, 0, 0, 0]);
        assert_eq!(g.color_at(g.t_at(Point::new(20.0, 0.0))), [0, 0, 0, 255]);
        assert!((g.t_at(Point::new(6.0, 0.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn paint_is_brightest_at_center() {
        let metrics = ViewportMetrics::new(10.0, 10.0, 1.0).unwrap();
        let mut s = Surface::filled(
            10,
            10,
            crate::foundation::core::Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
        );
        two_stop().paint(&mut s, metrics, BlendMode::Screen, 1.0);
        let center = s.pixel(5, 5)[0];
        let corner = s.pixel(0, 0)[0];
        assert!(center > corner);
        assert_eq!(s.pixel(0, 0)[3], 255);
    }

    #[test]
    fn zero_opacity_leaves_surface_untouched() {
        let metrics = ViewportMetrics::new(4.0, 4.0, 1.0).unwrap();
        let mut s = Surface::new(4, 4);
        two_stop().paint(&mut s, metrics, BlendMode::Normal, 0.0);
        assert!(s.data().iter().all(|&b| b == 0));
    }
}
