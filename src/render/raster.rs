use kurbo::{PathEl, Stroke, StrokeOpts};

use crate::foundation::core::{BezPath, ViewportMetrics};
use crate::foundation::error::{EngraveError, EngraveResult};
use crate::render::surface::Surface;

const STROKE_TOLERANCE: f64 = 0.05;

/// A transparent device-size layer that vector paths are filled into with `vello_cpu`.
///
/// Paths are given in CSS pixels; the layer applies the device pixel ratio. Draw calls composite
/// source-over in issue order.
pub(crate) struct VectorLayer {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl VectorLayer {
    pub(crate) fn new(metrics: ViewportMetrics) -> EngraveResult<Self> {
        let (w, h) = metrics.device_size();
        let width: u16 = w
            .try_into()
            .map_err(|_| EngraveError::render("layer width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| EngraveError::render("layer height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(affine_to_cpu(metrics.css_to_device()));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(Self { ctx, width, height })
    }

    /// Fill with a straight-alpha RGBA8 color.
    pub(crate) fn fill(&mut self, path: &BezPath, rgba: [u8; 4]) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke by expanding the outline on the CPU and filling it.
    pub(crate) fn stroke(&mut self, path: &BezPath, width: f64, rgba: [u8; 4]) {
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &Stroke::new(width),
            &StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        self.fill(&outline, rgba);
    }

    pub(crate) fn finish(mut self) -> Surface {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let data = pixmap.data_as_u8_slice().to_vec();
        Surface::from_premul_bytes(u32::from(self.width), u32::from(self.height), data)
            .unwrap_or_else(|| Surface::new(u32::from(self.width), u32::from(self.height)))
    }
}

fn affine_to_cpu(a: crate::foundation::core::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};

    #[test]
    fn fills_inside_and_leaves_outside_transparent() {
        let metrics = ViewportMetrics::new(16.0, 16.0, 1.0).unwrap();
        let mut layer = VectorLayer::new(metrics).unwrap();
        layer.fill(&Rect::new(4.0, 4.0, 12.0, 12.0).to_path(0.1), [255, 0, 0, 255]);
        let s = layer.finish();
        assert_eq!(s.size(), (16, 16));
        assert_eq!(s.pixel(8, 8), [255, 0, 0, 255]);
        assert_eq!(s.pixel(1, 1)[3], 0);
    }

    #[test]
    fn dpr_scales_geometry() {
        let metrics = ViewportMetrics::new(8.0, 8.0, 2.0).unwrap();
        let mut layer = VectorLayer::new(metrics).unwrap();
        layer.fill(&Rect::new(0.0, 0.0, 4.0, 4.0).to_path(0.1), [0, 0, 255, 255]);
        let s = layer.finish();
        assert_eq!(s.size(), (16, 16));
        assert_eq!(s.pixel(6, 6)[3], 255);
        assert_eq!(s.pixel(10, 10)[3], 0);
    }

    #[test]
    fn stroke_covers_the_line() {
        let metrics = ViewportMetrics::new(16.0, 16.0, 1.0).unwrap();
        let mut layer = VectorLayer::new(metrics).unwrap();
        let mut p = BezPath::new();
        p.move_to((0.0, 8.0));
        p.line_to((16.0, 8.0));
        layer.stroke(&p, 2.0, [255, 255, 255, 255]);
        let s = layer.finish();
        assert!(s.pixel(8, 7)[3] > 200);
        assert_eq!(s.pixel(8, 2)[3], 0);
    }
}
