use crate::foundation::math::{mul_div255_u8, opacity_u8};
use crate::render::surface::Surface;

pub type PremulRgba8 = [u8; 4];

/// Source-over with an extra global opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f64) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Screen blend (`s + d - s*d` on premultiplied channels) with an extra global opacity.
pub fn screen(dst: PremulRgba8, src: PremulRgba8, opacity: f64) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let mut out = [0u8; 4];
    for i in 0..4 {
        let s = mul_div255_u8(u16::from(src[i]), op);
        let d = dst[i];
        let sd = mul_div255_u8(u16::from(s), u16::from(d));
        out[i] = (u16::from(s) + u16::from(d) - u16::from(sd)).min(255) as u8;
    }
    out
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`; pixels outside `dst` are
/// dropped.
pub fn over_at(dst: &mut Surface, src: &Surface, x: u32, y: u32, opacity: f64) {
    if opacity_u8(opacity) == 0 || x >= dst.width() || y >= dst.height() {
        return;
    }
    let w = src.width().min(dst.width() - x) as usize;
    let h = src.height().min(dst.height() - y);
    for row in 0..h {
        let s_row = &src.row(row)[..w * 4];
        let d_row = &mut dst.row_mut(y + row)[(x as usize) * 4..(x as usize + w) * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
            d.copy_from_slice(&out);
        }
    }
}

pub fn over_in_place(dst: &mut Surface, src: &Surface, opacity: f64) {
    over_at(dst, src, 0, 0, opacity);
}

/// Multiply every pixel of `dst` by the alpha of the matching `mask` pixel (destination-in).
pub fn mask_in_place(dst: &mut Surface, mask: &Surface) {
    for (d, m) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(mask.data().chunks_exact(4))
    {
        let ma = u16::from(m[3]);
        if ma == 255 {
            continue;
        }
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), ma);
        }
    }
}

/// Scale each row of `layer` by a coverage factor in `[0, 1]`; `first_row` is the index of the
/// layer's row 0 in `coverage`.
pub fn row_coverage_in_place(layer: &mut Surface, coverage: &[f32], first_row: u32) {
    for y in 0..layer.height() {
        let cov = coverage
            .get((first_row + y) as usize)
            .copied()
            .unwrap_or(0.0);
        let k = opacity_u8(f64::from(cov));
        if k == 255 {
            continue;
        }
        for c in layer.row_mut(y).iter_mut() {
            *c = mul_div255_u8(u16::from(*c), k);
        }
    }
}

/// Replace every pixel by `color` scaled with the source alpha (a canvas shadow fill).
pub fn colorize_alpha(src: &Surface, color: PremulRgba8) -> Surface {
    let mut out = Surface::new(src.width(), src.height());
    for (d, s) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(src.data().chunks_exact(4))
    {
        let a = u16::from(s[3]);
        for i in 0..4 {
            d[i] = mul_div255_u8(u16::from(color[i]), a);
        }
    }
    out
}
