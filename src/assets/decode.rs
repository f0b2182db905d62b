use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{EngraveError, EngraveResult};

/// A decoded logo, kept in its source form so it can be re-rasterized at any viewport size.
#[derive(Clone)]
pub enum LogoImage {
    /// Straight-alpha RGBA8 raster.
    Raster(Arc<image::RgbaImage>),
    /// Parsed SVG document.
    Vector(Arc<usvg::Tree>),
}

impl LogoImage {
    /// Intrinsic size in CSS pixels.
    pub fn size(&self) -> (f64, f64) {
        match self {
            Self::Raster(img) => (f64::from(img.width()), f64::from(img.height())),
            Self::Vector(tree) => (
                f64::from(tree.size().width()),
                f64::from(tree.size().height()),
            ),
        }
    }
}

impl std::fmt::Debug for LogoImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.size();
        match self {
            Self::Raster(_) => write!(f, "LogoImage::Raster({w}x{h})"),
            Self::Vector(_) => write!(f, "LogoImage::Vector({w}x{h})"),
        }
    }
}

fn looks_like_svg(path_hint: &str, bytes: &[u8]) -> bool {
    if path_hint.to_ascii_lowercase().ends_with(".svg") {
        return true;
    }
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Decode logo bytes; SVG is detected from the path or the leading markup.
pub fn decode_logo(path_hint: &str, bytes: &[u8]) -> EngraveResult<LogoImage> {
    if looks_like_svg(path_hint, bytes) {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .with_context(|| format!("parse svg logo '{path_hint}'"))?;
        let size = tree.size();
        if size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(EngraveError::asset("svg logo has an empty size"));
        }
        return Ok(LogoImage::Vector(Arc::new(tree)));
    }

    let img = image::load_from_memory(bytes)
        .with_context(|| format!("decode logo image '{path_hint}'"))?
        .to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(EngraveError::asset("logo image has no pixels"));
    }
    Ok(LogoImage::Raster(Arc::new(img)))
}

/// Rasterize a logo to straight-alpha RGBA8 at exactly `width x height` pixels.
pub fn rasterize_logo(logo: &LogoImage, width: u32, height: u32) -> EngraveResult<image::RgbaImage> {
    if width == 0 || height == 0 {
        return Ok(image::RgbaImage::new(width, height));
    }
    match logo {
        LogoImage::Raster(img) => {
            if img.width() == width && img.height() == height {
                return Ok(img.as_ref().clone());
            }
            Ok(image::imageops::resize(
                img.as_ref(),
                width,
                height,
                image::imageops::FilterType::Triangle,
            ))
        }
        LogoImage::Vector(tree) => {
            let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
                .ok_or_else(|| EngraveError::render("failed to allocate svg pixmap"))?;
            let sx = (width as f32) / tree.size().width();
            let sy = (height as f32) / tree.size().height();
            resvg::render(
                tree,
                resvg::tiny_skia::Transform::from_scale(sx, sy),
                &mut pixmap.as_mut(),
            );
            let mut data = pixmap.data().to_vec();
            demultiply_rgba8_in_place(&mut data);
            image::RgbaImage::from_raw(width, height, data)
                .ok_or_else(|| EngraveError::render("svg raster size mismatch"))
        }
    }
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = crate::foundation::core::unpremul_channel(*c, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png_as_straight_rgba() {
        let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
        let logo = decode_logo("assets/logo.png", &png_bytes(img)).unwrap();
        let LogoImage::Raster(r) = &logo else {
            panic!("expected raster");
        };
        assert_eq!(r.get_pixel(0, 0).0, [100, 50, 200, 128]);
        assert_eq!(logo.size(), (1.0, 1.0));
    }

    #[test]
    fn decodes_svg_by_content() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#fff"/></svg>"##;
        let logo = decode_logo("assets/logo.bin", svg).unwrap();
        assert!(matches!(logo, LogoImage::Vector(_)));
        assert_eq!(logo.size(), (20.0, 10.0));

        let raster = rasterize_logo(&logo, 40, 20).unwrap();
        assert_eq!(raster.dimensions(), (40, 20));
        assert_eq!(raster.get_pixel(20, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_logo("assets/logo.webp", b"not an image").is_err());
        assert!(decode_logo("assets/logo.svg", b"<svg").is_err());
    }

    #[test]
    fn resizes_rasters() {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([9, 9, 9, 255]));
        let logo = LogoImage::Raster(Arc::new(img));
        let out = rasterize_logo(&logo, 2, 3).unwrap();
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.get_pixel(1, 1).0, [9, 9, 9, 255]);
    }
}
