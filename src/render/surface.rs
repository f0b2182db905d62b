use crate::foundation::core::{PixelRect, Rgba8Premul, unpremul_channel};

/// Premultiplied RGBA8 raster in device pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let mut s = Self::new(width, height);
        s.fill(color);
        s
    }

    /// Wrap premultiplied bytes; `None` if the length does not match.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.index(0, y);
        &self.data[start..start + (self.width as usize) * 4]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = self.index(0, y);
        let w = self.width as usize;
        &mut self.data[start..start + w * 4]
    }

    /// Bounding box of pixels with non-zero alpha.
    pub fn content_bounds(&self) -> Option<PixelRect> {
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
        for y in 0..self.height {
            for (x, px) in self.row(y).chunks_exact(4).enumerate() {
                if px[3] != 0 {
                    let x = x as u32;
                    x0 = x0.min(x);
                    y0 = y0.min(y);
                    x1 = x1.max(x + 1);
                    y1 = y1.max(y + 1);
                }
            }
        }
        (x0 != u32::MAX).then(|| PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Copy a sub-rectangle; the rectangle is clamped to the surface.
    pub fn crop(&self, rect: PixelRect) -> Surface {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let w = rect.width.min(self.width - x0);
        let h = rect.height.min(self.height - y0);
        let mut out = Surface::new(w, h);
        for row in 0..h {
            let src_start = self.index(x0, y0 + row);
            let len = (w as usize) * 4;
            out.row_mut(row)
                .copy_from_slice(&self.data[src_start..src_start + len]);
        }
        out
    }

    /// Straight-alpha copy of the pixels, suitable for PNG encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 255 {
                continue;
            }
            px[0] = unpremul_channel(px[0], a);
            px[1] = unpremul_channel(px[1], a);
            px[2] = unpremul_channel(px[2], a);
        }
        out
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}
