use crate::assets::decode::LogoImage;
use crate::foundation::color::Color;
use crate::foundation::core::{PixelRect, ViewportMetrics};
use crate::foundation::error::EngraveResult;
use crate::render::emblem::render_emblem;
use crate::render::surface::Surface;
use crate::render::tint::render_tinted_logo;

/// Which source a [`TintedBitmap`] was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapVariant {
    Logo,
    Emblem,
}

/// Pre-rendered accent-colored artwork at device resolution for one set of metrics.
///
/// Rebuilt wholesale on resize or logo load; never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct TintedBitmap {
    surface: Surface,
    variant: BitmapVariant,
    metrics: ViewportMetrics,
    bounds: Option<PixelRect>,
}

impl TintedBitmap {
    fn from_surface(surface: Surface, variant: BitmapVariant, metrics: ViewportMetrics) -> Self {
        let bounds = surface.content_bounds();
        Self {
            surface,
            variant,
            metrics,
            bounds,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn variant(&self) -> BitmapVariant {
        self.variant
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    /// Bounding box of the non-transparent pixels, `None` for an empty bitmap.
    pub fn bounds(&self) -> Option<PixelRect> {
        self.bounds
    }
}

#[tracing::instrument(skip(logo, accent))]
pub fn prepare_logo(
    logo: &LogoImage,
    metrics: ViewportMetrics,
    accent: Color,
) -> EngraveResult<TintedBitmap> {
    let surface = render_tinted_logo(logo, metrics, accent)?;
    Ok(TintedBitmap::from_surface(
        surface,
        BitmapVariant::Logo,
        metrics,
    ))
}

#[tracing::instrument(skip(accent))]
pub fn prepare_emblem(metrics: ViewportMetrics, accent: Color) -> EngraveResult<TintedBitmap> {
    let surface = render_emblem(metrics, accent)?;
    Ok(TintedBitmap::from_surface(
        surface,
        BitmapVariant::Emblem,
        metrics,
    ))
}
