//! The hero "engraving reveal" renderer.
//!
//! [`EngravingRenderer::draw`] repaints the whole frame from a single progress value:
//!
//! - `progress <= 0`: background only.
//! - `0 < progress <= 0.76`: the tinted bitmap is revealed through horizontal scan-line bands
//!   opening outward from the vertical center, with an accent glow, a blurred bloom copy, the
//!   screen-blended aurora and a vignette layered on top.
//! - `progress > 0.76`: the bitmap and aurora fade out together over a full-strength vignette.
//!
//! The renderer owns exactly one [`TintedBitmap`], rebuilt on resize and when the logo load
//! resolves. Logo loads are asynchronous to the frame loop; each one is identified by a
//! [`LogoTicket`] and a result arriving for a superseded ticket is dropped.

use crate::assets::decode::LogoImage;
use crate::foundation::color::Color;
use crate::foundation::core::ViewportMetrics;
use crate::foundation::error::EngraveResult;
use crate::render::aurora::{paint_aurora, paint_vignette};
use crate::render::bitmap::{TintedBitmap, prepare_emblem, prepare_logo};
use crate::render::blur::{gaussian_blur, radius_for_sigma};
use crate::render::composite::{colorize_alpha, over_at, over_in_place, row_coverage_in_place};
use crate::render::reveal::{
    Regime, bloom, classify, glow, row_coverage, sanitize_progress, scan_bands, vignette_alpha,
};
use crate::render::surface::Surface;

/// Colors and scan-line spacing for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngravingConfig {
    pub accent: Color,
    pub background: Color,
    /// Distance between scan-lines in CSS pixels.
    pub line_spacing: f64,
}

impl Default for EngravingConfig {
    fn default() -> Self {
        Self {
            accent: Color::from_rgb8(0xC9, 0xA9, 0x6E),
            background: Color::from_rgb8(0x0A, 0x0A, 0x0A),
            line_spacing: 3.0,
        }
    }
}

/// Identifies one logo load; only the most recent ticket is honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogoTicket(u64);

#[derive(Clone, Debug)]
enum LogoState {
    Pending,
    Loaded(LogoImage),
    Failed,
}

pub struct EngravingRenderer {
    config: EngravingConfig,
    metrics: ViewportMetrics,
    logo: LogoState,
    bitmap: Option<TintedBitmap>,
    frame: Surface,
    last_progress: f64,
    generation: u64,
}

impl EngravingRenderer {
    /// A renderer with no bitmap yet; `draw` is a no-op until a logo load resolves.
    pub fn new(config: EngravingConfig, metrics: ViewportMetrics) -> Self {
        let (w, h) = metrics.device_size();
        Self {
            config,
            metrics,
            logo: LogoState::Pending,
            bitmap: None,
            frame: Surface::new(w, h),
            last_progress: 0.0,
            generation: 0,
        }
    }

    pub fn config(&self) -> &EngravingConfig {
        &self.config
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    /// The last painted frame, premultiplied RGBA8 at device size.
    pub fn frame(&self) -> &Surface {
        &self.frame
    }

    pub fn bitmap(&self) -> Option<&TintedBitmap> {
        self.bitmap.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn last_progress(&self) -> f64 {
        self.last_progress
    }

    /// Start a logo load, superseding any load still in flight.
    pub fn begin_logo_load(&mut self) -> LogoTicket {
        self.generation += 1;
        self.logo = LogoState::Pending;
        LogoTicket(self.generation)
    }

    /// Resolve a logo load. A failed load selects the fallback emblem. Returns `false` if the
    /// ticket was superseded and the result was dropped.
    pub fn complete_logo_load(
        &mut self,
        ticket: LogoTicket,
        result: EngraveResult<LogoImage>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale logo load"
            );
            return false;
        }
        self.logo = match result {
            Ok(logo) => {
                let (w, h) = logo.size();
                tracing::debug!(width = w, height = h, "logo loaded");
                LogoState::Loaded(logo)
            }
            Err(err) => {
                tracing::warn!(error = %err, "logo failed to load; drawing fallback emblem");
                LogoState::Failed
            }
        };
        self.rebuild_bitmap();
        self.draw(self.last_progress);
        true
    }

    /// Adopt new viewport metrics: reallocate the frame, rebuild the bitmap at the new
    /// resolution and repaint the last progress.
    pub fn resize(&mut self, metrics: ViewportMetrics) {
        self.metrics = metrics;
        let (w, h) = metrics.device_size();
        self.frame = Surface::new(w, h);
        self.bitmap = None;
        self.rebuild_bitmap();
        self.draw(self.last_progress);
    }

    /// Install a prepared bitmap. One built for other metrics is dropped.
    pub fn install_bitmap(&mut self, bitmap: TintedBitmap) -> bool {
        if bitmap.metrics() != self.metrics {
            tracing::debug!(
                bitmap = ?bitmap.metrics(),
                current = ?self.metrics,
                "discarding bitmap built for stale metrics"
            );
            return false;
        }
        self.bitmap = Some(bitmap);
        true
    }

    fn rebuild_bitmap(&mut self) {
        let accent = self.config.accent;
        let built = match &self.logo {
            LogoState::Pending => return,
            LogoState::Loaded(logo) => prepare_logo(logo, self.metrics, accent).or_else(|err| {
                tracing::warn!(error = %err, "tinting logo failed; drawing fallback emblem");
                prepare_emblem(self.metrics, accent)
            }),
            LogoState::Failed => prepare_emblem(self.metrics, accent),
        };
        match built {
            Ok(bitmap) => {
                self.install_bitmap(bitmap);
            }
            Err(err) => tracing::warn!(error = %err, "failed to prepare engraving bitmap"),
        }
    }

    /// Repaint the frame for `progress`. Does nothing until a bitmap is installed.
    pub fn draw(&mut self, progress: f64) {
        let progress = sanitize_progress(progress);
        self.last_progress = progress;
        let Some(bitmap) = &self.bitmap else {
            return;
        };
        let metrics = self.metrics;

        self.frame.fill(self.config.background.to_rgba8_premul());
        match classify(progress) {
            Regime::Blank => {}
            Regime::FadeOut { fade } => {
                let remaining = 1.0 - fade;
                over_in_place(&mut self.frame, bitmap.surface(), remaining);
                paint_aurora(&mut self.frame, metrics, 1.0, remaining);
                // Held at full strength so the end frame is background plus vignette.
                paint_vignette(&mut self.frame, metrics, vignette_alpha(1.0));
            }
            Regime::Reveal { reveal_progress } => {
                paint_reveal(&mut self.frame, bitmap, &self.config, reveal_progress);
                paint_aurora(&mut self.frame, metrics, reveal_progress, 1.0);
                paint_vignette(&mut self.frame, metrics, vignette_alpha(reveal_progress));
            }
        }
    }
}

/// Scan-line clipped bitmap with its glow shadow, then the bloom copy.
///
/// Work is confined to the bitmap's content bounds grown by the blur radius.
fn paint_reveal(
    frame: &mut Surface,
    bitmap: &TintedBitmap,
    config: &EngravingConfig,
    reveal_progress: f64,
) {
    let Some(bounds) = bitmap.bounds() else {
        return;
    };
    let metrics = bitmap.metrics();
    let (dw, dh) = frame.size();

    let bands = scan_bands(reveal_progress, metrics.height(), config.line_spacing);
    let coverage = row_coverage(&bands, dh, metrics.dpr());

    // Canvas shadowBlur is a device-space blur with sigma = blur / 2.
    let glow = glow(reveal_progress);
    let shadow_sigma = glow.map_or(0.0, |g| g.blur / 2.0);
    let region = bounds.expand_within(radius_for_sigma(shadow_sigma), dw, dh);
    let art = bitmap.surface().crop(region);
    let mut layer = Surface::new(region.width, region.height);
    if let Some(g) = glow {
        let color = config.accent.with_alpha(g.alpha).to_rgba8_premul().to_array();
        let shadow = gaussian_blur(&colorize_alpha(&art, color), shadow_sigma);
        over_in_place(&mut layer, &shadow, 1.0);
    }
    over_in_place(&mut layer, &art, 1.0);
    row_coverage_in_place(&mut layer, &coverage, region.y);
    over_at(frame, &layer, region.x, region.y, 1.0);

    if let Some(b) = bloom(reveal_progress) {
        let sigma = b.blur * metrics.dpr();
        let region = bounds.expand_within(radius_for_sigma(sigma), dw, dh);
        let blurred = gaussian_blur(&bitmap.surface().crop(region), sigma);
        over_at(frame, &blurred, region.x, region.y, b.alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::EngraveError;
    use crate::render::bitmap::BitmapVariant;

    fn metrics() -> ViewportMetrics {
        ViewportMetrics::new(90.0, 60.0, 1.0).unwrap()
    }

    fn white_logo() -> LogoImage {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 255]));
        LogoImage::Raster(std::sync::Arc::new(img))
    }

    fn ready_renderer() -> EngravingRenderer {
        let mut r = EngravingRenderer::new(EngravingConfig::default(), metrics());
        let t = r.begin_logo_load();
        assert!(r.complete_logo_load(t, Ok(white_logo())));
        r
    }

    #[test]
    fn draw_is_noop_until_ready() {
        let mut r = EngravingRenderer::new(EngravingConfig::default(), metrics());
        r.draw(0.5);
        assert!(!r.is_ready());
        assert!(r.frame().data().iter().all(|&b| b == 0));
        assert_eq!(r.last_progress(), 0.5);
    }

    #[test]
    fn failed_load_converges_to_emblem() {
        let mut r = EngravingRenderer::new(EngravingConfig::default(), metrics());
        let t = r.begin_logo_load();
        r.complete_logo_load(t, Err(EngraveError::asset("404")));
        assert!(r.is_ready());
        assert_eq!(r.bitmap().unwrap().variant(), BitmapVariant::Emblem);
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut r = EngravingRenderer::new(EngravingConfig::default(), metrics());
        let old = r.begin_logo_load();
        let new = r.begin_logo_load();
        assert!(!r.complete_logo_load(old, Ok(white_logo())));
        assert!(!r.is_ready());
        assert!(r.complete_logo_load(new, Err(EngraveError::asset("gone"))));
        assert_eq!(r.bitmap().unwrap().variant(), BitmapVariant::Emblem);
    }

    #[test]
    fn bitmap_for_other_metrics_is_rejected() {
        let mut r = ready_renderer();
        let other = ViewportMetrics::new(10.0, 10.0, 1.0).unwrap();
        let bm = prepare_emblem(other, Color::from_rgb8(1, 2, 3)).unwrap();
        assert!(!r.install_bitmap(bm));
        assert_eq!(r.bitmap().unwrap().variant(), BitmapVariant::Logo);
    }

    #[test]
    fn reveal_exposes_center_but_not_outside_open_lines() {
        let mut r = ready_renderer();
        r.draw(0.76);
        // Logo is 27x27 centered; the center pixel sits on an open band.
        let center = r.frame().pixel(45, 30);
        assert!(center[0] > 100, "center should show the tinted logo, got {center:?}");

        r.draw(0.0);
        assert_eq!(r.frame().pixel(45, 30), [10, 10, 10, 255]);
    }

    #[test]
    fn draw_is_idempotent() {
        let mut r = ready_renderer();
        r.draw(0.5);
        let a = r.frame().clone();
        r.draw(0.9);
        r.draw(0.5);
        assert_eq!(&a, r.frame());
    }

    #[test]
    fn resize_rebuilds_and_redraws_last_progress() {
        let mut r = ready_renderer();
        r.draw(0.4);
        let bigger = ViewportMetrics::new(120.0, 80.0, 2.0).unwrap();
        r.resize(bigger);
        assert_eq!(r.frame().size(), (240, 160));
        assert_eq!(r.bitmap().unwrap().metrics(), bigger);
        assert!((r.last_progress() - 0.4).abs() < 1e-12);
        assert_eq!(r.frame().pixel(0, 0)[3], 255);
    }
}
