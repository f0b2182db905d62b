use std::sync::Arc;

use engrave::render::aurora::paint_vignette;
use engrave::render::reveal::{reveal_dist, reveal_progress, scan_bands};
use engrave::{EngraveError, EngravingConfig, EngravingRenderer, LogoImage, Surface, ViewportMetrics};
use proptest::prelude::*;

fn metrics(w: f64, h: f64, dpr: f64) -> ViewportMetrics {
    ViewportMetrics::new(w, h, dpr).unwrap()
}

fn ring_logo() -> LogoImage {
    let img = image::RgbaImage::from_fn(16, 16, |x, y| {
        let dx = f64::from(x) - 7.5;
        let dy = f64::from(y) - 7.5;
        let d = (dx * dx + dy * dy).sqrt();
        if (4.0..7.0).contains(&d) {
            image::Rgba([240, 240, 240, 255])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });
    LogoImage::Raster(Arc::new(img))
}

fn renderer(m: ViewportMetrics) -> EngravingRenderer {
    let mut r = EngravingRenderer::new(EngravingConfig::default(), m);
    let ticket = r.begin_logo_load();
    assert!(r.complete_logo_load(ticket, Ok(ring_logo())));
    r
}

fn background(m: ViewportMetrics) -> Surface {
    let (w, h) = m.device_size();
    Surface::filled(w, h, EngravingConfig::default().background.to_rgba8_premul())
}

#[test]
fn progress_zero_is_flat_background() {
    let m = metrics(120.0, 80.0, 1.5);
    let mut r = renderer(m);
    r.draw(0.4);
    r.draw(0.0);
    assert_eq!(r.frame().data(), background(m).data());

    r.draw(-3.0);
    assert_eq!(r.frame().data(), background(m).data());
    r.draw(f64::NAN);
    assert_eq!(r.frame().data(), background(m).data());
}

#[test]
fn progress_one_is_background_and_full_vignette() {
    let m = metrics(120.0, 80.0, 1.0);
    let mut r = renderer(m);
    r.draw(1.0);

    let mut expected = background(m);
    paint_vignette(&mut expected, m, 0.9);
    assert_eq!(r.frame().data(), expected.data());

    // Past the end is the same frame.
    r.draw(7.0);
    assert_eq!(r.frame().data(), expected.data());
}

#[test]
fn fade_out_sits_between_reveal_and_end() {
    let m = metrics(120.0, 80.0, 1.0);
    let mut r = renderer(m);
    r.draw(0.88);
    let mut end = background(m);
    paint_vignette(&mut end, m, 0.9);
    assert_ne!(r.frame().data(), end.data());
}

#[test]
fn full_reveal_opens_every_line_at_0_76() {
    let h = 100.0;
    let rp = reveal_progress(0.76);
    assert_eq!(rp, 1.0);
    assert!((reveal_dist(rp, h) - 1.3 * h / 2.0).abs() < 1e-12);

    let bands = scan_bands(rp, h, 3.0);
    assert_eq!(bands.len(), (h / 3.0).ceil() as usize);
    let center = bands
        .iter()
        .find(|b| (b.top + b.thickness / 2.0 - 51.0).abs() < 1e-9)
        .unwrap();
    assert_eq!(center.thickness, 3.0);
}

proptest! {
    #[test]
    fn reveal_dist_is_monotonic(a in 0.0f64..=0.76, b in 0.0f64..=0.76, h in 1.0f64..4000.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(reveal_dist(reveal_progress(lo), h) <= reveal_dist(reveal_progress(hi), h));
    }
}

#[test]
fn resize_matches_fresh_renderer() {
    let mut r = renderer(metrics(120.0, 80.0, 1.0));
    r.draw(0.5);

    let next = metrics(90.0, 140.0, 2.0);
    r.resize(next);
    assert_eq!(r.frame().size(), next.device_size());
    assert_eq!(r.bitmap().unwrap().metrics(), next);

    let mut fresh = renderer(next);
    fresh.draw(0.5);
    assert_eq!(r.frame().data(), fresh.frame().data());

    r.draw(0.3);
    fresh.draw(0.3);
    assert_eq!(r.frame().data(), fresh.frame().data());
}

#[test]
fn rendering_is_deterministic() {
    let m = metrics(100.0, 70.0, 1.0);
    for p in [0.1, 0.45, 0.7, 0.9] {
        let mut a = renderer(m);
        let mut b = renderer(m);
        a.draw(p);
        b.draw(p);
        assert_eq!(a.frame().data(), b.frame().data(), "progress {p}");
    }
}

#[test]
fn stale_logo_never_replaces_newer_result() {
    let m = metrics(100.0, 70.0, 1.0);
    let mut r = EngravingRenderer::new(EngravingConfig::default(), m);
    let first = r.begin_logo_load();
    let second = r.begin_logo_load();
    assert!(r.complete_logo_load(second, Err(EngraveError::asset("offline"))));
    r.draw(0.5);
    let emblem_frame = r.frame().data().to_vec();

    assert!(!r.complete_logo_load(first, Ok(ring_logo())));
    r.draw(0.5);
    assert_eq!(r.frame().data(), emblem_frame.as_slice());
}
