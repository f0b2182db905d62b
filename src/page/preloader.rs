use crate::animation::smooth::{PRELOADER_FACTOR, SmoothedScalar};

/// Bar value above which loading counts as finished.
pub const FINISH_THRESHOLD: f64 = 99.5;
/// Delay between finishing and hiding the overlay.
pub const HIDE_DELAY_MS: f64 = 400.0;
/// Delay between hiding the overlay and announcing completion.
pub const DONE_DELAY_MS: f64 = 600.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloaderEvent {
    /// The bar reached the end; it now reads 100%.
    Finished,
    /// The overlay should fade out and page scrolling be released.
    Hidden,
    /// Entrance animations may start.
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Loading,
    Finished,
    Hidden,
    Done,
}

/// Loading bar that eases toward its target and then runs a short hide sequence.
#[derive(Clone, Debug)]
pub struct Preloader {
    bar: SmoothedScalar,
    phase: Phase,
    finished_at: f64,
}

impl Default for Preloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Preloader {
    pub fn new() -> Self {
        Self {
            bar: SmoothedScalar::new(0.0, PRELOADER_FACTOR),
            phase: Phase::Loading,
            finished_at: 0.0,
        }
    }

    /// Set the target percentage, clamped to `[0, 100]`.
    pub fn set_progress(&mut self, percent: f64) {
        let p = if percent.is_nan() { 0.0 } else { percent };
        self.bar.set_target(p.clamp(0.0, 100.0));
    }

    /// Bar width in percent.
    pub fn bar_width(&self) -> f64 {
        if self.phase == Phase::Loading {
            self.bar.current()
        } else {
            100.0
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Loading
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.phase, Phase::Hidden | Phase::Done)
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Advance one frame at `now_ms`. Returns the event that fired this frame, if any.
    pub fn update(&mut self, now_ms: f64) -> Option<PreloaderEvent> {
        match self.phase {
            Phase::Loading => {
                if self.bar.tick() > FINISH_THRESHOLD {
                    self.phase = Phase::Finished;
                    self.finished_at = now_ms;
                    return Some(PreloaderEvent::Finished);
                }
                None
            }
            Phase::Finished if now_ms - self.finished_at >= HIDE_DELAY_MS => {
                self.phase = Phase::Hidden;
                Some(PreloaderEvent::Hidden)
            }
            Phase::Hidden if now_ms - self.finished_at >= HIDE_DELAY_MS + DONE_DELAY_MS => {
                self.phase = Phase::Done;
                Some(PreloaderEvent::Done)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_clamped() {
        let mut p = Preloader::new();
        p.set_progress(250.0);
        p.update(0.0);
        assert!((p.bar_width() - 8.0).abs() < 1e-12);
        p.set_progress(-5.0);
        p.update(16.0);
        assert!(p.bar_width() < 8.0);
    }

    #[test]
    fn finish_hide_done_sequence() {
        let mut p = Preloader::new();
        p.set_progress(100.0);
        let mut now = 0.0;
        let finished_at = loop {
            now += 16.0;
            if p.update(now) == Some(PreloaderEvent::Finished) {
                break now;
            }
            assert!(now < 60_000.0, "bar never finished");
        };
        assert_eq!(p.bar_width(), 100.0);
        assert!(!p.is_hidden());

        assert_eq!(p.update(finished_at + 399.0), None);
        assert_eq!(p.update(finished_at + 400.0), Some(PreloaderEvent::Hidden));
        assert_eq!(p.update(finished_at + 999.0), None);
        assert_eq!(p.update(finished_at + 1000.0), Some(PreloaderEvent::Done));
        assert!(p.is_done());
        assert_eq!(p.update(finished_at + 5000.0), None);
    }

    #[test]
    fn stalls_below_threshold() {
        let mut p = Preloader::new();
        p.set_progress(70.0);
        for i in 0..1000 {
            assert_eq!(p.update(f64::from(i) * 16.0), None);
        }
        assert!(p.bar_width() <= 70.0);
    }
}
