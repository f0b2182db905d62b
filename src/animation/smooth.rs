//! Exponential smoothing for decorative per-frame scalars.

/// Smoothing factor for the preloader bar.
pub const PRELOADER_FACTOR: f64 = 0.08;
/// Smoothing factor for the trailing cursor ring.
pub const CURSOR_FACTOR: f64 = 0.15;

/// One smoothing step: move `current` toward `target` by `factor` of the remaining distance.
///
/// Callers clamp `target` themselves.
#[inline]
pub fn advance(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// A scalar that chases its target once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedScalar {
    current: f64,
    target: f64,
    factor: f64,
}

impl SmoothedScalar {
    pub fn new(initial: f64, factor: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            factor,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump straight to `value` (both current and target).
    pub fn snap(&mut self, value: f64) {
        self.current = value;
        self.target = value;
    }

    /// Advance one frame and return the new current value.
    pub fn tick(&mut self) -> f64 {
        self.current = advance(self.current, self.target, self.factor);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_preloader_step_is_eight_percent() {
        assert!((advance(0.0, 100.0, PRELOADER_FACTOR) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn converges_without_overshoot() {
        let mut s = SmoothedScalar::new(0.0, PRELOADER_FACTOR);
        s.set_target(100.0);
        let mut prev = s.current();
        for _ in 0..500 {
            let v = s.tick();
            assert!(v >= prev);
            assert!(v <= 100.0);
            prev = v;
        }
        assert!(100.0 - prev < 1e-9);
    }

    #[test]
    fn snap_sets_both_ends() {
        let mut s = SmoothedScalar::new(3.0, CURSOR_FACTOR);
        s.snap(9.0);
        assert_eq!(s.current(), 9.0);
        assert_eq!(s.tick(), 9.0);
    }

    proptest! {
        #[test]
        fn approach_from_below_is_monotonic(
            start in -1000.0f64..1000.0,
            gap in 0.0f64..1000.0,
            use_cursor in any::<bool>(),
            steps in 1usize..200,
        ) {
            let factor = if use_cursor { CURSOR_FACTOR } else { PRELOADER_FACTOR };
            let target = start + gap;
            let mut s = SmoothedScalar::new(start, factor);
            s.set_target(target);
            let mut prev = start;
            for _ in 0..steps {
                let v = s.tick();
                prop_assert!(v >= prev);
                prop_assert!(v <= target);
                prev = v;
            }
        }
    }
}
