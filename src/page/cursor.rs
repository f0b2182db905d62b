use crate::animation::smooth::{CURSOR_FACTOR, SmoothedScalar};
use crate::foundation::core::Point;

/// Positions to apply to the cursor elements this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorFrame {
    pub dot: Point,
    pub ring: Point,
    pub visible: bool,
    pub hover: bool,
}

/// Custom cursor: a dot pinned to the pointer and a ring that trails it.
#[derive(Clone, Debug)]
pub struct Cursor {
    pointer: Point,
    ring_x: SmoothedScalar,
    ring_y: SmoothedScalar,
    visible: bool,
    hover: bool,
}

impl Cursor {
    /// Start centered in a `width x height` viewport, hidden until the first move.
    pub fn new(width: f64, height: f64) -> Self {
        let center = Point::new(width / 2.0, height / 2.0);
        Self {
            pointer: center,
            ring_x: SmoothedScalar::new(center.x, CURSOR_FACTOR),
            ring_y: SmoothedScalar::new(center.y, CURSOR_FACTOR),
            visible: false,
            hover: false,
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Point::new(x, y);
        self.ring_x.set_target(x);
        self.ring_y.set_target(y);
        self.visible = true;
    }

    pub fn pointer_leave(&mut self) {
        self.visible = false;
    }

    /// Pointer entered or left an interactive element.
    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    pub fn update(&mut self) -> CursorFrame {
        let ring = Point::new(self.ring_x.tick(), self.ring_y.tick());
        CursorFrame {
            dot: self.pointer,
            ring,
            visible: self.visible,
            hover: self.hover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_is_exact_and_ring_trails() {
        let mut c = Cursor::new(200.0, 100.0);
        assert!(!c.update().visible);

        c.pointer_move(200.0, 50.0);
        let f = c.update();
        assert!(f.visible);
        assert_eq!(f.dot, Point::new(200.0, 50.0));
        assert!((f.ring.x - (100.0 + 100.0 * 0.15)).abs() < 1e-9);
        assert!((f.ring.y - 50.0).abs() < 1e-9);

        for _ in 0..200 {
            c.update();
        }
        assert!((c.update().ring.x - 200.0).abs() < 1e-6);

        c.pointer_leave();
        assert!(!c.update().visible);
    }
}
