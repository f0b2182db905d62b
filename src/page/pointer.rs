use crate::foundation::core::{Rect, Vec2};

/// Maximum card tilt in degrees at the card edge.
pub const TILT_DEGREES: f64 = 6.0;
/// Fraction of the pointer offset applied to magnetic links.
pub const MAGNETIC_STRENGTH: f64 = 0.08;
/// Delay between consecutive entrance animations, in seconds.
pub const STAGGER_SECONDS: f64 = 0.1;

/// Card rotation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

/// Tilt for a pointer at `(x, y)` over a card occupying `rect`.
///
/// The pointer offset is normalized to `[-0.5, 0.5]` across the card. A degenerate rect
/// gives no tilt.
pub fn card_tilt(rect: Rect, x: f64, y: f64) -> Tilt {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Tilt::default();
    }
    let nx = (x - rect.x0) / rect.width() - 0.5;
    let ny = (y - rect.y0) / rect.height() - 0.5;
    Tilt {
        rotate_x: -ny * TILT_DEGREES,
        rotate_y: nx * TILT_DEGREES,
    }
}

/// Translation pulling a link toward the pointer.
pub fn magnetic_offset(rect: Rect, x: f64, y: f64) -> Vec2 {
    let center = rect.center();
    Vec2::new(x - center.x, y - center.y) * MAGNETIC_STRENGTH
}

/// Entrance delay for the `index`-th element of a group.
pub fn stagger_delay(index: usize) -> f64 {
    index as f64 * STAGGER_SECONDS
}
