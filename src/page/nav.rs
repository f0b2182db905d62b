//! Header visibility and scroll parallax.

/// Header state classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    pub visible: bool,
    pub scrolled: bool,
}

/// Navigation header tied to the hero scroll range.
#[derive(Clone, Debug)]
pub struct Navigation {
    scroll_length: f64,
    state: NavState,
    last_scroll: f64,
}

impl Navigation {
    /// `scroll_length` is the hero length in viewport heights.
    pub fn new(scroll_length: f64) -> Self {
        Self {
            scroll_length,
            state: NavState::default(),
            last_scroll: 0.0,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn last_scroll(&self) -> f64 {
        self.last_scroll
    }

    /// Shown past half the hero; "scrolled" style 100px past its end.
    pub fn update(&mut self, scroll_y: f64, viewport_height: f64) -> NavState {
        let hero_end = viewport_height * self.scroll_length;
        self.state = NavState {
            visible: scroll_y > hero_end * 0.5,
            scrolled: scroll_y > hero_end + 100.0,
        };
        self.last_scroll = scroll_y;
        self.state
    }
}

/// Leading-number parse in the manner of `parseFloat`; anything unparsable is `0`.
pub fn parse_speed(raw: &str) -> f64 {
    let s = raw.trim_start();
    let b = s.as_bytes();
    let mut end = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits = |from: usize| b[from..].iter().take_while(|c| c.is_ascii_digit()).count();
    let int = digits(end);
    end += int;
    let mut frac = 0;
    if b.get(end) == Some(&b'.') {
        frac = digits(end + 1);
        if int > 0 || frac > 0 {
            end += 1 + frac;
        }
    }
    if int == 0 && frac == 0 {
        return 0.0;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(b.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp = digits(exp_end);
        if exp > 0 {
            end = exp_end + exp;
        }
    }
    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Vertical translation for a parallax element whose parent box starts at `rect_top` with
/// `rect_height`, relative to the viewport center.
pub fn parallax_offset(rect_top: f64, rect_height: f64, viewport_height: f64, speed: f64) -> f64 {
    (rect_top + rect_height / 2.0 - viewport_height / 2.0) * speed
}

/// A `data-speed` element.
#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxLayer {
    pub speed: f64,
}

impl ParallaxLayer {
    pub fn from_attr(raw: &str) -> Self {
        Self {
            speed: parse_speed(raw),
        }
    }

    pub fn offset(&self, rect_top: f64, rect_height: f64, viewport_height: f64) -> f64 {
        parallax_offset(rect_top, rect_height, viewport_height, self.speed)
    }
}
