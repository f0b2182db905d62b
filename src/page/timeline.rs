//! Scroll-bound timelines.
//!
//! The page hands the hero a progress value per frame through a [`TimelineScheduler`].
//! Real hosts back this with their animation library; [`LinearScrollScheduler`] maps scroll
//! position to progress directly and is what the CLI and tests use.

use std::collections::BTreeMap;

/// Scrub lag of the hero timeline, in seconds.
pub const HERO_SCRUB_SECONDS: f64 = 0.8;

/// How a timeline follows the page scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollBinding {
    /// Scroll offset where progress is 0.
    pub start: f64,
    /// Scroll distance over which progress goes from 0 to 1.
    pub length: f64,
    /// Keep the bound element fixed while the timeline runs.
    pub pin: bool,
    /// Seconds the progress takes to catch up with the scroll position. `0` tracks exactly.
    pub scrub: f64,
}

impl ScrollBinding {
    /// Binding for the hero: starts at its top, runs `scroll_length - 1` viewport heights.
    pub fn hero(hero_top: f64, viewport_height: f64, scroll_length: f64) -> Self {
        Self {
            start: hero_top,
            length: viewport_height * (scroll_length - 1.0),
            pin: true,
            scrub: HERO_SCRUB_SECONDS,
        }
    }

    /// Unsmoothed progress for a scroll offset, clamped to `[0, 1]`.
    pub fn progress_at(&self, scroll_y: f64) -> f64 {
        if self.length <= 0.0 {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / self.length).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineId(pub u64);

/// Progress sample for one timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineUpdate {
    pub id: TimelineId,
    pub progress: f64,
}

pub trait TimelineScheduler {
    fn create_scroll_bound_timeline(&mut self, binding: ScrollBinding) -> TimelineId;

    /// Sample every timeline for the current scroll offset, `dt` seconds after the last poll.
    fn poll(&mut self, scroll_y: f64, dt: f64) -> Vec<TimelineUpdate>;
}

#[derive(Clone, Debug)]
struct Track {
    binding: ScrollBinding,
    progress: f64,
}

/// Maps scroll offset linearly to progress, easing toward it according to each binding's
/// scrub time.
#[derive(Clone, Debug, Default)]
pub struct LinearScrollScheduler {
    next_id: u64,
    tracks: BTreeMap<TimelineId, Track>,
}

impl LinearScrollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl TimelineScheduler for LinearScrollScheduler {
    fn create_scroll_bound_timeline(&mut self, binding: ScrollBinding) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;
        self.tracks.insert(
            id,
            Track {
                binding,
                progress: 0.0,
            },
        );
        id
    }

    fn poll(&mut self, scroll_y: f64, dt: f64) -> Vec<TimelineUpdate> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.tracks
            .iter_mut()
            .map(|(id, track)| {
                let target = track.binding.progress_at(scroll_y);
                let factor = if track.binding.scrub > 0.0 {
                    (dt / track.binding.scrub).min(1.0)
                } else {
                    1.0
                };
                track.progress += (target - track.progress) * factor;
                TimelineUpdate {
                    id: *id,
                    progress: track.progress,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_binding_spans_remaining_viewports() {
        let b = ScrollBinding::hero(0.0, 800.0, 3.0);
        assert_eq!(b.length, 1600.0);
        assert!(b.pin);
        assert_eq!(b.scrub, 0.8);
        assert_eq!(b.progress_at(-10.0), 0.0);
        assert_eq!(b.progress_at(800.0), 0.5);
        assert_eq!(b.progress_at(5000.0), 1.0);
    }

    #[test]
    fn zero_length_binding_is_a_step() {
        let b = ScrollBinding::hero(100.0, 800.0, 1.0);
        assert_eq!(b.progress_at(99.0), 0.0);
        assert_eq!(b.progress_at(100.0), 1.0);
    }

    #[test]
    fn scrub_eases_toward_scroll_position() {
        let mut s = LinearScrollScheduler::new();
        let id = s.create_scroll_bound_timeline(ScrollBinding::hero(0.0, 800.0, 3.0));
        let first = s.poll(1600.0, 0.2);
        assert_eq!(first, vec![TimelineUpdate { id, progress: 0.25 }]);
        let second = s.poll(1600.0, 10.0);
        assert_eq!(second[0].progress, 1.0);
    }

    #[test]
    fn unscrubbed_timelines_track_exactly() {
        let mut s = LinearScrollScheduler::new();
        s.create_scroll_bound_timeline(ScrollBinding {
            start: 0.0,
            length: 100.0,
            pin: false,
            scrub: 0.0,
        });
        assert_eq!(s.poll(40.0, 0.0)[0].progress, 0.4);
        assert_eq!(s.len(), 1);
    }
}
