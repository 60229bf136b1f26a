//! Global scroll snapping.
//!
//! Scrolling is free everywhere except near a pinned section: once the user
//! stops inside (or just around) a pin window, the page glides to the centre of
//! the nearest one.
//!
//! The plan is built once, shortly after startup. It is not rebuilt when the
//! window is resized unless the configuration asks for it, so after a
//! layout-changing resize the snap centres can drift from the live pin windows.

use crate::ease::{lerp, Ease};
use crate::pin::PinnedSection;

/// One pin window normalised by the maximum scroll distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRange {
    pub start: f64,
    pub end: f64,
    pub center: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapPlan {
    ranges: Vec<SnapRange>,
    buffer: f64,
}

impl SnapPlan {
    /// Builds ranges from every mounted pin with a non-empty window.
    ///
    /// Returns `None` (free scroll everywhere) when there is no scroll distance
    /// or no usable pin.
    pub fn build<'a>(
        pins: impl IntoIterator<Item = &'a PinnedSection>,
        max_scroll: f64,
        buffer: f64,
    ) -> Option<Self> {
        if max_scroll.is_nan() || max_scroll <= 0.0 {
            return None;
        }
        let mut windows: Vec<_> = pins
            .into_iter()
            .filter(|pin| pin.is_mounted())
            .filter_map(PinnedSection::geometry)
            .filter(|g| g.end > g.start)
            .collect();
        if windows.is_empty() {
            return None;
        }
        // Stable: equal starts keep registration order.
        windows.sort_by(|a, b| a.start.total_cmp(&b.start));

        let ranges = windows
            .into_iter()
            .map(|g| SnapRange {
                start: g.start / max_scroll,
                end: g.end / max_scroll,
                center: (g.start + (g.end - g.start) * 0.5) / max_scroll,
            })
            .collect();
        Some(Self { ranges, buffer })
    }

    pub fn ranges(&self) -> &[SnapRange] {
        &self.ranges
    }

    /// Snap target for the normalised scroll position `x`.
    ///
    /// Outside every buffered range this is `x` itself. Inside one it is the
    /// nearest range centre; on an exact tie the earlier range wins.
    pub fn snap(&self, x: f64) -> f64 {
        let in_pinned = self
            .ranges
            .iter()
            .any(|r| x >= r.start - self.buffer && x <= r.end + self.buffer);
        if !in_pinned {
            return x;
        }
        self.ranges.iter().fold(self.ranges[0].center, |closest, r| {
            if (r.center - x).abs() < (closest - x).abs() {
                r.center
            } else {
                closest
            }
        })
    }
}

/// Snap travel time in seconds: `min` for a negligible hop, up to `max` for a
/// hop of a viewport height or more.
pub fn snap_duration(travel_px: f64, viewport_px: f64, min: f64, max: f64) -> f64 {
    if viewport_px <= 0.0 {
        return max;
    }
    let t = (travel_px.abs() / viewport_px).clamp(0.0, 1.0);
    lerp(min, max, t)
}

/// An in-flight snap from one scroll offset to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimation {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl SnapAnimation {
    /// Scroll offset at `now_ms`, and whether the snap has finished.
    pub fn sample(&self, now_ms: f64) -> (f64, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t >= 1.0 {
            return (self.to, true);
        }
        (lerp(self.from, self.to, Ease::Power2Out.apply(t)), false)
    }
}

/// Fires once after scroll events stop for `threshold_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIdle {
    threshold_ms: f64,
    last_ms: Option<f64>,
}

impl ScrollIdle {
    pub fn new(threshold_ms: f64) -> Self {
        Self {
            threshold_ms,
            last_ms: None,
        }
    }

    pub fn record(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last >= self.threshold_ms => {
                self.last_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Timing knobs for [`SnapCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTiming {
    pub scroll_end_ms: f64,
    pub duration_min: f64,
    pub duration_max: f64,
}

/// Our own programmatic scrolls land within this many px of where we asked.
const SELF_SCROLL_TOLERANCE: f64 = 2.0;

/// Owns the snap plan and turns scroll-end into snap animations.
#[derive(Debug, Clone)]
pub struct SnapCoordinator {
    plan: Option<SnapPlan>,
    timing: SnapTiming,
    idle: ScrollIdle,
    animation: Option<SnapAnimation>,
    expected_y: Option<f64>,
}

impl SnapCoordinator {
    pub fn new(timing: SnapTiming) -> Self {
        Self {
            plan: None,
            timing,
            idle: ScrollIdle::new(timing.scroll_end_ms),
            animation: None,
            expected_y: None,
        }
    }

    /// Installs (or replaces) the plan. `None` leaves scrolling free.
    pub fn install(&mut self, plan: Option<SnapPlan>) {
        match &plan {
            Some(plan) => log::info!("scroll snap installed over {} pinned sections", plan.ranges().len()),
            None => log::info!("no pinned scroll distance; scroll snap skipped"),
        }
        self.plan = plan;
        self.animation = None;
    }

    pub fn plan(&self) -> Option<&SnapPlan> {
        self.plan.as_ref()
    }

    pub fn is_snapping(&self) -> bool {
        self.animation.is_some()
    }

    /// Feeds a scroll event. Scrolls we did not cause cancel any running snap.
    pub fn on_scroll(&mut self, now_ms: f64, scroll_y: f64) {
        if let Some(expected) = self.expected_y {
            if (scroll_y - expected).abs() <= SELF_SCROLL_TOLERANCE {
                return;
            }
        }
        self.expected_y = None;
        self.animation = None;
        self.idle.record(now_ms);
    }

    /// Per-frame step. Returns the scroll offset to apply this frame, if any.
    pub fn frame(&mut self, now_ms: f64, scroll_y: f64, max_scroll: f64, viewport_px: f64) -> Option<f64> {
        if let Some(animation) = self.animation {
            let (y, done) = animation.sample(now_ms);
            if done {
                self.animation = None;
            }
            self.expected_y = Some(y);
            return Some(y);
        }

        let plan = self.plan.as_ref()?;
        if !self.idle.poll(now_ms) || max_scroll <= 0.0 {
            return None;
        }
        let target = plan.snap(scroll_y / max_scroll) * max_scroll;
        if (target - scroll_y).abs() < 1.0 {
            return None;
        }
        let seconds = snap_duration(
            target - scroll_y,
            viewport_px,
            self.timing.duration_min,
            self.timing.duration_max,
        );
        self.animation = Some(SnapAnimation {
            from: scroll_y,
            to: target,
            start_ms: now_ms,
            duration_ms: seconds * 1000.0,
        });
        None
    }
}
