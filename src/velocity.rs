//! Scroll velocity estimation from timestamped scroll samples.

use std::collections::VecDeque;

/// Samples older than this are discarded.
const WINDOW_MS: f64 = 100.0;

/// Tracks recent scroll positions and reports velocity in px/s.
///
/// Velocity is measured across the oldest sample still inside the window, so a
/// burst of wheel events yields a stable figure and an idle page yields 0.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, f64)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the scroll position `y` observed at `now_ms`.
    pub fn record(&mut self, now_ms: f64, y: f64) {
        if let Some(&(last_t, _)) = self.samples.back() {
            if now_ms < last_t {
                // Clock went backwards (tab restore); start over.
                self.samples.clear();
            }
        }
        self.samples.push_back((now_ms, y));
        self.prune(now_ms);
    }

    /// Signed velocity in px/s at `now_ms`. Positive means scrolling down.
    pub fn velocity(&mut self, now_ms: f64) -> f64 {
        self.prune(now_ms);
        let (Some(&(t0, y0)), Some(&(t1, y1))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let dt = t1 - t0;
        if dt <= 0.0 {
            return 0.0;
        }
        (y1 - y0) / dt * 1000.0
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    fn prune(&mut self, now_ms: f64) {
        while let Some(&(t, _)) = self.samples.front() {
            if now_ms - t > WINDOW_MS {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}
