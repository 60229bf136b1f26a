//! Frame and resize sequencing for the pinned sections, snapping and the
//! shared distortion.

use crate::choreography::Choreography;
use crate::config::SiteConfig;
use crate::distortion::{DistortionBus, DistortionState};
use crate::pin::PinMeasure;
use crate::section::{SectionController, SectionKind, SectionUpdate};
use crate::snap::{SnapCoordinator, SnapPlan, SnapTiming};
use crate::velocity::VelocityTracker;

/// Browser state sampled at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub now_ms: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
    pub scroll_y: f64,
    pub max_scroll: f64,
    pub viewport_height: f64,
}

/// What the page has to do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutput {
    /// Bus value the compositors draw this frame. Taken before any section
    /// publishes, so a publish shows up on screen one frame later.
    pub distortion: DistortionState,
    /// Scroll offset a running snap wants applied.
    pub scroll_to: Option<f64>,
    pub hero_left_back: bool,
}

#[derive(Debug)]
pub struct ScrollDriver {
    choreography: Choreography,
    snap: SnapCoordinator,
    velocity: VelocityTracker,
    bus: DistortionBus,
    snap_buffer: f64,
    eager_snap_refresh: bool,
}

impl ScrollDriver {
    pub fn new(choreography: Choreography, bus: DistortionBus, config: &SiteConfig) -> Self {
        Self {
            choreography,
            snap: SnapCoordinator::new(SnapTiming {
                scroll_end_ms: config.scroll_end_ms,
                duration_min: config.snap_duration_min,
                duration_max: config.snap_duration_max,
            }),
            velocity: VelocityTracker::new(),
            bus,
            snap_buffer: config.snap_buffer,
            eager_snap_refresh: config.eager_snap_refresh,
        }
    }

    pub fn choreography(&self) -> &Choreography {
        &self.choreography
    }

    pub fn snap(&self) -> &SnapCoordinator {
        &self.snap
    }

    pub fn on_scroll(&mut self, now_ms: f64, scroll_y: f64) {
        self.velocity.record(now_ms, scroll_y);
        self.snap.on_scroll(now_ms, scroll_y);
    }

    /// Re-measures every pin window. An installed snap plan keeps its old
    /// ranges unless eager refresh is configured; `max_scroll` is only read
    /// when the plan is rebuilt.
    pub fn refresh(
        &mut self,
        viewport_height: f64,
        measure: &mut impl PinMeasure,
        max_scroll: impl FnOnce() -> f64,
    ) -> usize {
        let count = self.choreography.refresh(viewport_height, measure);
        if self.eager_snap_refresh && self.snap.plan().is_some() {
            self.install_snap(max_scroll());
        }
        count
    }

    pub fn install_snap(&mut self, max_scroll: f64) {
        let plan = SnapPlan::build(self.choreography.pins(), max_scroll, self.snap_buffer);
        self.snap.install(plan);
    }

    /// Runs one frame: read the bus, step any snap, then let every section
    /// sample the scroll position and publish.
    pub fn frame(
        &mut self,
        input: FrameInput,
        mut on_update: impl FnMut(usize, &SectionController, SectionUpdate),
    ) -> FrameOutput {
        let mut output = FrameOutput {
            distortion: self.bus.snapshot(),
            ..FrameOutput::default()
        };

        let mut scroll_y = input.scroll_y;
        if let Some(y) = self
            .snap
            .frame(input.now_ms, scroll_y, input.max_scroll, input.viewport_height)
        {
            output.scroll_to = Some(y);
            scroll_y = y;
        }
        let velocity = self.velocity.velocity(input.now_ms);

        self.choreography
            .update(scroll_y, velocity, input.dt, |index, section, update| {
                if update.left_back && section.kind() == SectionKind::Hero {
                    output.hero_left_back = true;
                }
                on_update(index, section, update);
            });
        output
    }

    /// Kills every section and clears the shared distortion.
    pub fn destroy(&mut self) {
        self.choreography.kill_all();
        self.bus.publish(DistortionState::ZERO);
        self.velocity.clear();
    }
}
