//! Scroll velocity → distortion signal, and the page-wide bus that carries it.
//!
//! Pinned-section controllers are the producers; every shader compositor is a
//! consumer. Only the section whose pin window contains the scroll position is
//! scrubbing at any time, so the bus has a single active writer without any
//! locking: a publish replaces the whole value and readers take a copy.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::SiteConfig;

/// Distortion strength and the 2D direction it pushes the image in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistortionState {
    pub intensity: f32,
    pub direction: [f32; 2],
}

impl DistortionState {
    /// No distortion, no direction. Published on a leave-back reset.
    pub const ZERO: Self = Self {
        intensity: 0.0,
        direction: [0.0, 0.0],
    };
}

/// Maps a velocity sample to a [`DistortionState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionMapper {
    /// Velocity (px/s) at which intensity saturates.
    pub velocity_scale: f64,
    pub max_intensity: f64,
    /// Constant vertical component of the direction.
    pub direction_y: f64,
}

impl Default for DistortionMapper {
    fn default() -> Self {
        Self {
            velocity_scale: 1000.0,
            max_intensity: 0.5,
            direction_y: 0.3,
        }
    }
}

impl DistortionMapper {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            velocity_scale: config.velocity_scale,
            max_intensity: config.max_intensity,
            direction_y: config.direction_y,
        }
    }

    /// `intensity = min(|v| / scale, 1) * max`, `direction = (sign(v), y)`.
    ///
    /// A velocity of exactly zero (or NaN) maps to `x = 0`; the previous
    /// direction is never carried over.
    pub fn map(&self, velocity: f64) -> DistortionState {
        if velocity.is_nan() {
            return DistortionState {
                intensity: 0.0,
                direction: [0.0, self.direction_y as f32],
            };
        }
        let normalized = (velocity.abs() / self.velocity_scale).min(1.0);
        let x = if velocity > 0.0 {
            1.0
        } else if velocity < 0.0 {
            -1.0
        } else {
            0.0
        };
        DistortionState {
            intensity: (normalized * self.max_intensity) as f32,
            direction: [x, self.direction_y as f32],
        }
    }
}

/// Shared, last-write-wins distortion value.
///
/// Clones share the same cell. Producers call [`DistortionBus::publish`];
/// compositors call [`DistortionBus::snapshot`] once per frame.
#[derive(Debug, Clone, Default)]
pub struct DistortionBus {
    state: Rc<Cell<DistortionState>>,
}

impl DistortionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, state: DistortionState) {
        self.state.set(state);
    }

    pub fn snapshot(&self) -> DistortionState {
        self.state.get()
    }
}

/// The low-pass filtered distortion a compositor actually renders with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayedDistortion {
    pub intensity: f32,
    pub direction: [f32; 2],
    intensity_blend: f32,
    direction_blend: f32,
}

impl Default for DisplayedDistortion {
    fn default() -> Self {
        Self::new(0.08, 0.10)
    }
}

impl DisplayedDistortion {
    pub fn new(intensity_blend: f32, direction_blend: f32) -> Self {
        Self {
            intensity: 0.0,
            direction: [0.0, 0.0],
            intensity_blend,
            direction_blend,
        }
    }

    /// Moves one frame toward `target`.
    pub fn step(&mut self, target: DistortionState) {
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        self.intensity = lerp(self.intensity, target.intensity, self.intensity_blend);
        self.direction[0] = lerp(self.direction[0], target.direction[0], self.direction_blend);
        self.direction[1] = lerp(self.direction[1], target.direction[1], self.direction_blend);
    }
}
