//! Pinned sections and their scroll-distance windows.
//!
//! A pinned section sits in a spacer that reserves extra scroll distance below
//! it; the section itself is `position: sticky`, so it stays fixed while the
//! page scrolls through that distance. Geometry is in document CSS pixels.

use crate::section::AnimationPhase;

/// The document-scroll window during which a section is pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinGeometry {
    pub start: f64,
    pub end: f64,
}

impl PinGeometry {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn distance(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinnedSection {
    id: String,
    geometry: Option<PinGeometry>,
    phase: AnimationPhase,
    mounted: bool,
}

impl PinnedSection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            geometry: None,
            phase: AnimationPhase::Entering,
            mounted: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `None` until the first refresh, or if the section's element was missing.
    pub fn geometry(&self) -> Option<PinGeometry> {
        self.geometry
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Raw, unclamped progress through the pin window: negative before the
    /// window, above 1 after it. `None` without measurable geometry.
    pub fn progress(&self, scroll_y: f64) -> Option<f64> {
        let geometry = self.geometry?;
        let distance = geometry.distance();
        if distance <= 0.0 {
            return None;
        }
        Some((scroll_y - geometry.start) / distance)
    }

    pub(crate) fn set_geometry(&mut self, geometry: Option<PinGeometry>) {
        self.geometry = geometry;
    }

    pub(crate) fn set_phase(&mut self, phase: AnimationPhase) {
        self.phase = phase;
    }

    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
    }
}

/// Access to the live layout of pinned sections.
pub trait PinMeasure {
    /// Reserves `distance` px of extra scroll below the section `id`.
    fn reserve(&mut self, id: &str, distance: f64);

    /// Document-space top of the section's spacer, in CSS pixels.
    fn document_top(&mut self, id: &str) -> Option<f64>;
}

/// Computes geometry for every id in one pass.
///
/// All reservations are applied before anything is measured, so each top
/// already accounts for the spacers above it and no section sees a half-updated
/// layout.
pub fn measure_pins(ids: &[&str], distance: f64, measure: &mut impl PinMeasure) -> Vec<Option<PinGeometry>> {
    let distance = distance.max(0.0);
    for id in ids {
        measure.reserve(id, distance);
    }
    ids.iter()
        .map(|id| {
            measure
                .document_top(id)
                .map(|top| PinGeometry::new(top, top + distance))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::PinMeasure;

    /// A column of stacked sections with fixed natural heights.
    #[derive(Debug, Default)]
    pub struct StackLayout {
        pub order: Vec<(String, f64)>,
        pub reserved: HashMap<String, f64>,
        pub reserve_calls: usize,
        pub measure_calls: usize,
        pub measured_before_all_reserved: bool,
    }

    impl StackLayout {
        pub fn new(sections: &[(&str, f64)]) -> Self {
            Self {
                order: sections.iter().map(|(id, h)| (id.to_string(), *h)).collect(),
                ..Self::default()
            }
        }
    }

    impl PinMeasure for StackLayout {
        fn reserve(&mut self, id: &str, distance: f64) {
            self.reserve_calls += 1;
            self.reserved.insert(id.to_owned(), distance);
        }

        fn document_top(&mut self, id: &str) -> Option<f64> {
            self.measure_calls += 1;
            if self.reserved.len() < self.order.len() {
                self.measured_before_all_reserved = true;
            }
            let mut top = 0.0;
            for (name, height) in &self.order {
                if name == id {
                    return Some(top);
                }
                top += height + self.reserved.get(name).copied().unwrap_or(0.0);
            }
            None
        }
    }
}
