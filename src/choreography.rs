//! The set of pinned sections on the page, in registration order.

use crate::pin::{measure_pins, PinMeasure, PinnedSection};
use crate::section::{SectionController, SectionUpdate};

#[derive(Debug, Default)]
pub struct Choreography {
    sections: Vec<SectionController>,
    /// Pin window length as a multiple of the viewport height.
    pin_distance: f64,
}

impl Choreography {
    pub fn new(pin_distance: f64) -> Self {
        Self {
            sections: Vec::new(),
            pin_distance,
        }
    }

    /// Adds a section and returns its index. Registration order is kept: it
    /// breaks ties when two snap targets are equally close.
    pub fn register(&mut self, section: SectionController) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[SectionController] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionController> {
        self.sections.get(index)
    }

    pub fn pins(&self) -> impl Iterator<Item = &PinnedSection> + '_ {
        self.sections.iter().map(SectionController::pin)
    }

    /// Recomputes the pin window of every mounted section for a viewport of
    /// `viewport_height` px. All geometry is committed together after every
    /// section has been measured. Returns how many sections were recomputed.
    pub fn refresh(&mut self, viewport_height: f64, measure: &mut impl PinMeasure) -> usize {
        let ids: Vec<&str> = self
            .sections
            .iter()
            .filter(|s| s.pin().is_mounted())
            .map(SectionController::id)
            .collect();
        let geometry = measure_pins(&ids, viewport_height * self.pin_distance, measure);

        let mut measured = geometry.into_iter();
        let mut count = 0;
        for section in self.sections.iter_mut().filter(|s| s.pin().is_mounted()) {
            section.pin_mut().set_geometry(measured.next().flatten());
            count += 1;
        }
        log::debug!("refreshed {count} pinned sections at {viewport_height}px viewport");
        count
    }

    /// Samples every section. Calls `on_update` for each section that did
    /// something this frame.
    pub fn update(
        &mut self,
        scroll_y: f64,
        velocity: f64,
        dt: f64,
        mut on_update: impl FnMut(usize, &SectionController, SectionUpdate),
    ) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            let update = section.update(scroll_y, velocity, dt);
            if update != SectionUpdate::default() {
                on_update(index, section, update);
            }
        }
    }

    /// Tears down the section `id`. Returns `false` if it is not registered.
    pub fn unmount(&mut self, id: &str) -> bool {
        match self.sections.iter_mut().find(|s| s.id() == id) {
            Some(section) => {
                section.kill();
                true
            }
            None => false,
        }
    }

    pub fn kill_all(&mut self) {
        self.sections.iter_mut().for_each(SectionController::kill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distortion::{DistortionBus, DistortionMapper};
    use crate::pin::fake::StackLayout;
    use crate::pin::PinGeometry;
    use crate::section::{Scrub, SectionKind, TitlePosition};

    fn page(bus: &DistortionBus) -> Choreography {
        let mut choreo = Choreography::new(1.3);
        for (id, kind) in [
            ("hero-section", SectionKind::Hero),
            ("work-neon", SectionKind::Work(TitlePosition::Center)),
            ("work-commerce", SectionKind::Work(TitlePosition::Right)),
        ] {
            choreo.register(SectionController::new(
                id,
                kind,
                Scrub::immediate(),
                DistortionMapper::default(),
                bus.clone(),
            ));
        }
        choreo
    }

    #[test]
    fn refresh_recomputes_every_section() {
        let bus = DistortionBus::new();
        let mut choreo = page(&bus);
        let mut layout = StackLayout::new(&[
            ("hero-section", 800.0),
            ("work-neon", 800.0),
            ("work-commerce", 800.0),
        ]);
        assert_eq!(choreo.refresh(800.0, &mut layout), 3);
        assert_eq!(layout.reserve_calls, 3);
        assert_eq!(layout.measure_calls, 3);
        let before: Vec<_> = choreo.pins().map(|p| p.geometry()).collect();
        assert_eq!(before[1], Some(PinGeometry::new(1840.0, 2880.0)));

        // A taller viewport moves every window, not just the first.
        let mut layout = StackLayout::new(&[
            ("hero-section", 1000.0),
            ("work-neon", 1000.0),
            ("work-commerce", 1000.0),
        ]);
        assert_eq!(choreo.refresh(1000.0, &mut layout), 3);
        let after: Vec<_> = choreo.pins().map(|p| p.geometry()).collect();
        for (old, new) in before.iter().zip(&after) {
            assert_ne!(old, new);
        }
        assert_eq!(after[2], Some(PinGeometry::new(4600.0, 5900.0)));
    }

    #[test]
    fn unmounted_sections_are_skipped() {
        let bus = DistortionBus::new();
        let mut choreo = page(&bus);
        assert!(choreo.unmount("work-neon"));
        assert!(!choreo.unmount("nope"));
        let mut layout = StackLayout::new(&[("hero-section", 800.0), ("work-commerce", 800.0)]);
        assert_eq!(choreo.refresh(800.0, &mut layout), 2);
        assert!(choreo.section(1).unwrap().pin().geometry().is_none());
        assert!(choreo.section(2).unwrap().pin().geometry().is_some());
    }

    #[test]
    fn update_reports_only_active_sections() {
        let bus = DistortionBus::new();
        let mut choreo = page(&bus);
        let mut layout = StackLayout::new(&[
            ("hero-section", 800.0),
            ("work-neon", 800.0),
            ("work-commerce", 800.0),
        ]);
        choreo.refresh(800.0, &mut layout);

        let mut touched = Vec::new();
        choreo.update(0.0, 0.0, 0.016, |i, _, _| touched.push(i));
        // Hero renders; both work items render their off state once.
        assert_eq!(touched, vec![0, 1, 2]);

        touched.clear();
        choreo.update(10.0, 600.0, 0.016, |i, _, _| touched.push(i));
        assert_eq!(touched, vec![0]);
        assert!(bus.snapshot().intensity > 0.0);
    }
}
