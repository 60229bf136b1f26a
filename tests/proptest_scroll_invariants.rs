#![cfg(not(target_arch = "wasm32"))]
//! Property-based invariant tests for the scroll engine.
//!
//! Verifies:
//! 1. Distortion intensity stays in `[0, max]` and grows with |velocity|
//! 2. Direction is `(sign(v), 0.3)`
//! 3. Snapping is idempotent
//! 4. Positions outside every buffered range are left alone
//! 5. Leaving a pin window backwards rests every element and zeroes the bus
//! 6. Element opacity stays in `[0, 1]` for any scroll position

use std::collections::HashMap;

use folio_wasm::choreography::Choreography;
use folio_wasm::distortion::{DistortionBus, DistortionMapper, DistortionState};
use folio_wasm::pin::PinMeasure;
use folio_wasm::section::{Scrub, SectionController, SectionKind, TitlePosition};
use folio_wasm::snap::SnapPlan;
use folio_wasm::timeline::Style;
use proptest::prelude::*;

// ── Fixtures ──────────────────────────────────────────────────────────

/// Spacers at fixed document offsets.
struct FixedTops(HashMap<String, f64>);

impl PinMeasure for FixedTops {
    fn reserve(&mut self, _id: &str, _distance: f64) {}

    fn document_top(&mut self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }
}

const KINDS: [SectionKind; 3] = [
    SectionKind::Work(TitlePosition::Center),
    SectionKind::Work(TitlePosition::Right),
    SectionKind::Work(TitlePosition::Left),
];

/// Sections at `tops`, each pinned for `viewport` px.
fn page(tops: &[f64], viewport: f64, bus: &DistortionBus) -> Choreography {
    let mut choreo = Choreography::new(1.0);
    let mut layout = HashMap::new();
    for (i, top) in tops.iter().enumerate() {
        let id = format!("work-{i}");
        layout.insert(id.clone(), *top);
        choreo.register(SectionController::new(
            id,
            KINDS[i % KINDS.len()],
            Scrub::immediate(),
            DistortionMapper::default(),
            bus.clone(),
        ));
    }
    choreo.refresh(viewport, &mut FixedTops(layout));
    choreo
}

/// Non-overlapping pin layouts: (tops, viewport, max_scroll).
fn arb_layout() -> impl Strategy<Value = (Vec<f64>, f64, f64)> {
    (
        prop::collection::vec(0.0f64..3000.0, 1..6),
        200.0f64..1200.0,
        0.0f64..3000.0,
    )
        .prop_map(|(gaps, viewport, tail)| {
            let mut tops = Vec::with_capacity(gaps.len());
            let mut cursor = 0.0;
            for gap in gaps {
                cursor += gap;
                tops.push(cursor);
                cursor += viewport;
            }
            (tops, viewport, cursor + tail)
        })
}

// ── Distortion ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn intensity_is_bounded(v in -1.0e6f64..1.0e6) {
        let state = DistortionMapper::default().map(v);
        prop_assert!(state.intensity >= 0.0);
        prop_assert!(state.intensity <= 0.5);
    }

    #[test]
    fn intensity_grows_with_speed(a in 0.0f64..5000.0, b in 0.0f64..5000.0, negative in any::<bool>()) {
        let mapper = DistortionMapper::default();
        let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
        let sign = if negative { -1.0 } else { 1.0 };
        prop_assert!(mapper.map(sign * slow).intensity <= mapper.map(sign * fast).intensity);
    }

    #[test]
    fn direction_follows_sign(v in -1.0e5f64..1.0e5) {
        let state = DistortionMapper::default().map(v);
        let expected = if v > 0.0 { 1.0 } else if v < 0.0 { -1.0 } else { 0.0 };
        prop_assert_eq!(state.direction, [expected, 0.3]);
    }
}

// ── Snapping ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn snapping_is_idempotent((tops, viewport, max_scroll) in arb_layout(), x in 0.0f64..=1.0) {
        let choreo = page(&tops, viewport, &DistortionBus::new());
        let plan = SnapPlan::build(choreo.pins(), max_scroll, 0.02).expect("pins have distance");
        let once = plan.snap(x);
        prop_assert_eq!(plan.snap(once), once);
    }

    #[test]
    fn free_scroll_outside_buffered_ranges((tops, viewport, max_scroll) in arb_layout(), x in 0.0f64..=1.0) {
        let choreo = page(&tops, viewport, &DistortionBus::new());
        let plan = SnapPlan::build(choreo.pins(), max_scroll, 0.02).expect("pins have distance");
        let inside = plan
            .ranges()
            .iter()
            .any(|r| x >= r.start - 0.02 && x <= r.end + 0.02);
        if inside {
            prop_assert!(plan.ranges().iter().any(|r| r.center == plan.snap(x)));
        } else {
            prop_assert_eq!(plan.snap(x), x);
        }
    }
}

#[test]
fn nearest_centre_only_inside_a_buffered_range() {
    // Two 200px windows on a 1000px scroll: centres at 0.2 and 0.6.
    let choreo = page(&[100.0, 500.0], 200.0, &DistortionBus::new());
    let narrow = SnapPlan::build(choreo.pins(), 1000.0, 0.02).unwrap();
    let centers: Vec<f64> = narrow.ranges().iter().map(|r| r.center).collect();
    assert_eq!(centers, [0.2, 0.6]);
    assert_eq!(narrow.snap(0.35), 0.35);

    let wide = SnapPlan::build(choreo.pins(), 1000.0, 0.06).unwrap();
    assert_eq!(wide.snap(0.35), 0.2);
}

#[test]
fn no_scroll_distance_means_no_plan() {
    let choreo = page(&[0.0], 800.0, &DistortionBus::new());
    assert!(SnapPlan::build(choreo.pins(), 0.0, 0.02).is_none());
    assert!(SnapPlan::build(Choreography::new(1.3).pins(), 5000.0, 0.02).is_none());
}

// ── Sections ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn leave_back_always_rests(
        (tops, viewport, _) in arb_layout(),
        path in prop::collection::vec((0.001f64..1.0, -3000.0f64..3000.0), 1..20),
    ) {
        let bus = DistortionBus::new();
        let mut choreo = page(&tops, viewport, &bus);
        let first = tops[0];
        for (progress, velocity) in path {
            choreo.update(first + progress * viewport, velocity, 0.016, |_, _, _| {});
        }
        choreo.update(first - 1.0, -500.0, 0.016, |_, _, _| {});
        let section = choreo.section(0).unwrap();
        prop_assert!(section.styles().iter().all(|s| *s == Style::RESTING));
        prop_assert_eq!(bus.snapshot(), DistortionState::ZERO);
    }

    #[test]
    fn opacity_stays_in_unit_range((tops, viewport, max_scroll) in arb_layout(), y in 0.0f64..1.0) {
        let bus = DistortionBus::new();
        let mut choreo = page(&tops, viewport, &bus);
        choreo.update(y * max_scroll, 0.0, 0.016, |_, section, _| {
            for style in section.styles() {
                assert!((0.0..=1.0).contains(&style.opacity), "{style:?}");
            }
        });
    }
}
