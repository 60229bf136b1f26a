//! Per-section scroll choreography.
//!
//! Each pinned section owns a [`SectionController`]. Scroll progress through the
//! pin window (0..=1) drives three phases:
//!
//! - entering (`[0, 0.3)`): content scrubs linearly from its off state to rest,
//! - settled (`[0.3, 0.7]`): nothing moves,
//! - exiting (`(0.7, 1]`): content eases out.
//!
//! Scrolling back to or above the start of the window resets everything to
//! rest and zeroes the shared distortion.

use crate::distortion::{DistortionBus, DistortionMapper, DistortionState};
use crate::ease::Ease;
use crate::pin::PinnedSection;
use crate::timeline::{Length, Style, Timeline, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    #[default]
    Entering,
    Settled,
    Exiting,
}

impl AnimationPhase {
    pub const SETTLE_START: f64 = 0.3;
    pub const SETTLE_END: f64 = 0.7;

    /// Phase for a progress sample. Both settle edges belong to `Settled`.
    pub fn at(progress: f64) -> Self {
        if progress < Self::SETTLE_START {
            Self::Entering
        } else if progress <= Self::SETTLE_END {
            Self::Settled
        } else {
            Self::Exiting
        }
    }
}

/// Where a work item's title sits, which decides its entrance and exit paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePosition {
    Center,
    Right,
    Left,
}

impl TitlePosition {
    fn entrance(self) -> (Length, Length) {
        match self {
            Self::Center => (Length::ZERO, Length::vh(70.0)),
            Self::Right => (Length::vw(60.0), Length::ZERO),
            Self::Left => (Length::vw(-60.0), Length::ZERO),
        }
    }

    /// Exits mirror the entrance: centred titles leave upward, right-aligned
    /// ones to the left, left-aligned ones to the right.
    fn exit(self) -> (Length, Length) {
        match self {
            Self::Center => (Length::ZERO, Length::vh(-40.0)),
            Self::Right => (Length::vw(-55.0), Length::ZERO),
            Self::Left => (Length::vw(55.0), Length::vh(-35.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    Work(TitlePosition),
}

/// An animated element inside a pinned section, addressed in markup as
/// `[data-role="..."]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Headline,
    Subhead,
    BottomLeft,
    BottomRight,
    Micro,
    Title,
    Meta,
    Link,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headline => "headline",
            Self::Subhead => "subhead",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Micro => "micro",
            Self::Title => "title",
            Self::Meta => "meta",
            Self::Link => "link",
        }
    }
}

impl SectionKind {
    pub fn roles(self) -> &'static [Role] {
        match self {
            Self::Hero => &[Role::Headline, Role::Subhead, Role::BottomLeft, Role::BottomRight],
            Self::Work(_) => &[Role::Micro, Role::Title, Role::Meta, Role::Link],
        }
    }

    /// Scroll timeline in progress units.
    pub fn timeline(self) -> Timeline {
        match self {
            Self::Hero => hero_timeline(),
            Self::Work(position) => work_timeline(position),
        }
    }
}

fn entrance(target: usize, from: Style, start: f64) -> Tween {
    Tween {
        target,
        from,
        to: Style::RESTING,
        start,
        duration: AnimationPhase::SETTLE_START - start,
        ease: Ease::None,
    }
}

fn exit(target: usize, to: Style, start: f64) -> Tween {
    Tween {
        target,
        from: Style::RESTING,
        to,
        start,
        duration: 1.0 - start,
        ease: Ease::Power2In,
    }
}

fn hero_timeline() -> Timeline {
    const HEADLINE: usize = 0;
    const SUBHEAD: usize = 1;
    const BOTTOM_LEFT: usize = 2;
    const BOTTOM_RIGHT: usize = 3;

    let mut tl = Timeline::new(4);
    // The hero is already on screen at load (its intro is time-based), so the
    // scrubbed entrance only holds it at rest.
    tl.push(entrance(HEADLINE, Style::RESTING, 0.0))
        .push(exit(HEADLINE, Style::hidden_at(Length::ZERO, Length::vh(-18.0)), 0.7))
        .push(exit(SUBHEAD, Style::hidden_at(Length::ZERO, Length::vh(-12.0)), 0.72));
    for corner in [BOTTOM_LEFT, BOTTOM_RIGHT] {
        tl.push(exit(corner, Style::hidden_at(Length::ZERO, Length::vh(3.0)), 0.75));
    }
    tl
}

fn work_timeline(position: TitlePosition) -> Timeline {
    const MICRO: usize = 0;
    const TITLE: usize = 1;
    const META: usize = 2;
    const LINK: usize = 3;

    let (in_x, in_y) = position.entrance();
    let (out_x, out_y) = position.exit();

    let mut tl = Timeline::new(4);
    tl.push(entrance(MICRO, Style::hidden_at(Length::ZERO, Length::vh(-6.0)), 0.0))
        .push(entrance(TITLE, Style::hidden_at(in_x, in_y), 0.0));
    for footer in [META, LINK] {
        tl.push(entrance(footer, Style::hidden_at(Length::ZERO, Length::vh(3.0)), 0.1));
    }
    tl.push(exit(TITLE, Style::hidden_at(out_x, out_y), 0.7))
        .push(exit(MICRO, Style::hidden_at(Length::ZERO, Length::vh(-3.0)), 0.72));
    for footer in [META, LINK] {
        tl.push(exit(footer, Style::hidden_at(Length::ZERO, Length::vh(3.0)), 0.75));
    }
    tl
}

/// Lets rendered progress trail the scroll position by roughly `lag` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrub {
    lag: f64,
    value: Option<f64>,
}

impl Scrub {
    pub fn new(lag: f64) -> Self {
        Self {
            lag: lag.max(0.0),
            value: None,
        }
    }

    /// Follows the scroll position with no lag.
    pub fn immediate() -> Self {
        Self::new(0.0)
    }

    pub fn follow(&mut self, target: f64, dt: f64) -> f64 {
        let next = match self.value {
            Some(current) if self.lag > 0.0 => {
                // ~98% of the way there after `lag` seconds.
                let alpha = 1.0 - (-4.0 * dt.max(0.0) / self.lag).exp();
                let next = current + (target - current) * alpha;
                if (target - next).abs() < 1e-4 {
                    target
                } else {
                    next
                }
            }
            _ => target,
        };
        self.value = Some(next);
        next
    }

    pub fn jump(&mut self, value: f64) {
        self.value = Some(value);
    }
}

/// What a controller did on one update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionUpdate {
    /// Element styles changed and need to be written to the DOM.
    pub restyled: bool,
    pub phase_change: Option<(AnimationPhase, AnimationPhase)>,
    /// The scroll position moved back above the pin window.
    pub left_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    /// Nothing rendered yet.
    Unrendered,
    /// Rendered at progress 0 while the window has not been entered.
    Waiting,
    /// Progress has been past the start of the window.
    Tracking,
    /// Reset after scrolling back above the window; frozen until re-entry.
    LeftBack,
}

/// Drives one pinned section's timeline from scroll position.
#[derive(Debug)]
pub struct SectionController {
    pin: PinnedSection,
    kind: SectionKind,
    timeline: Timeline,
    scrub: Scrub,
    styles: Vec<Style>,
    activity: Activity,
    rendered_at: Option<f64>,
    mapper: DistortionMapper,
    bus: DistortionBus,
}

impl SectionController {
    pub fn new(
        id: impl Into<String>,
        kind: SectionKind,
        scrub: Scrub,
        mapper: DistortionMapper,
        bus: DistortionBus,
    ) -> Self {
        let timeline = kind.timeline();
        let styles = vec![Style::RESTING; timeline.len()];
        Self {
            pin: PinnedSection::new(id),
            kind,
            timeline,
            scrub,
            styles,
            activity: Activity::Unrendered,
            rendered_at: None,
            mapper,
            bus,
        }
    }

    pub fn id(&self) -> &str {
        self.pin.id()
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn pin(&self) -> &PinnedSection {
        &self.pin
    }

    pub(crate) fn pin_mut(&mut self) -> &mut PinnedSection {
        &mut self.pin
    }

    pub fn phase(&self) -> AnimationPhase {
        self.pin.phase()
    }

    /// Current style of each element, in [`SectionKind::roles`] order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Samples the section at `scroll_y`. `velocity` is the scroll velocity in
    /// px/s; `dt` the seconds since the previous frame.
    pub fn update(&mut self, scroll_y: f64, velocity: f64, dt: f64) -> SectionUpdate {
        let mut update = SectionUpdate::default();
        if !self.pin.is_mounted() {
            return update;
        }
        let Some(raw) = self.pin.progress(scroll_y) else {
            return update;
        };

        // Progress 0 counts as outside the window, so a section pinned at the
        // very top of the page can still be left back.
        if raw <= 0.0 {
            match self.activity {
                Activity::Tracking => {
                    self.reset();
                    update.restyled = true;
                    update.left_back = true;
                }
                Activity::Unrendered => {
                    self.render(0.0, &mut update);
                    self.activity = Activity::Waiting;
                }
                Activity::Waiting | Activity::LeftBack => {}
            }
            return update;
        }

        if self.activity == Activity::LeftBack {
            self.scrub.jump(0.0);
        }
        self.activity = Activity::Tracking;

        let progress = self.scrub.follow(raw.min(1.0), dt);
        if self.rendered_at != Some(progress) {
            self.render(progress, &mut update);
            self.bus.publish(self.mapper.map(velocity));
        }
        update
    }

    fn render(&mut self, progress: f64, update: &mut SectionUpdate) {
        self.timeline.sample_into(progress, &mut self.styles);
        self.rendered_at = Some(progress);
        update.restyled = true;

        let previous = self.pin.phase();
        let next = AnimationPhase::at(progress);
        if next != previous {
            log::debug!("{}: {previous:?} -> {next:?} at {progress:.3}", self.pin.id());
            self.pin.set_phase(next);
            update.phase_change = Some((previous, next));
        }
    }

    /// Forces every element back to rest and clears the shared distortion.
    fn reset(&mut self) {
        log::debug!("{}: scrolled back above pin window, resetting", self.pin.id());
        self.styles.iter_mut().for_each(|s| *s = Style::RESTING);
        self.scrub.jump(0.0);
        self.rendered_at = None;
        self.pin.set_phase(AnimationPhase::Entering);
        self.activity = Activity::LeftBack;
        self.bus.publish(DistortionState::ZERO);
    }

    /// Destroys every animation this section owns. Later updates do nothing.
    pub fn kill(&mut self) {
        self.timeline.clear();
        self.pin.unmount();
    }
}
