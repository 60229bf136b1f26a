//! Tween timelines over a fixed set of animated elements.
//!
//! A [`Timeline`] is position-agnostic: scroll-scrubbed sections sample it with
//! normalised progress, intro and reveal animations sample it with seconds via
//! [`Player`]. Each element's value at `t` comes from the last of its tweens
//! that has started by `t` (clamped to that tween's end); before its first tween
//! an element shows that tween's `from` state.

use std::fmt;

use crate::ease::{lerp, Ease};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Vw,
    Vh,
}

/// A CSS length. Interpolating towards or away from zero keeps the non-zero
/// endpoint's unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub const ZERO: Self = Self::px(0.0);

    pub const fn px(value: f64) -> Self {
        Self { value, unit: Unit::Px }
    }

    pub const fn vw(value: f64) -> Self {
        Self { value, unit: Unit::Vw }
    }

    pub const fn vh(value: f64) -> Self {
        Self { value, unit: Unit::Vh }
    }

    fn lerp(self, to: Self, t: f64) -> Self {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return to;
        }
        let unit = if self.value != 0.0 { self.unit } else { to.unit };
        Self {
            value: lerp(self.value, to.value, t),
            unit,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            Unit::Px => "px",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
        };
        write!(f, "{}{unit}", self.value)
    }
}

/// The animatable visual state of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub opacity: f64,
    pub x: Length,
    pub y: Length,
    /// Degrees.
    pub rotate_x: f64,
    pub scale: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self::RESTING
    }
}

impl Style {
    /// Fully visible, untransformed.
    pub const RESTING: Self = Self {
        opacity: 1.0,
        x: Length::ZERO,
        y: Length::ZERO,
        rotate_x: 0.0,
        scale: 1.0,
    };

    /// Resting position but transparent.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        ..Self::RESTING
    };

    pub fn hidden_at(x: Length, y: Length) -> Self {
        Self { x, y, ..Self::HIDDEN }
    }

    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            opacity: lerp(self.opacity, to.opacity, t),
            x: self.x.lerp(to.x, t),
            y: self.y.lerp(to.y, t),
            rotate_x: lerp(self.rotate_x, to.rotate_x, t),
            scale: lerp(self.scale, to.scale, t),
        }
    }

    /// CSS `transform` value for this style.
    pub fn transform(&self) -> String {
        let mut out = format!("translate3d({}, {}, 0px)", self.x, self.y);
        if self.rotate_x != 0.0 {
            out.push_str(&format!(" rotateX({}deg)", self.rotate_x));
        }
        if self.scale != 1.0 {
            out.push_str(&format!(" scale({})", self.scale));
        }
        out
    }
}

/// Interpolates one element from `from` to `to` over `[start, start + duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: usize,
    pub from: Style,
    pub to: Style,
    pub start: f64,
    pub duration: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn sample(&self, t: f64) -> Style {
        if t <= self.start {
            return self.from;
        }
        if self.duration <= 0.0 || t >= self.end() {
            return self.to;
        }
        let p = (t - self.start) / self.duration;
        self.from.lerp(&self.to, self.ease.apply(p))
    }
}

/// An ordered set of tweens animating `len` elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    len: usize,
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            tweens: Vec::new(),
        }
    }

    /// Adds a tween. Tweens for the same element must be added in start order.
    pub fn push(&mut self, tween: Tween) -> &mut Self {
        debug_assert!(tween.target < self.len, "tween targets unknown element");
        self.tweens.push(tween);
        self
    }

    /// Adds the same tween for several elements, each `stagger` after the last.
    #[allow(clippy::too_many_arguments)]
    pub fn push_staggered(
        &mut self,
        targets: impl IntoIterator<Item = usize>,
        from: Style,
        to: Style,
        start: f64,
        duration: f64,
        stagger: f64,
        ease: Ease,
    ) -> &mut Self {
        for (i, target) in targets.into_iter().enumerate() {
            self.push(Tween {
                target,
                from,
                to,
                start: start + stagger * i as f64,
                duration,
                ease,
            });
        }
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has_tweens(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Time at which the last tween finishes.
    pub fn duration(&self) -> f64 {
        self.tweens.iter().map(Tween::end).fold(0.0, f64::max)
    }

    /// Writes every element's style at `t` into `out` (resized to `len`).
    /// Elements with no tween keep [`Style::RESTING`].
    pub fn sample_into(&self, t: f64, out: &mut Vec<Style>) {
        out.clear();
        out.resize(self.len, Style::RESTING);
        let mut seen = vec![false; self.len];
        for tween in &self.tweens {
            if !seen[tween.target] || t >= tween.start {
                out[tween.target] = tween.sample(t);
                seen[tween.target] = true;
            }
        }
    }

    pub fn sample(&self, t: f64) -> Vec<Style> {
        let mut out = Vec::with_capacity(self.len);
        self.sample_into(t, &mut out);
        out
    }

    /// Drops every tween; the timeline then samples to resting for all elements.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Plays a [`Timeline`] against wall-clock seconds, forwards or backwards.
#[derive(Debug, Clone)]
pub struct Player {
    timeline: Timeline,
    time: f64,
    direction: Direction,
    playing: bool,
}

impl Player {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            time: 0.0,
            direction: Direction::Forward,
            playing: false,
        }
    }

    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        self.playing = true;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
        self.playing = true;
    }

    /// Jumps to the end and stops.
    pub fn finish(&mut self) {
        self.time = self.timeline.duration();
        self.direction = Direction::Forward;
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances by `dt` seconds. Returns `true` if the sampled state changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.playing {
            return false;
        }
        let end = self.timeline.duration();
        match self.direction {
            Direction::Forward => {
                self.time = (self.time + dt).min(end);
                if self.time >= end {
                    self.playing = false;
                }
            }
            Direction::Reverse => {
                self.time = (self.time - dt).max(0.0);
                if self.time <= 0.0 {
                    self.playing = false;
                }
            }
        }
        true
    }

    pub fn sample_into(&self, out: &mut Vec<Style>) {
        self.timeline.sample_into(self.time, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade_in(target: usize, start: f64) -> Tween {
        Tween {
            target,
            from: Style::hidden_at(Length::ZERO, Length::vh(3.0)),
            to: Style::RESTING,
            start,
            duration: 0.2,
            ease: Ease::None,
        }
    }

    #[test]
    fn before_first_tween_shows_from_state() {
        let mut tl = Timeline::new(2);
        tl.push(fade_in(0, 0.0)).push(fade_in(1, 0.1));
        let styles = tl.sample(0.05);
        assert_eq!(styles[1], Style::hidden_at(Length::ZERO, Length::vh(3.0)));
        assert_eq!(styles[0].opacity, 0.25);
    }

    #[test]
    fn later_tween_takes_over_once_started() {
        let mut tl = Timeline::new(1);
        tl.push(fade_in(0, 0.0)).push(Tween {
            target: 0,
            from: Style::RESTING,
            to: Style::hidden_at(Length::ZERO, Length::vh(-12.0)),
            start: 0.7,
            duration: 0.3,
            ease: Ease::Power2In,
        });
        assert_eq!(tl.sample(0.5)[0], Style::RESTING);
        assert_eq!(tl.sample(0.7)[0], Style::RESTING);
        assert_eq!(tl.sample(1.0)[0].y, Length::vh(-12.0));
        assert_eq!(tl.sample(0.0)[0].opacity, 0.0);
    }

    #[test]
    fn element_count_is_independent_of_tweens() {
        let mut tl = Timeline::new(4);
        assert_eq!(tl.len(), 4);
        assert!(!tl.is_empty());
        assert!(!tl.has_tweens());

        let from = Style::hidden_at(Length::ZERO, Length::px(10.0));
        tl.push_staggered(0..2, from, Style::RESTING, 0.0, 1.0, 0.1, Ease::None);
        assert!(tl.has_tweens());
        tl.clear();
        assert!(!tl.has_tweens());
        assert_eq!(tl.len(), 4);
        assert!(Timeline::new(0).is_empty());
    }

    #[test]
    fn untouched_elements_rest() {
        let tl = Timeline::new(3);
        assert!(tl.sample(0.4).iter().all(|s| *s == Style::RESTING));
    }

    #[test]
    fn zero_lengths_adopt_the_other_unit() {
        let from = Style::hidden_at(Length::vw(60.0), Length::ZERO);
        let mid = from.lerp(&Style::RESTING, 0.5);
        assert_eq!(mid.x, Length::vw(30.0));
        let out = Style::RESTING.lerp(&Style::hidden_at(Length::ZERO, Length::vh(-40.0)), 0.5);
        assert_eq!(out.y, Length::vh(-20.0));
    }

    #[test]
    fn transform_omits_identity_parts() {
        assert_eq!(Style::RESTING.transform(), "translate3d(0px, 0px, 0px)");
        let tilted = Style {
            y: Length::px(24.0),
            rotate_x: 65.0,
            scale: 0.98,
            ..Style::HIDDEN
        };
        assert_eq!(
            tilted.transform(),
            "translate3d(0px, 24px, 0px) rotateX(65deg) scale(0.98)"
        );
    }

    #[test]
    fn player_runs_both_ways_and_stops_at_the_ends() {
        let mut tl = Timeline::new(2);
        tl.push_staggered([0, 1], Style::HIDDEN, Style::RESTING, 0.0, 0.5, 0.1, Ease::Power2Out);
        let end = tl.duration();
        assert!((end - 0.6).abs() < 1e-12);

        let mut player = Player::new(tl);
        player.play();
        while player.tick(0.016) {}
        assert_eq!(player.time(), end);
        let mut styles = Vec::new();
        player.sample_into(&mut styles);
        assert!(styles.iter().all(|s| *s == Style::RESTING));

        player.reverse();
        while player.tick(0.016) {}
        assert_eq!(player.time(), 0.0);
        player.sample_into(&mut styles);
        assert!(styles.iter().all(|s| s.opacity == 0.0));
    }
}
