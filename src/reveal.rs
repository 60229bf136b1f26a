//! Time-based reveal animations for the free-scrolling sections.
//!
//! A reveal plays when its trigger element's top rises past a line in the
//! viewport and reverses when it drops back below that line. Leaving the
//! viewport downwards or re-entering from below does nothing.

use crate::ease::Ease;
use crate::timeline::{Length, Player, Style, Timeline};

/// Reveal presets, selected in markup with `data-reveal="..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    /// Section heading block.
    Heading,
    /// Staggered capability cards.
    Cards,
    /// A single block (certifications, languages).
    Block,
    /// Staggered contact items.
    Items,
    /// Experience timeline entries, sliding in from the left.
    Timeline,
}

impl RevealKind {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "heading" => Some(Self::Heading),
            "cards" => Some(Self::Cards),
            "block" => Some(Self::Block),
            "items" => Some(Self::Items),
            "timeline" => Some(Self::Timeline),
            _ => None,
        }
    }

    /// Fraction of the viewport height the trigger's top must rise above.
    pub fn trigger_ratio(self) -> f64 {
        match self {
            Self::Heading => 0.8,
            Self::Block => 0.85,
            Self::Cards | Self::Items | Self::Timeline => 0.75,
        }
    }

    /// Whether the preset animates the trigger's `[data-reveal-item]` children
    /// rather than the trigger itself.
    pub fn staggers_children(self) -> bool {
        matches!(self, Self::Cards | Self::Items | Self::Timeline)
    }

    /// Timeline (in seconds) for `count` elements.
    pub fn timeline(self, count: usize) -> Timeline {
        let (from, duration, stagger) = match self {
            Self::Heading => (Style::hidden_at(Length::ZERO, Length::px(40.0)), 0.8, 0.0),
            Self::Cards => (
                Style {
                    scale: 0.98,
                    ..Style::hidden_at(Length::ZERO, Length::px(60.0))
                },
                0.6,
                0.08,
            ),
            Self::Block => (Style::hidden_at(Length::ZERO, Length::px(30.0)), 0.6, 0.0),
            Self::Items => (Style::hidden_at(Length::ZERO, Length::px(24.0)), 0.6, 0.1),
            Self::Timeline => (Style::hidden_at(Length::px(-40.0), Length::ZERO), 0.6, 0.15),
        };
        let mut tl = Timeline::new(count);
        tl.push_staggered(0..count, from, Style::RESTING, 0.0, duration, stagger, Ease::Power2Out);
        tl
    }
}

/// One reveal: a trigger line plus the player for its timeline.
#[derive(Debug, Clone)]
pub struct Reveal {
    kind: RevealKind,
    player: Player,
    entered: bool,
}

impl Reveal {
    pub fn new(kind: RevealKind, count: usize) -> Self {
        Self {
            kind,
            player: Player::new(kind.timeline(count)),
            entered: false,
        }
    }

    pub fn kind(&self) -> RevealKind {
        self.kind
    }

    pub fn has_entered(&self) -> bool {
        self.entered
    }

    /// Feeds the trigger's viewport-relative top. Returns `true` if playback
    /// direction changed.
    pub fn on_scroll(&mut self, top_in_viewport: f64, viewport_height: f64) -> bool {
        let past_line = top_in_viewport <= viewport_height * self.kind.trigger_ratio();
        match (self.entered, past_line) {
            (false, true) => {
                self.entered = true;
                self.player.play();
                true
            }
            (true, false) => {
                self.entered = false;
                self.player.reverse();
                true
            }
            _ => false,
        }
    }

    /// Advances playback by `dt` seconds. Returns `true` if styles changed.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.player.tick(dt)
    }

    pub fn sample_into(&self, out: &mut Vec<Style>) {
        self.player.sample_into(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(reveal: &Reveal) -> Vec<Style> {
        let mut out = Vec::new();
        reveal.sample_into(&mut out);
        out
    }

    #[test]
    fn starts_hidden_until_triggered() {
        let mut reveal = Reveal::new(RevealKind::Heading, 1);
        assert_eq!(styles(&reveal)[0], Style::hidden_at(Length::ZERO, Length::px(40.0)));
        // 'top 80%' on an 1000px viewport.
        assert!(!reveal.on_scroll(900.0, 1000.0));
        assert!(!reveal.tick(0.1));
        assert!(reveal.on_scroll(800.0, 1000.0));
        while reveal.tick(0.016) {}
        assert_eq!(styles(&reveal)[0], Style::RESTING);
    }

    #[test]
    fn leave_back_reverses_and_enter_back_is_ignored() {
        let mut reveal = Reveal::new(RevealKind::Cards, 3);
        reveal.on_scroll(100.0, 1000.0);
        while reveal.tick(0.016) {}
        // Scrolling further down (trigger leaves the top) keeps it shown.
        assert!(!reveal.on_scroll(-2000.0, 1000.0));
        assert!(reveal.has_entered());
        assert!(styles(&reveal).iter().all(|s| *s == Style::RESTING));

        assert!(reveal.on_scroll(900.0, 1000.0));
        assert!(!reveal.has_entered());
        assert_eq!(reveal.kind(), RevealKind::Cards);
        while reveal.tick(0.016) {}
        let hidden = styles(&reveal);
        assert!(hidden.iter().all(|s| s.opacity == 0.0 && s.scale == 0.98));
    }

    #[test]
    fn cards_are_staggered() {
        let mut reveal = Reveal::new(RevealKind::Cards, 3);
        reveal.on_scroll(0.0, 1000.0);
        reveal.tick(0.1);
        let s = styles(&reveal);
        assert!(s[0].opacity > s[1].opacity);
        assert!(s[1].opacity > s[2].opacity);
    }

    #[test]
    fn presets_parse_from_markup() {
        assert_eq!(RevealKind::from_attr("timeline"), Some(RevealKind::Timeline));
        assert_eq!(RevealKind::from_attr("fade"), None);
        assert!(RevealKind::Items.staggers_children());
        assert!(!RevealKind::Block.staggers_children());
    }
}
