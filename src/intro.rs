//! The hero's load animation: headline characters flip up one after another,
//! then the subhead and the bottom corners fade in.
//!
//! Element order: one entry per headline character, then subhead, bottom-left,
//! bottom-right.

use crate::ease::Ease;
use crate::timeline::{Length, Player, Style, Timeline};

const DELAY: f64 = 0.3;
const CHAR_DURATION: f64 = 0.8;
const CHAR_STAGGER: f64 = 0.02;

/// Offset state of a headline character before it flips into place.
pub const CHAR_OFF: Style = Style {
    opacity: 0.0,
    x: Length::ZERO,
    y: Length::px(24.0),
    rotate_x: 65.0,
    scale: 1.0,
};

#[derive(Debug, Clone)]
pub struct HeroIntro {
    player: Player,
}

impl HeroIntro {
    pub fn new(chars: usize) -> Self {
        let mut player = Player::new(Self::timeline(chars));
        player.play();
        Self { player }
    }

    pub fn timeline(chars: usize) -> Timeline {
        let mut tl = Timeline::new(chars + 3);
        tl.push_staggered(0..chars, CHAR_OFF, Style::RESTING, DELAY, CHAR_DURATION, CHAR_STAGGER, Ease::Power3Out);

        let chars_end = if chars == 0 {
            DELAY
        } else {
            DELAY + CHAR_STAGGER * (chars - 1) as f64 + CHAR_DURATION
        };
        // Subhead overlaps the last 0.4s of the characters.
        let subhead_start = (chars_end - 0.4).max(0.0);
        tl.push_staggered([chars], Style::HIDDEN, Style::RESTING, subhead_start, 0.6, 0.0, Ease::Power2Out);
        // Corners overlap the last 0.3s of the subhead.
        let corners_start = subhead_start + 0.6 - 0.3;
        tl.push_staggered([chars + 1, chars + 2], Style::HIDDEN, Style::RESTING, corners_start, 0.5, 0.1, Ease::Power2Out);
        tl
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn tick(&mut self, dt: f64) -> bool {
        self.player.tick(dt)
    }

    /// Skips to the end, leaving everything at rest.
    pub fn finish(&mut self) {
        self.player.finish();
    }

    pub fn sample_into(&self, out: &mut Vec<Style>) {
        self.player.sample_into(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(intro: &HeroIntro) -> Vec<Style> {
        let mut out = Vec::new();
        intro.sample_into(&mut out);
        out
    }

    #[test]
    fn everything_starts_off_and_ends_at_rest() {
        let mut intro = HeroIntro::new(8);
        let start = styles(&intro);
        assert_eq!(start.len(), 11);
        assert!(start[..8].iter().all(|s| *s == CHAR_OFF));
        assert!(start[8..].iter().all(|s| s.opacity == 0.0));

        while intro.tick(1.0 / 60.0) {}
        assert!(styles(&intro).iter().all(|s| *s == Style::RESTING));
    }

    #[test]
    fn subhead_overlaps_the_characters() {
        let tl = HeroIntro::timeline(8);
        // Characters end at 1.24, the subhead runs 0.84..1.44 and the last corner ends at 1.74.
        let at = tl.sample(1.0);
        assert!(at[8].opacity > 0.0);
        assert!(at[7].opacity < 1.0);
        assert!((tl.duration() - 1.74).abs() < 1e-9);
    }

    #[test]
    fn finish_jumps_to_rest() {
        let mut intro = HeroIntro::new(4);
        intro.tick(0.1);
        intro.finish();
        assert!(!intro.is_playing());
        assert!(styles(&intro).iter().all(|s| *s == Style::RESTING));
    }
}
