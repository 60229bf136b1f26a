//! The pinned sections on the page, top to bottom.
//!
//! Copy lives in `static/index.html`; this table only carries what the scroll
//! engine and the compositors need.

use crate::section::{SectionKind, TitlePosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinnedContent {
    /// Element id of the `<section>`.
    pub id: &'static str,
    pub kind: SectionKind,
    /// Background image drawn by the section's compositor.
    pub image: &'static str,
}

pub const PINNED: [PinnedContent; 6] = [
    PinnedContent {
        id: "hero-section",
        kind: SectionKind::Hero,
        image: "hero-bg.jpg",
    },
    PinnedContent {
        id: "work-neon",
        kind: SectionKind::Work(TitlePosition::Center),
        image: "work-neon.jpg",
    },
    PinnedContent {
        id: "work-commerce",
        kind: SectionKind::Work(TitlePosition::Right),
        image: "work-commerce.jpg",
    },
    PinnedContent {
        id: "work-product",
        kind: SectionKind::Work(TitlePosition::Center),
        image: "work-product.jpg",
    },
    PinnedContent {
        id: "work-brand",
        kind: SectionKind::Work(TitlePosition::Center),
        image: "work-brand.jpg",
    },
    PinnedContent {
        id: "work-editorial",
        kind: SectionKind::Work(TitlePosition::Left),
        image: "work-editorial.jpg",
    },
];

/// Element the hero's "View selected work" button scrolls to.
pub const WORK_WRAPPER_ID: &str = "work-section";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Section;

    #[test]
    fn ids_are_unique() {
        for (i, a) in PINNED.iter().enumerate() {
            for b in &PINNED[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn navigation_targets_that_pin_are_listed() {
        for section in [Section::Hero, Section::Work] {
            assert!(PINNED.iter().any(|p| p.id == section.target_id()));
        }
    }
}
