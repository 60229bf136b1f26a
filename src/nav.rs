//! Section navigation and the navigation bar's visibility.

/// The named jump targets exposed to the rest of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hero,
    Work,
    Capabilities,
    Contact,
}

impl Section {
    pub const ALL: [Self; 4] = [Self::Hero, Self::Work, Self::Capabilities, Self::Contact];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hero" => Some(Self::Hero),
            "work" => Some(Self::Work),
            "capabilities" => Some(Self::Capabilities),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Work => "work",
            Self::Capabilities => "capabilities",
            Self::Contact => "contact",
        }
    }

    /// Id of the element the page scrolls to. "Work" lands on the first work
    /// item rather than the wrapper so it arrives at a pinned section.
    pub fn target_id(self) -> &'static str {
        match self {
            Self::Hero => "hero-section",
            Self::Work => "work-neon",
            Self::Capabilities => "capabilities-section",
            Self::Contact => "contact-section",
        }
    }
}

/// Something that can smooth-scroll an element into view.
pub trait ScrollTarget {
    /// Returns `false` if no element with `id` exists.
    fn smooth_scroll_to(&mut self, id: &str) -> bool;
}

/// Jumps to the section called `name`. Unknown names and missing elements are
/// silently ignored; the return value says whether a scroll was started.
pub fn navigate(name: &str, target: &mut impl ScrollTarget) -> bool {
    let Some(section) = Section::from_name(name) else {
        log::debug!("navigate: unknown section {name:?}");
        return false;
    };
    let scrolled = target.smooth_scroll_to(section.target_id());
    if !scrolled {
        log::debug!("navigate: #{} not in document", section.target_id());
    }
    scrolled
}

/// Visibility of the fixed navigation bar and the mobile menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavState {
    reveal_ratio: f64,
    visible: bool,
    menu_open: bool,
}

impl NavState {
    pub fn new(reveal_ratio: f64) -> Self {
        Self {
            reveal_ratio,
            visible: false,
            menu_open: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// The bar shows once the page has scrolled past `reveal_ratio` of the
    /// viewport. Returns `true` when visibility changed.
    pub fn on_scroll(&mut self, scroll_y: f64, viewport_height: f64) -> bool {
        let visible = scroll_y > viewport_height * self.reveal_ratio;
        let changed = visible != self.visible;
        self.visible = visible;
        changed
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }
}
