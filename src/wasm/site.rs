//! Wires the scroll engine, compositors and page widgets to the live document.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, Window,
};

use super::compositor::Compositor;
use super::dom::{self, DomPinMeasure, DomScrollTarget, Listener, Timeout};
use super::render::FrameLoop;
use crate::choreography::Choreography;
use crate::config::SiteConfig;
use crate::contact::{ContactFields, ContactForm};
use crate::content::{PINNED, WORK_WRAPPER_ID};
use crate::distortion::{DistortionBus, DistortionMapper};
use crate::driver::{FrameInput, ScrollDriver};
use crate::intro::HeroIntro;
use crate::nav::{self, NavState, ScrollTarget};
use crate::reveal::{Reveal, RevealKind};
use crate::section::{Scrub, SectionController, SectionKind};
use crate::timeline::Style;

const SENT_LABEL: &str = "Message sent!";

/// Role elements of one pinned section, in [`SectionKind::roles`] order.
struct PinnedDom {
    elements: Vec<Option<HtmlElement>>,
}

impl PinnedDom {
    fn find(section: &Element, kind: SectionKind) -> Self {
        let elements = kind
            .roles()
            .iter()
            .map(|role| dom::query(section, &format!("[data-role=\"{}\"]", role.as_str())))
            .collect();
        Self { elements }
    }

    fn apply(&self, styles: &[Style]) {
        for (el, style) in self.elements.iter().zip(styles) {
            if let Some(el) = el {
                dom::apply_style(el, style);
            }
        }
    }
}

/// Headline characters plus the subhead and corner wrappers the intro animates.
struct IntroDom {
    intro: HeroIntro,
    elements: Vec<Option<HtmlElement>>,
}

impl IntroDom {
    fn find(document: &Document, hero: &Element) -> Result<Self, JsValue> {
        let mut elements = Vec::new();
        for headline in dom::query_all(hero, "[data-split]") {
            elements.extend(split_chars(document, &headline)?.into_iter().map(Some));
        }
        let chars = elements.len();
        for part in ["subhead", "bottom-left", "bottom-right"] {
            elements.push(dom::query(hero, &format!("[data-intro=\"{part}\"]")));
        }
        Ok(Self {
            intro: HeroIntro::new(chars),
            elements,
        })
    }

    fn apply(&self, scratch: &mut Vec<Style>) {
        self.intro.sample_into(scratch);
        for (el, style) in self.elements.iter().zip(scratch.iter()) {
            if let Some(el) = el {
                dom::apply_style(el, style);
            }
        }
    }
}

/// Replaces an element's text with one inline-block span per character.
fn split_chars(document: &Document, el: &HtmlElement) -> Result<Vec<HtmlElement>, JsValue> {
    let text = el.text_content().unwrap_or_default();
    el.set_attribute("aria-label", text.trim())?;
    el.set_text_content(None);
    let mut spans = Vec::new();
    for ch in text.trim().chars() {
        let span: HtmlElement = document.create_element("span")?.dyn_into()?;
        span.set_class_name("char");
        span.set_attribute("aria-hidden", "true")?;
        let ch = if ch == ' ' { '\u{a0}' } else { ch };
        let mut buf = [0; 4];
        let glyph: &str = ch.encode_utf8(&mut buf);
        span.set_text_content(Some(glyph));
        el.append_child(&span)?;
        spans.push(span);
    }
    Ok(spans)
}

struct RevealDom {
    reveal: Reveal,
    trigger: HtmlElement,
    targets: Vec<HtmlElement>,
}

impl RevealDom {
    fn find_all(root: &Element) -> Vec<Self> {
        dom::query_all(root, "[data-reveal]")
            .into_iter()
            .filter_map(|trigger| {
                let attr = trigger.get_attribute("data-reveal").unwrap_or_default();
                let Some(kind) = RevealKind::from_attr(&attr) else {
                    log::debug!("unknown reveal preset {attr:?}");
                    return None;
                };
                let targets = if kind.staggers_children() {
                    dom::query_all(&trigger, "[data-reveal-item]")
                } else {
                    vec![trigger.clone()]
                };
                Some(Self {
                    reveal: Reveal::new(kind, targets.len()),
                    trigger,
                    targets,
                })
            })
            .collect()
    }

    fn apply(&self, scratch: &mut Vec<Style>) {
        self.reveal.sample_into(scratch);
        for (el, style) in self.targets.iter().zip(scratch.iter()) {
            dom::apply_style(el, style);
        }
    }
}

struct ContactDom {
    form: ContactForm,
    name: HtmlInputElement,
    email: HtmlInputElement,
    message: HtmlTextAreaElement,
    button: HtmlButtonElement,
    label: String,
}

impl ContactDom {
    fn find(document: &Document, config: &SiteConfig) -> Option<Self> {
        let form = document.get_element_by_id("contact-form")?;
        let field = |name: &str| {
            form.query_selector(&format!("[name=\"{name}\"]"))
                .ok()
                .flatten()
        };
        let name = field("name")?.dyn_into().ok()?;
        let email = field("email")?.dyn_into().ok()?;
        let message = field("message")?.dyn_into().ok()?;
        let button: HtmlButtonElement = form.query_selector("button[type=\"submit\"]").ok()??.dyn_into().ok()?;
        let label = button.text_content().unwrap_or_default();
        Some(Self {
            form: ContactForm::new(config.form_ack_ms),
            name,
            email,
            message,
            button,
            label,
        })
    }

    fn submit(&mut self, now_ms: f64) {
        let fields = ContactFields {
            name: self.name.value(),
            email: self.email.value(),
            message: self.message.value(),
        };
        match self.form.submit(fields, now_ms) {
            Ok(()) => {
                self.button.set_text_content(Some(SENT_LABEL));
                self.button.set_disabled(true);
            }
            Err(err) => log::debug!("contact form not sent: {err}"),
        }
    }

    fn tick(&mut self, now_ms: f64) {
        if self.form.tick(now_ms) {
            self.name.set_value("");
            self.email.set_value("");
            self.message.set_value("");
            self.button.set_text_content(Some(&self.label));
            self.button.set_disabled(false);
        }
    }
}

pub struct Site {
    window: Window,
    document: Document,
    driver: ScrollDriver,
    pinned: Vec<PinnedDom>,
    compositors: Vec<Compositor>,
    intro: Option<IntroDom>,
    reveals: Vec<RevealDom>,
    nav: NavState,
    nav_bar: Option<HtmlElement>,
    menu: Option<HtmlElement>,
    contact: Option<ContactDom>,
    started_ms: Option<f64>,
    last_frame_ms: Option<f64>,
    scratch: Vec<Style>,
}

impl Site {
    pub fn new(window: Window, document: Document, config: SiteConfig) -> Result<Self, JsValue> {
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;

        let bus = DistortionBus::new();
        let mapper = DistortionMapper::from_config(&config);
        let mut choreography = Choreography::new(config.pin_distance);
        let mut pinned = Vec::new();
        let mut compositors = Vec::new();
        let mut intro = None;

        for content in PINNED {
            let Some(section) = document.get_element_by_id(content.id) else {
                log::debug!("#{} not in document, skipping", content.id);
                continue;
            };
            choreography.register(SectionController::new(
                content.id,
                content.kind,
                Scrub::new(config.scrub_lag_secs),
                mapper,
                bus.clone(),
            ));
            pinned.push(PinnedDom::find(&section, content.kind));

            if content.kind == SectionKind::Hero {
                intro = Some(IntroDom::find(&document, &section)?);
            }

            let canvas = section
                .query_selector("canvas[data-distortion]")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
            if let Some(canvas) = canvas {
                match Compositor::new(canvas, content.image, &config) {
                    Ok(compositor) => compositors.push(compositor),
                    Err(err) => log::warn!("{}: distortion background disabled: {err:?}", content.id),
                }
            }
        }
        log::info!(
            "mounted {} pinned sections, {} distortion backgrounds",
            choreography.len(),
            compositors.len()
        );

        let reveals = RevealDom::find_all(&root);

        let mut site = Self {
            nav: NavState::new(config.nav_reveal_ratio),
            nav_bar: dom::by_id(&document, "site-nav"),
            menu: dom::by_id(&document, "mobile-menu"),
            contact: ContactDom::find(&document, &config),
            driver: ScrollDriver::new(choreography, bus, &config),
            window,
            document,
            pinned,
            compositors,
            intro,
            reveals,
            started_ms: None,
            last_frame_ms: None,
            scratch: Vec::new(),
        };

        if let Some(intro) = &site.intro {
            intro.apply(&mut site.scratch);
        }
        for reveal in &site.reveals {
            reveal.apply(&mut site.scratch);
        }
        site.refresh();
        site.sync_scroll_widgets();
        Ok(site)
    }

    /// Re-measures every pin window and resizes the canvases.
    pub fn refresh(&mut self) {
        let viewport_height = dom::viewport_height(&self.window);
        let mut measure = DomPinMeasure {
            window: &self.window,
            document: &self.document,
        };
        let (window, document) = (&self.window, &self.document);
        self.driver
            .refresh(viewport_height, &mut measure, || dom::max_scroll(window, document));
        for compositor in &self.compositors {
            compositor.resize(&self.window);
        }
    }

    pub fn install_snap(&mut self) {
        let max_scroll = dom::max_scroll(&self.window, &self.document);
        self.driver.install_snap(max_scroll);
    }

    pub fn on_scroll(&mut self) {
        let now = dom::now_ms(&self.window);
        let scroll_y = dom::scroll_y(&self.window);
        self.driver.on_scroll(now, scroll_y);
        self.sync_scroll_widgets();
    }

    /// Nav bar visibility and reveal triggers.
    fn sync_scroll_widgets(&mut self) {
        let scroll_y = dom::scroll_y(&self.window);
        let viewport_height = dom::viewport_height(&self.window);
        if self.nav.on_scroll(scroll_y, viewport_height) {
            if let Some(bar) = &self.nav_bar {
                dom::set_class(bar, "is-visible", self.nav.is_visible());
            }
        }
        for reveal in &mut self.reveals {
            let top = reveal.trigger.get_bounding_client_rect().top();
            reveal.reveal.on_scroll(top, viewport_height);
        }
    }

    pub fn frame(&mut self, now_ms: f64) {
        let started = *self.started_ms.get_or_insert(now_ms);
        let dt = self
            .last_frame_ms
            .map(|last| ((now_ms - last) / 1000.0).clamp(0.0, 0.1))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now_ms);
        let viewport_height = dom::viewport_height(&self.window);
        let input = FrameInput {
            now_ms,
            dt,
            scroll_y: dom::scroll_y(&self.window),
            max_scroll: dom::max_scroll(&self.window, &self.document),
            viewport_height,
        };

        let pinned = &self.pinned;
        let output = self.driver.frame(input, |index, section, update| {
            if update.restyled {
                if let Some(elements) = pinned.get(index) {
                    elements.apply(section.styles());
                }
            }
        });
        if let Some(y) = output.scroll_to {
            self.window.scroll_to_with_x_and_y(0.0, y);
        }
        let time = ((now_ms - started) / 1000.0) as f32;
        for compositor in &mut self.compositors {
            compositor.render(time, output.distortion, viewport_height);
        }

        if let Some(intro) = &mut self.intro {
            if output.hero_left_back {
                intro.intro.finish();
            }
            if intro.intro.tick(dt) || output.hero_left_back {
                intro.apply(&mut self.scratch);
            }
        }
        for reveal in &mut self.reveals {
            if reveal.reveal.tick(dt) {
                reveal.apply(&mut self.scratch);
            }
        }
        if let Some(contact) = &mut self.contact {
            contact.tick(now_ms);
        }
    }

    pub fn toggle_menu(&mut self) {
        let open = self.nav.toggle_menu();
        if let Some(menu) = &self.menu {
            dom::set_class(menu, "is-open", open);
        }
    }

    pub fn close_menu(&mut self) {
        self.nav.close_menu();
        if let Some(menu) = &self.menu {
            dom::set_class(menu, "is-open", false);
        }
    }

    pub fn submit_contact(&mut self) {
        let now = dom::now_ms(&self.window);
        if let Some(contact) = &mut self.contact {
            contact.submit(now);
        }
    }

    /// Kills every section and clears the shared distortion.
    pub fn destroy(&mut self) {
        self.driver.destroy();
        log::info!("site torn down");
    }
}

/// A mounted site: the state plus everything that calls into it.
pub struct Runtime {
    site: Rc<RefCell<Site>>,
    frame: FrameLoop,
    settle: Timeout,
    listeners: Vec<Listener>,
}

impl Runtime {
    pub fn mount(window: Window, document: Document, config: SiteConfig) -> Result<Self, JsValue> {
        let settle_ms = i32::try_from(config.snap_settle_ms).unwrap_or(i32::MAX);
        let site = Rc::new(RefCell::new(Site::new(window.clone(), document.clone(), config)?));

        let mut listeners = Vec::new();
        {
            let site = site.clone();
            listeners.push(Listener::new(&window, "scroll", move |_| site.borrow_mut().on_scroll())?);
        }
        {
            let site = site.clone();
            listeners.push(Listener::new(&window, "resize", move |_| site.borrow_mut().refresh())?);
        }

        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;
        for button in dom::query_all(&root, "[data-nav]") {
            let site = site.clone();
            let doc = document.clone();
            let name = button.get_attribute("data-nav").unwrap_or_default();
            listeners.push(Listener::new(&button, "click", move |event: Event| {
                event.prevent_default();
                site.borrow_mut().close_menu();
                nav::navigate(&name, &mut DomScrollTarget { document: &doc });
            })?);
        }
        for button in dom::query_all(&root, "[data-view-work]") {
            let doc = document.clone();
            listeners.push(Listener::new(&button, "click", move |event: Event| {
                event.prevent_default();
                DomScrollTarget { document: &doc }.smooth_scroll_to(WORK_WRAPPER_ID);
            })?);
        }
        if let Some(toggle) = dom::query(&root, "[data-menu-toggle]") {
            let site = site.clone();
            listeners.push(Listener::new(&toggle, "click", move |_| site.borrow_mut().toggle_menu())?);
        }
        if let Some(form) = document.get_element_by_id("contact-form") {
            let site = site.clone();
            listeners.push(Listener::new(&form, "submit", move |event: Event| {
                event.prevent_default();
                site.borrow_mut().submit_contact();
            })?);
        }

        // Snap ranges are built once every pin has been measured.
        let settle = {
            let site = site.clone();
            Timeout::new(&window, settle_ms, move || site.borrow_mut().install_snap())?
        };

        let frame = {
            let site = site.clone();
            FrameLoop::start(&window, move |now| site.borrow_mut().frame(now))?
        };

        Ok(Self {
            site,
            frame,
            settle,
            listeners,
        })
    }

    /// Stops the frame loop and pending timeout, removes every listener, then
    /// kills the sections.
    pub fn destroy(self) {
        let Self {
            site,
            frame,
            settle,
            listeners,
        } = self;
        frame.stop();
        drop(settle);
        drop(listeners);
        site.borrow_mut().destroy();
    }
}
