//! Thin helpers over `web-sys` for the rest of the glue.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, Window};

use crate::error::SiteError;
use crate::nav::ScrollTarget;
use crate::pin::PinMeasure;
use crate::timeline::Style;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or_else(|| SiteError::MissingElement("window".into()))
}

pub fn document(window: &Window) -> Result<Document, SiteError> {
    window
        .document()
        .ok_or_else(|| SiteError::MissingElement("document".into()))
}

pub fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Largest reachable `scrollY`.
pub fn max_scroll(window: &Window, document: &Document) -> f64 {
    let height = document
        .document_element()
        .map(|root| root.scroll_height() as f64)
        .unwrap_or(0.0);
    (height - viewport_height(window)).max(0.0)
}

pub fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

pub fn query(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn query_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

/// Writes `opacity` and `transform` for one animated element.
pub fn apply_style(el: &HtmlElement, style: &Style) {
    let css = el.style();
    for (name, value) in [("opacity", style.opacity.to_string()), ("transform", style.transform())] {
        if let Err(err) = css.set_property(name, &value) {
            log::debug!("failed to set {name}: {err:?}");
        }
    }
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        log::debug!("failed to toggle class {class}: {err:?}");
    }
}

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            log::debug!("failed to remove {} listener: {err:?}", self.kind);
        }
    }
}

/// A pending `setTimeout`, cleared when dropped.
pub struct Timeout {
    window: Window,
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(window: &Window, millis: i32, callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), millis)?;
        Ok(Self {
            window: window.clone(),
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}

/// Pin spacers in the live document. Each pinned `<section>` sits inside a
/// `.pin-spacer` wrapper whose height is the section plus the pin distance.
pub struct DomPinMeasure<'a> {
    pub window: &'a Window,
    pub document: &'a Document,
}

impl DomPinMeasure<'_> {
    fn spacer(&self, id: &str) -> Option<(HtmlElement, HtmlElement)> {
        let section: HtmlElement = by_id(self.document, id)?;
        let spacer = section.parent_element()?.dyn_into::<HtmlElement>().ok()?;
        Some((section, spacer))
    }
}

impl PinMeasure for DomPinMeasure<'_> {
    fn reserve(&mut self, id: &str, distance: f64) {
        if let Some((section, spacer)) = self.spacer(id) {
            let height = section.offset_height() as f64 + distance;
            if let Err(err) = spacer.style().set_property("height", &format!("{height}px")) {
                log::debug!("{id}: failed to size pin spacer: {err:?}");
            }
        }
    }

    fn document_top(&mut self, id: &str) -> Option<f64> {
        let (_, spacer) = self.spacer(id)?;
        Some(spacer.get_bounding_client_rect().top() + scroll_y(self.window))
    }
}

pub struct DomScrollTarget<'a> {
    pub document: &'a Document,
}

impl ScrollTarget for DomScrollTarget<'_> {
    fn smooth_scroll_to(&mut self, id: &str) -> bool {
        let Some(el) = self.document.get_element_by_id(id) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        el.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;
    use crate::timeline::Length;

    wasm_bindgen_test_configure!(run_in_browser);

    fn element() -> HtmlElement {
        let document = document(&window().unwrap()).unwrap();
        document.create_element("div").unwrap().dyn_into().unwrap()
    }

    #[wasm_bindgen_test]
    fn styles_are_written_inline() {
        let el = element();
        let style = Style::hidden_at(Length::ZERO, Length::px(40.0));
        apply_style(&el, &style);
        let css = el.style();
        assert_eq!(css.get_property_value("opacity").unwrap(), "0");
        assert!(css.get_property_value("transform").unwrap().contains("40px"));

        apply_style(&el, &Style::RESTING);
        assert_eq!(css.get_property_value("opacity").unwrap(), "1");
    }

    #[wasm_bindgen_test]
    fn classes_toggle_both_ways() {
        let el = element();
        set_class(&el, "is-open", true);
        assert!(el.class_list().contains("is-open"));
        set_class(&el, "is-open", false);
        assert!(!el.class_list().contains("is-open"));
    }
}
