//! Scroll-driven portfolio site compiled to WebAssembly.
//!
//! Everything outside `wasm` is plain Rust and tested on the host; the `wasm`
//! module binds it to the browser.

pub mod choreography;
pub mod config;
pub mod contact;
pub mod content;
pub mod distortion;
pub mod driver;
pub mod ease;
pub mod error;
pub mod intro;
pub mod nav;
pub mod pin;
pub mod reveal;
pub mod section;
pub mod shader;
pub mod snap;
pub mod timeline;
pub mod velocity;

pub use config::SiteConfig;
pub use error::SiteError;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};

    mod compositor;
    mod dom;
    mod render;
    mod site;

    thread_local! {
        static RUNTIME: RefCell<Option<site::Runtime>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = dom::window()?;
        let document = dom::document(&window)?;
        let json = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        let (config, problem) = SiteConfig::load(json.as_deref());

        console_log::init_with_level(config.log_level()).ok();
        if let Some(err) = problem {
            log::warn!("{err}; using default config");
        }

        let runtime = site::Runtime::mount(window, document, config)?;
        RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
        Ok(())
    }

    /// Smooth-scrolls to `hero`, `work`, `capabilities` or `contact`. Anything
    /// else is ignored.
    #[wasm_bindgen]
    pub fn navigate(name: &str) -> bool {
        let Ok(window) = dom::window() else {
            return false;
        };
        let Ok(document) = dom::document(&window) else {
            return false;
        };
        crate::nav::navigate(name, &mut dom::DomScrollTarget { document: &document })
    }

    /// Tears the site down: no more frames, listeners or snapping.
    #[wasm_bindgen]
    pub fn destroy() {
        if let Some(runtime) = RUNTIME.with(|slot| slot.borrow_mut().take()) {
            runtime.destroy();
        }
    }
}
