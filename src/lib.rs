//! Scroll-synchronized animation engine for a single-page portfolio.
//!
//! The host-independent parts (section tracking, headline scramble, outline
//! morph, wave) build on every target and are tested on the host with
//! [`scheduler::ManualScheduler`]. The `wasm` module wires them to the DOM.

pub mod config;
pub mod controller;
pub mod ease;
pub mod error;
pub mod handle;
pub mod morph;
pub mod scheduler;
pub mod scramble;
pub mod section;
pub mod shape;
pub mod state;
pub mod visibility;
pub mod wave;

pub use config::PageConfig;
pub use controller::{AppController, PageHost};
pub use error::{PortfolioError, Result};
pub use section::SectionId;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo::events::EventListener;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::PageTransitionEvent;

    use crate::controller::{AppController, PageHost};
    use crate::wave::DrawSurface;

    mod dom;
    mod observer;
    mod render;
    mod scheduler;

    /// Id of the element that marks a document as the portfolio page.
    const ROOT_ID: &str = "portfolio";

    thread_local! {
        static PAGE: RefCell<Option<AppController>> = const { RefCell::new(None) };
        static LIFECYCLE: RefCell<Vec<EventListener>> = const { RefCell::new(Vec::new()) };
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        if document.get_element_by_id(ROOT_ID).is_none() {
            log::info!("no #{ROOT_ID} element; waiting for mount_page()");
            return Ok(());
        }
        mount_page()?;
        watch_page_lifecycle()
    }

    /// Tears the page down on `pagehide` and mounts it again when the
    /// browser restores it from the back/forward cache. Calling it again
    /// is a no-op.
    #[wasm_bindgen]
    pub fn watch_page_lifecycle() -> Result<(), JsValue> {
        if LIFECYCLE.with(|listeners| !listeners.borrow().is_empty()) {
            return Ok(());
        }
        let window = web_sys::window().ok_or("no window")?;
        let hide = EventListener::new(&window, "pagehide", |_event| unmount_page());
        let show = EventListener::new(&window, "pageshow", |event| {
            let restored = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            if !restored {
                return;
            }
            log::info!("page restored from cache; remounting");
            if let Err(err) = mount_page() {
                log::error!("remount failed: {err:?}");
            }
        });
        LIFECYCLE.with(|listeners| listeners.borrow_mut().extend([hide, show]));
        Ok(())
    }

    /// Builds the generated markup and starts every animation.
    #[wasm_bindgen]
    pub fn mount_page() -> Result<(), JsValue> {
        unmount_page();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let config = dom::read_config(&document)?;

        dom::build_sections(&document)?;
        let nav_links = dom::build_nav(&document)?;
        let headline = dom::element(&document, "headline")?;
        let outline = dom::element(&document, "outline")?;
        let canvas = dom::element(&document, "wave")?.dyn_into::<web_sys::HtmlCanvasElement>()?;

        let host = PageHost {
            scheduler: Rc::new(scheduler::BrowserScheduler),
            viewport: Rc::new(render::WindowViewport::new(window)),
            visibility: Rc::new(observer::BrowserVisibility::new(document)),
            wave_surface: render::CanvasSurface::new(canvas)
                .map(|surface| Box::new(surface) as Box<dyn DrawSurface>),
            headline: Box::new(move |text: &str| headline.set_text_content(Some(text))),
            outline: Box::new(move |d: &str| {
                if let Err(err) = outline.set_attribute("d", d) {
                    log::warn!("could not update outline: {err:?}");
                }
            }),
            nav: Some(Box::new(move |section: crate::SectionId| dom::highlight(&nav_links, section))),
        };

        let controller = AppController::mount(host, &config)?;
        PAGE.with(|page| *page.borrow_mut() = Some(controller));
        Ok(())
    }

    /// Tears the page down: no timer or frame callback runs afterwards.
    #[wasm_bindgen]
    pub fn unmount_page() {
        let page = PAGE.with(|page| page.borrow_mut().take());
        if let Some(mut controller) = page {
            controller.unmount();
        }
    }

    /// Headline text currently on screen, for tests and debugging.
    #[wasm_bindgen]
    pub fn headline_text() -> Option<String> {
        PAGE.with(|page| page.borrow().as_ref().map(|c| c.headline().rendered()))
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{headline_text, mount_page, unmount_page, watch_page_lifecycle};
