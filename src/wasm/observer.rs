use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::VisibilityOptions;
use crate::error::{PortfolioError, Result};
use crate::handle::Subscription;
use crate::section::SectionId;
use crate::visibility::{BatchCallback, IntersectionEntry, VisibilitySource};

/// `IntersectionObserver` rooted at the viewport.
pub struct BrowserVisibility {
    document: Document,
}

impl BrowserVisibility {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl VisibilitySource for BrowserVisibility {
    fn observe(
        &self,
        sections: &[SectionId],
        options: &VisibilityOptions,
        mut on_batch: BatchCallback,
    ) -> Result<Subscription> {
        let regions: Vec<Element> = sections
            .iter()
            .filter_map(|section| {
                let region = self.document.get_element_by_id(section.slug());
                if region.is_none() {
                    log::warn!("no region for section {section}");
                }
                region
            })
            .collect();

        let callback = Closure::wrap(Box::new(move |entries: Array| {
            let batch = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| IntersectionEntry {
                    target_id: entry.target().id(),
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                })
                .collect();
            on_batch(batch);
        }) as Box<dyn FnMut(Array)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|_| PortfolioError::MissingCapability("IntersectionObserver"))?;

        for region in &regions {
            observer.observe(region);
        }
        log::debug!("observing {} regions", regions.len());

        Ok(Subscription::new(move || {
            for region in &regions {
                observer.unobserve(region);
            }
            observer.disconnect();
            drop(callback);
        }))
    }
}
