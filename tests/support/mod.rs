#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use scroll_portfolio::config::VisibilityOptions;
use scroll_portfolio::error::{PortfolioError, Result};
use scroll_portfolio::handle::Subscription;
use scroll_portfolio::scheduler::ManualScheduler;
use scroll_portfolio::visibility::{BatchCallback, IntersectionEntry, VisibilitySource};
use scroll_portfolio::wave::{DrawSurface, StrokeStyle, Viewport};
use scroll_portfolio::{PageHost, SectionId};

/// Everything a sink received, in order.
pub type Recorded = Rc<RefCell<Vec<String>>>;

pub fn recorder() -> (Recorded, Box<dyn FnMut(&str)>) {
    let log: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (log, Box::new(move |s: &str| sink.borrow_mut().push(s.to_string())))
}

#[derive(Default)]
pub struct FakeViewport {
    width: Cell<f64>,
    next_id: Cell<u64>,
    listeners: Rc<RefCell<Vec<(u64, Box<dyn FnMut()>)>>>,
}

impl FakeViewport {
    pub fn new(width: f64) -> Rc<Self> {
        let viewport = Self::default();
        viewport.width.set(width);
        Rc::new(viewport)
    }

    pub fn resize_to(&self, width: f64) {
        self.width.set(width);
        for (_, listener) in self.listeners.borrow_mut().iter_mut() {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Viewport for FakeViewport {
    fn width(&self) -> f64 {
        self.width.get()
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, callback));
        let listeners = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub width: u32,
    pub height: u32,
    pub resizes: u32,
    pub clears: u32,
    pub strokes: u32,
    pub last_points: Vec<(f64, f64)>,
    pub last_style: Option<StrokeStyle>,
}

impl SurfaceLog {
    /// Any call that touches the drawing surface.
    pub fn writes(&self) -> u32 {
        self.resizes + self.clears + self.strokes
    }
}

pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> (Rc<RefCell<SurfaceLog>>, Box<dyn DrawSurface>) {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        (log.clone(), Box::new(RecordingSurface { log }))
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.log.borrow().width
    }

    fn height(&self) -> u32 {
        self.log.borrow().height
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut log = self.log.borrow_mut();
        log.width = width;
        log.height = height;
        log.resizes += 1;
    }

    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], style: &StrokeStyle) {
        let mut log = self.log.borrow_mut();
        log.strokes += 1;
        log.last_points = points.to_vec();
        log.last_style = Some(style.clone());
    }
}

/// Visibility source driven by hand. `supported = false` behaves like a
/// browser without IntersectionObserver.
pub struct FakeVisibility {
    supported: bool,
    callback: Rc<RefCell<Option<BatchCallback>>>,
    pub observed: RefCell<Vec<SectionId>>,
    pub last_options: RefCell<Option<VisibilityOptions>>,
}

impl FakeVisibility {
    pub fn new() -> Rc<Self> {
        Self::with_support(true)
    }

    pub fn unsupported() -> Rc<Self> {
        Self::with_support(false)
    }

    fn with_support(supported: bool) -> Rc<Self> {
        Rc::new(Self {
            supported,
            callback: Rc::new(RefCell::new(None)),
            observed: RefCell::new(Vec::new()),
            last_options: RefCell::new(None),
        })
    }

    pub fn is_observing(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Delivers one observation batch; ignored once observation stopped.
    pub fn deliver(&self, entries: Vec<IntersectionEntry>) {
        if let Some(callback) = self.callback.borrow_mut().as_mut() {
            callback(entries);
        }
    }

    pub fn scroll_to(&self, section: SectionId) {
        self.deliver(vec![visible(section)]);
    }
}

impl VisibilitySource for FakeVisibility {
    fn observe(
        &self,
        sections: &[SectionId],
        options: &VisibilityOptions,
        on_batch: BatchCallback,
    ) -> Result<Subscription> {
        if !self.supported {
            return Err(PortfolioError::MissingCapability("IntersectionObserver"));
        }
        *self.observed.borrow_mut() = sections.to_vec();
        *self.last_options.borrow_mut() = Some(options.clone());
        *self.callback.borrow_mut() = Some(on_batch);
        let callback = Rc::downgrade(&self.callback);
        Ok(Subscription::new(move || {
            if let Some(callback) = callback.upgrade() {
                callback.borrow_mut().take();
            }
        }))
    }
}

pub fn visible(section: SectionId) -> IntersectionEntry {
    IntersectionEntry { target_id: section.slug().to_string(), is_intersecting: true, ratio: 0.6 }
}

/// Still intersecting, at `ratio` of the region's area.
pub fn partly(section: SectionId, ratio: f64) -> IntersectionEntry {
    IntersectionEntry { target_id: section.slug().to_string(), is_intersecting: true, ratio }
}

pub fn hidden(section: SectionId) -> IntersectionEntry {
    IntersectionEntry { target_id: section.slug().to_string(), is_intersecting: false, ratio: 0.0 }
}

/// Test doubles and the probes to inspect them.
pub struct Harness {
    pub clock: ManualScheduler,
    pub viewport: Rc<FakeViewport>,
    pub visibility: Rc<FakeVisibility>,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub headline: Recorded,
    pub outline: Recorded,
    pub nav: Rc<RefCell<Vec<SectionId>>>,
}

impl Harness {
    pub fn new() -> (Self, PageHost) {
        Self::build(FakeVisibility::new(), true)
    }

    pub fn build(visibility: Rc<FakeVisibility>, with_surface: bool) -> (Self, PageHost) {
        let clock = ManualScheduler::new();
        let viewport = FakeViewport::new(1280.0);
        let (surface, draw) = RecordingSurface::new();
        let (headline, headline_sink) = recorder();
        let (outline, outline_sink) = recorder();
        let nav = Rc::new(RefCell::new(Vec::new()));
        let nav_sink = nav.clone();

        let host = PageHost {
            scheduler: Rc::new(clock.clone()),
            viewport: viewport.clone(),
            visibility: visibility.clone(),
            wave_surface: with_surface.then_some(draw),
            headline: headline_sink,
            outline: outline_sink,
            nav: Some(Box::new(move |section: SectionId| nav_sink.borrow_mut().push(section))),
        };
        let harness = Self { clock, viewport, visibility, surface, headline, outline, nav };
        (harness, host)
    }

    pub fn last_headline(&self) -> String {
        self.headline.borrow().last().cloned().unwrap_or_default()
    }
}
