//! Continuously scrolling sine wave along the bottom of the viewport.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::WaveParams;
use crate::handle::{AnimationHandle, Subscription};
use crate::scheduler::Scheduler;

/// Stroke settings for one polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub line_width: f64,
}

/// A 2D drawing surface, e.g. a canvas with its context.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn stroke_polyline(&mut self, points: &[(f64, f64)], style: &StrokeStyle);
}

/// Viewport dimensions and resize notifications.
pub trait Viewport {
    fn width(&self) -> f64;
    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Subscription;
}

/// Points of one wave frame: a start at mid-height, then one point per
/// horizontal pixel.
pub fn wave_points(width: u32, height: u32, phase: f64, params: &WaveParams) -> Vec<(f64, f64)> {
    let mid = f64::from(height) / 2.0;
    let mut points = Vec::with_capacity(width as usize + 1);
    points.push((0.0, mid));
    for x in 0..width {
        let x = f64::from(x);
        points.push((x, (x * params.frequency + phase).sin() * params.amplitude + mid));
    }
    points
}

struct WaveState {
    phase: f64,
    frames: u64,
    frame: Option<AnimationHandle>,
    resize: Option<Subscription>,
}

struct WaveShared {
    scheduler: Rc<dyn Scheduler>,
    viewport: Rc<dyn Viewport>,
    params: WaveParams,
    style: StrokeStyle,
    state: RefCell<WaveState>,
    surface: RefCell<Box<dyn DrawSurface>>,
}

/// Draws the wave every frame for as long as it is mounted.
pub struct WaveRenderer {
    shared: Rc<WaveShared>,
}

impl WaveRenderer {
    /// Sizes the surface to the viewport, hooks resize, draws the first
    /// frame and keeps requesting frames until [`WaveRenderer::unmount`].
    pub fn mount(
        scheduler: Rc<dyn Scheduler>,
        viewport: Rc<dyn Viewport>,
        surface: Box<dyn DrawSurface>,
        params: WaveParams,
    ) -> Self {
        let style = StrokeStyle { color: params.stroke.clone(), line_width: params.line_width };
        let shared = Rc::new(WaveShared {
            scheduler,
            viewport,
            params,
            style,
            state: RefCell::new(WaveState { phase: 0.0, frames: 0, frame: None, resize: None }),
            surface: RefCell::new(surface),
        });

        let weak = Rc::downgrade(&shared);
        let resize = shared.viewport.on_resize(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Self::fit_to_viewport(&shared);
            }
        }));
        shared.state.borrow_mut().resize = Some(resize);
        Self::fit_to_viewport(&shared);
        log::debug!("wave mounted at {}px", shared.surface.borrow().width());

        Self::draw_frame(&shared);
        Self { shared }
    }

    pub fn phase(&self) -> f64 {
        self.shared.state.borrow().phase
    }

    pub fn frames_drawn(&self) -> u64 {
        self.shared.state.borrow().frames
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().frame.is_some()
    }

    /// Releases the pending frame request and the resize listener together.
    pub fn unmount(&self) {
        let (frame, resize) = {
            let mut st = self.shared.state.borrow_mut();
            (st.frame.take(), st.resize.take())
        };
        drop(frame);
        drop(resize);
        log::debug!("wave unmounted after {} frames", self.frames_drawn());
    }

    fn fit_to_viewport(shared: &WaveShared) {
        let width = shared.viewport.width().max(0.0) as u32;
        shared.surface.borrow_mut().resize(width, shared.params.height);
    }

    fn draw_frame(shared: &Rc<WaveShared>) {
        let phase = shared.state.borrow().phase;
        {
            let mut surface = shared.surface.borrow_mut();
            let points = wave_points(surface.width(), surface.height(), phase, &shared.params);
            surface.clear();
            surface.stroke_polyline(&points, &shared.style);
        }

        let weak: Weak<WaveShared> = Rc::downgrade(shared);
        let next = shared.scheduler.request_frame(Box::new(move |_ts| {
            if let Some(shared) = weak.upgrade() {
                Self::draw_frame(&shared);
            }
        }));
        let mut st = shared.state.borrow_mut();
        st.phase += shared.params.speed;
        st.frames += 1;
        st.frame = Some(next);
    }
}

impl Drop for WaveRenderer {
    fn drop(&mut self) {
        let mut st = self.shared.state.borrow_mut();
        st.frame = None;
        st.resize = None;
    }
}
