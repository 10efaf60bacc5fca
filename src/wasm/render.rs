use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::handle::Subscription;
use crate::wave::{DrawSurface, StrokeStyle, Viewport};

/// Canvas with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the browser hands out no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, f64::from(self.width()), f64::from(self.height()));
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], style: &StrokeStyle) {
        let Some(((x0, y0), rest)) = points.split_first() else { return };
        self.ctx.begin_path();
        self.ctx.move_to(*x0, *y0);
        for (x, y) in rest {
            self.ctx.line_to(*x, *y);
        }
        self.ctx.set_stroke_style_str(&style.color);
        self.ctx.set_line_width(style.line_width);
        self.ctx.stroke();
    }
}

pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Viewport for WindowViewport {
    fn width(&self) -> f64 {
        self.window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0)
    }

    fn on_resize(&self, mut callback: Box<dyn FnMut()>) -> Subscription {
        let listener = EventListener::new(&self.window, "resize", move |_event| callback());
        Subscription::new(move || drop(listener))
    }
}
