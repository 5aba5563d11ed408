use std::f64::consts::TAU;

use flock_core::{Surface, Vector2D, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

/// Reads the window's inner size and device pixel ratio.
pub fn measure(window: &Window) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Viewport::measure(
        width,
        height,
        Some(window.device_pixel_ratio()),
    ))
}

/// 2D canvas context drawing in logical pixels.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Sizes the backing store to `size x ratio`, the CSS box to the logical
    /// size, and scales the context so drawing stays in logical pixels.
    pub fn apply_viewport(&self, viewport: &Viewport) -> Result<(), JsValue> {
        self.canvas.set_width(viewport.backing_width());
        self.canvas.set_height(viewport.backing_height());

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", viewport.width))?;
        style.set_property("height", &format!("{}px", viewport.height))?;

        // resizing the backing store resets the transform
        let [a, b, c, d, e, f] = viewport.transform();
        self.context.set_transform(a, b, c, d, e, f)
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
        self.context.set_line_width(1.0);
    }

    fn stroke_circle(&mut self, center: Vector2D, radius: f64, stroke: &str) {
        self.context.set_stroke_style_str(stroke);
        self.context.begin_path();
        if let Err(err) = self.context.arc(center.x, center.y, radius, 0.0, TAU) {
            console_log!("arc failed: {:?}", err);
            return;
        }
        self.context.stroke();
    }
}
