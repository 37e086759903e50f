use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::{DashboardError, Result};
use crate::hud::{Painter, Rect, Shadow, TextAlign, TextBaseline};

/// Off-screen 2D canvas the HUD is drawn into.
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(document: &Document) -> Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(DashboardError::js_err)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| DashboardError::backend("created element is not a canvas"))?;
        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(DashboardError::js_err)?
            .ok_or_else(|| DashboardError::backend("2d context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DashboardError::backend("not a 2d context"))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Painter for CanvasPainter {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clear_rect(&mut self, r: Rect) {
        self.ctx.clear_rect(r.x, r.y, r.width, r.height);
    }

    fn fill_rect(&mut self, r: Rect) {
        self.ctx.fill_rect(r.x, r.y, r.width, r.height);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ctx.set_shadow_color(&shadow.color);
        self.ctx.set_shadow_blur(shadow.blur);
        self.ctx.set_shadow_offset_x(shadow.offset_x);
        self.ctx.set_shadow_offset_y(shadow.offset_y);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_str());
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(baseline.as_str());
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ctx.fill_text(text, x, y).map_err(DashboardError::js_err)
    }
}
