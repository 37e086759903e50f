#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use curved_hud::clock::Clock;
use curved_hud::geometry::CurvedMesh;
use curved_hud::hud::{Painter, Rect, Shadow, TextAlign, TextBaseline};
use curved_hud::input::Viewport;
use curved_hud::scene::{FrameHandle, FrameUniforms, Host, RenderBackend, SceneController};
use curved_hud::{DashboardConfig, DashboardError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Resize(u32, u32),
    Save,
    Restore,
    ClearRect(Rect),
    FillRect(Rect),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    Shadow(Shadow),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),
    ClosePath,
    Fill,
    Stroke,
    Text(String, f64, f64),
}

/// Painter that records every call.
#[derive(Clone, Default)]
pub struct RecordingPainter {
    pub ops: Rc<RefCell<Vec<DrawOp>>>,
}

impl RecordingPainter {
    pub fn take(&self) -> Vec<DrawOp> {
        std::mem::take(&mut *self.ops.borrow_mut())
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl Painter for RecordingPainter {
    fn resize(&mut self, width: u32, height: u32) {
        self.push(DrawOp::Resize(width, height));
    }
    fn save(&mut self) {
        self.push(DrawOp::Save);
    }
    fn restore(&mut self) {
        self.push(DrawOp::Restore);
    }
    fn clear_rect(&mut self, rect: Rect) {
        self.push(DrawOp::ClearRect(rect));
    }
    fn fill_rect(&mut self, rect: Rect) {
        self.push(DrawOp::FillRect(rect));
    }
    fn set_fill_style(&mut self, color: &str) {
        self.push(DrawOp::FillStyle(color.to_string()));
    }
    fn set_stroke_style(&mut self, color: &str) {
        self.push(DrawOp::StrokeStyle(color.to_string()));
    }
    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth(width));
    }
    fn set_shadow(&mut self, shadow: &Shadow) {
        self.push(DrawOp::Shadow(shadow.clone()));
    }
    fn set_font(&mut self, font: &str) {
        self.push(DrawOp::Font(font.to_string()));
    }
    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawOp::TextAlign(align));
    }
    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawOp::TextBaseline(baseline));
    }
    fn begin_path(&mut self) {
        self.push(DrawOp::BeginPath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::LineTo(x, y));
    }
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.push(DrawOp::QuadTo(cpx, cpy, x, y));
    }
    fn close_path(&mut self) {
        self.push(DrawOp::ClosePath);
    }
    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }
    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.push(DrawOp::Text(text.to_string(), x, y));
        Ok(())
    }
}

/// Clock moved by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    pub now: Rc<Cell<f64>>,
    pub wall: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn wall_clock_ms(&self) -> f64 {
        self.wall.get()
    }
}

#[derive(Debug, Default)]
pub struct HostLog {
    pub next_id: i32,
    pub requested: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub detach_calls: usize,
}

#[derive(Clone, Default)]
pub struct SpyHost {
    pub log: Rc<RefCell<HostLog>>,
}

impl Host for SpyHost {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let handle = FrameHandle(log.next_id);
        log.requested.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.log.borrow_mut().cancelled.push(handle);
    }

    fn detach_listeners(&mut self) {
        self.log.borrow_mut().detach_calls += 1;
    }
}

#[derive(Debug, Default)]
pub struct BackendLog {
    pub fail_upload: bool,
    pub mesh_vertices: Option<usize>,
    pub resizes: Vec<Viewport>,
    pub hud_uploads: usize,
    pub draws: Vec<FrameUniforms>,
    pub releases: usize,
}

#[derive(Clone, Default)]
pub struct SpyBackend {
    pub log: Rc<RefCell<BackendLog>>,
}

impl RenderBackend for SpyBackend {
    fn upload_mesh(&mut self, mesh: &CurvedMesh) -> Result<()> {
        if self.log.borrow().fail_upload {
            return Err(DashboardError::backend("mesh upload refused"));
        }
        self.log.borrow_mut().mesh_vertices = Some(mesh.vertex_count());
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.log.borrow_mut().resizes.push(*viewport);
    }

    fn upload_hud(&mut self) -> Result<()> {
        self.log.borrow_mut().hud_uploads += 1;
        Ok(())
    }

    fn draw(&mut self, uniforms: &FrameUniforms) -> Result<()> {
        self.log.borrow_mut().draws.push(*uniforms);
        Ok(())
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

pub type TestController = SceneController<SpyBackend, RecordingPainter, ManualClock, SpyHost>;

pub struct Rig {
    pub controller: TestController,
    pub painter: RecordingPainter,
    pub clock: ManualClock,
    pub host: SpyHost,
    pub backend: SpyBackend,
}

/// Controller over recording doubles, started, with the clock at 10 s.
pub fn rig(config: DashboardConfig, width: f64, height: f64) -> Rig {
    let painter = RecordingPainter::default();
    let clock = ManualClock::default();
    clock.set(10_000.0);
    let host = SpyHost::default();
    let backend = SpyBackend::default();

    let mut controller = SceneController::new(
        config,
        width,
        height,
        1.0,
        backend.clone(),
        painter.clone(),
        clock.clone(),
        host.clone(),
    )
    .expect("controller");
    controller.start().expect("start");

    Rig {
        controller,
        painter,
        clock,
        host,
        backend,
    }
}
