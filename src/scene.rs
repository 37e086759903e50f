//! Scene ownership and the render loop.

use cgmath::{Matrix4, Vector3};

use crate::camera::CameraRig;
use crate::clock::Clock;
use crate::config::{DashboardConfig, MeshPlacement};
use crate::error::Result;
use crate::geometry::CurvedMesh;
use crate::hud::{HudCompositor, HudInput, HudSize, Painter};
use crate::input::{InputBridge, Viewport};

/// Identifier returned by the host when a frame callback is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// The windowing side: frame scheduling and event listeners.
pub trait Host {
    fn request_frame(&mut self) -> Result<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn detach_listeners(&mut self);
}

/// Per-frame values handed to the GPU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub time: f32,
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model: Matrix4<f32>,
    /// The model matrix flips handedness; front-face winding must flip too.
    pub mirrored: bool,
}

/// The GPU side. Draws the back faces of the mesh with the HUD as texture.
pub trait RenderBackend {
    fn upload_mesh(&mut self, mesh: &CurvedMesh) -> Result<()>;
    fn resize(&mut self, viewport: &Viewport);
    /// Re-read the HUD surface into its texture.
    fn upload_hud(&mut self) -> Result<()>;
    fn draw(&mut self, uniforms: &FrameUniforms) -> Result<()>;
    fn release(&mut self);
}

/// `Running` from construction until `teardown`; there is no way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderLoop {
    Running { handle: Option<FrameHandle> },
    TornDown,
}

impl RenderLoop {
    pub fn is_running(&self) -> bool {
        matches!(self, RenderLoop::Running { .. })
    }

    /// Schedule the next frame, keeping only the newest handle. Returns false
    /// once torn down.
    pub fn schedule<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<bool> {
        match self {
            RenderLoop::Running { handle } => {
                *handle = Some(host.request_frame()?);
                Ok(true)
            }
            RenderLoop::TornDown => Ok(false),
        }
    }

    /// Cancel the pending frame, if any. Only the first call does anything.
    pub fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        match std::mem::replace(self, RenderLoop::TornDown) {
            RenderLoop::Running { handle } => {
                if let Some(handle) = handle {
                    host.cancel_frame(handle);
                }
                true
            }
            RenderLoop::TornDown => false,
        }
    }
}

pub fn model_matrix(placement: &MeshPlacement) -> Matrix4<f32> {
    let sx = if placement.mirror_x { -1.0 } else { 1.0 };
    Matrix4::from_translation(Vector3::new(0.0, 0.0, placement.offset_z as f32))
        * Matrix4::from_nonuniform_scale(sx, 1.0, 1.0)
}

pub struct SceneController<R, P, C, H>
where
    R: RenderBackend,
    P: Painter,
    C: Clock,
    H: Host,
{
    config: DashboardConfig,
    viewport: Viewport,
    camera: CameraRig,
    mesh: CurvedMesh,
    model: Matrix4<f32>,
    hud: HudCompositor<P>,
    input: InputBridge,
    backend: R,
    clock: C,
    host: H,
    render_loop: RenderLoop,
    time: f32,
}

impl<R, P, C, H> SceneController<R, P, C, H>
where
    R: RenderBackend,
    P: Painter,
    C: Clock,
    H: Host,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: DashboardConfig,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        mut backend: R,
        painter: P,
        clock: C,
        host: H,
    ) -> Result<Self> {
        let viewport = Viewport::new(width, height, device_pixel_ratio, clock.now_ms());

        // The backend already holds a GPU context; give it back on failure.
        let prepared = config
            .validate()
            .and_then(|()| config.surface.build())
            .and_then(|mesh| backend.upload_mesh(&mesh).map(|()| mesh));
        let mesh = match prepared {
            Ok(mesh) => mesh,
            Err(err) => {
                backend.release();
                return Err(err);
            }
        };

        // Translation and the x mirror leave the extent unchanged.
        let extent = mesh.bounds().size();
        let hud_size = HudSize::from_extent(extent.x, extent.y);
        let hud = HudCompositor::new(painter, hud_size, config.hud.clone());

        backend.resize(&viewport);

        log::info!(
            "dashboard: {} vertices, hud {}x{}, viewport {}x{} @{}x",
            mesh.vertex_count(),
            hud_size.width,
            hud_size.height,
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );

        Ok(Self {
            camera: CameraRig::new(config.camera, width, height),
            model: model_matrix(&config.placement),
            config,
            viewport,
            mesh,
            hud,
            input: InputBridge::new(),
            backend,
            clock,
            host,
            render_loop: RenderLoop::Running { handle: None },
            time: 0.0,
        })
    }

    /// Schedule the first frame.
    pub fn start(&mut self) -> Result<()> {
        self.render_loop.schedule(&mut self.host)?;
        Ok(())
    }

    /// Frame callback body. Reschedules itself first, then renders. Returns
    /// false without doing anything once torn down.
    pub fn frame(&mut self) -> Result<bool> {
        if !self.render_loop.schedule(&mut self.host)? {
            return Ok(false);
        }
        self.tick()?;
        Ok(true)
    }

    fn tick(&mut self) -> Result<()> {
        let now_ms = self.clock.now_ms();
        let elapsed_ms = (now_ms - self.viewport.started_at_ms).max(0.0);
        self.time = self.time.max((elapsed_ms / self.config.time_scale) as f32);

        let now_secs = now_ms / 1000.0;
        if let Some(offset) = self.input.take_pending() {
            let target = self.camera.target_for(offset.x, offset.y);
            log::debug!("camera transition to ({:.3}, {:.3})", target.x, target.y);
            self.camera.transition_to(target, now_secs);
        }
        self.camera.advance(now_secs);

        self.hud.redraw(&HudInput {
            elapsed_ms,
            wall_clock_ms: self.clock.wall_clock_ms(),
        })?;
        if self.hud.take_dirty() {
            self.backend.upload_hud()?;
        }

        self.backend.draw(&FrameUniforms {
            time: self.time,
            projection: self.camera.projection().matrix(),
            view: self.camera.view_matrix(),
            model: self.model,
            mirrored: self.config.placement.mirror_x,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        log::debug!("resize to {width}x{height}");
        self.viewport.width = width;
        self.viewport.height = height;
        self.camera.resize(width, height);
        self.backend.resize(&self.viewport);
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) {
        self.input.pointer_move(client_x, client_y, &self.viewport);
    }

    /// Wheel events are wired up but have no effect yet.
    pub fn wheel(&mut self, delta: f64) {
        log::trace!("wheel {delta}");
    }

    /// Stop the loop, detach listeners and release the GPU context. Only the
    /// first call has an effect.
    pub fn teardown(&mut self) {
        if !self.render_loop.teardown(&mut self.host) {
            return;
        }
        self.host.detach_listeners();
        self.backend.release();
        log::info!("dashboard torn down");
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn render_loop(&self) -> RenderLoop {
        self.render_loop
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn mesh(&self) -> &CurvedMesh {
        &self.mesh
    }

    pub fn hud(&self) -> &HudCompositor<P> {
        &self.hud
    }

    pub fn input(&self) -> &InputBridge {
        &self.input
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
