//! Mount/frame/teardown state machine for the visualization panel.
//!
//! The panel is driven entirely through inbound ports (`on_frame`,
//! `on_resize`/`on_viewport`, `on_pointer_move`, `on_pointer_leave`). Platform concerns
//! (frame scheduling, observers, listeners, the drawing surface itself) sit
//! behind [`PanelHost`] and [`SceneSurface`] so the same lifecycle runs in the
//! browser and under synthetic hosts in tests.

use crate::animation::{advance, normalize_pointer, AnimationState, Bounds, HudReadout, SceneFrame};
use crate::error::BackendError;
use crate::scene::SceneLayout;
use crate::state::{Camera, Viewport};

/// A drawable surface bound to one panel. Owns every GPU-side resource it creates.
pub trait SceneSurface {
    type Error: std::fmt::Debug;

    fn resize(&mut self, viewport: &Viewport);
    fn draw(&mut self, frame: &SceneFrame, camera: &Camera) -> Result<(), Self::Error>;
    /// Destroy buffers/textures. Called exactly once.
    fn release(&mut self);
}

/// Environment the panel is mounted into.
pub trait PanelHost {
    type Surface: SceneSurface;
    type FrameHandle;

    fn viewport(&self) -> Viewport;
    fn prefers_reduced_motion(&self) -> bool;
    /// Schedule one `on_frame` call. `None` when scheduling is impossible.
    fn request_frame(&mut self) -> Option<Self::FrameHandle>;
    fn cancel_frame(&mut self, handle: Self::FrameHandle);
    /// Start delivering resize and pointer events.
    fn connect(&mut self);
    /// Stop delivering resize and pointer events.
    fn disconnect(&mut self);
    fn show_fallback(&mut self);
    /// Detach the rendering element from the container.
    fn remove_surface(&mut self);
    fn publish_hud(&mut self, _hud: &HudReadout) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelPhase {
    /// Waiting for the backend to hand over a surface.
    Pending,
    Running,
    /// No backend; static fallback on screen.
    Fallback,
    Disposed,
}

pub struct PanelLifecycle<H: PanelHost> {
    host: H,
    phase: PanelPhase,
    surface: Option<H::Surface>,
    layout: SceneLayout,
    camera: Camera,
    viewport: Viewport,
    anim: AnimationState,
    pending_frame: Option<H::FrameHandle>,
}

impl<H: PanelHost> PanelLifecycle<H> {
    pub fn new(host: H) -> Self {
        let viewport = host.viewport();
        let mut camera = Camera::default();
        camera.set_viewport(&viewport);
        let anim = AnimationState::new(host.prefers_reduced_motion());
        Self {
            host,
            phase: PanelPhase::Pending,
            surface: None,
            layout: SceneLayout::default(),
            camera,
            viewport,
            anim,
            pending_frame: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn animation(&self) -> &AnimationState {
        &self.anim
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Hand over the backend result. A surface starts the loop; an error shows
    /// the fallback. A surface arriving after teardown is released immediately.
    pub fn mount(&mut self, surface: Result<H::Surface, BackendError>) {
        match (self.phase, surface) {
            (PanelPhase::Pending, Ok(mut s)) => {
                // the container may have changed size while the backend was starting
                self.viewport = self.host.viewport();
                self.camera.set_viewport(&self.viewport);
                s.resize(&self.viewport);
                self.surface = Some(s);
                self.host.connect();
                self.phase = PanelPhase::Running;
                self.pending_frame = self.host.request_frame();
                log::info!(
                    "[panel] running {}x{} @{}x",
                    self.viewport.width,
                    self.viewport.height,
                    self.viewport.pixel_ratio
                );
            }
            (PanelPhase::Pending, Err(e)) => {
                log::warn!("[panel] rendering backend unavailable: {}", e);
                self.host.remove_surface();
                self.host.show_fallback();
                self.phase = PanelPhase::Fallback;
            }
            (phase, Ok(mut s)) => {
                log::info!("[panel] surface arrived in {:?}, releasing", phase);
                s.release();
            }
            (_, Err(_)) => {}
        }
    }

    /// One scheduled frame fired `dt` seconds after the previous one.
    pub fn on_frame(&mut self, dt: f32) {
        if self.phase != PanelPhase::Running {
            return;
        }
        self.pending_frame = None;
        self.anim = advance(&self.anim, dt);
        let frame = SceneFrame::from_state(&self.anim, &self.layout);
        self.camera.eye = frame.camera_eye;
        self.camera.target = frame.camera_target;
        if self.anim.hud_refreshed {
            self.host.publish_hud(&self.anim.hud);
        }
        if let Some(s) = self.surface.as_mut() {
            if let Err(e) = s.draw(&frame, &self.camera) {
                log::error!("[panel] draw failed: {:?}", e);
            }
        }
        self.pending_frame = self.host.request_frame();
    }

    /// Container box changed (CSS pixels), keeping the current pixel ratio.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.on_viewport(width, height, self.viewport.pixel_ratio);
    }

    /// Container box and device pixel ratio observed together. The surface is
    /// resized once per call.
    pub fn on_viewport(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        if self.phase == PanelPhase::Disposed {
            return;
        }
        self.viewport = Viewport::new(width, height, device_pixel_ratio);
        self.camera.set_viewport(&self.viewport);
        if let Some(s) = self.surface.as_mut() {
            s.resize(&self.viewport);
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64, bounds: Bounds) {
        if self.phase == PanelPhase::Disposed {
            return;
        }
        if let Some(target) = normalize_pointer(client_x, client_y, bounds) {
            self.anim.set_pointer_target(target);
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.phase == PanelPhase::Disposed {
            return;
        }
        self.anim.clear_pointer_target();
    }

    /// Stop the loop and release everything. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.phase == PanelPhase::Disposed {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
        if self.phase == PanelPhase::Running {
            self.host.disconnect();
        }
        if let Some(mut s) = self.surface.take() {
            s.release();
        }
        self.host.remove_surface();
        log::info!("[panel] unmounted from {:?}", self.phase);
        self.phase = PanelPhase::Disposed;
    }
}
