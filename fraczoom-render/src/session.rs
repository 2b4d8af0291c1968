//! The single entry point the host UI talks to.
//!
//! A [`Session`] owns the camera, the canvas geometry and the frame
//! scheduler. Input arrives either through the `on_*` methods or as an
//! [`InputEvent`] passed to [`Session::handle`]; frames leave through
//! [`Session::maybe_render_frame`] or a [`FrameSink`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fraczoom_core::{Camera, Complex, FractalKind, NewtonColouring, PanDirection, Rect, Viewport};

use crate::scheduler::RenderScheduler;
use crate::settings::{SessionSettings, MAX_RESOLUTION_SCALE, MIN_RESOLUTION_SCALE};
use crate::shader_params::ShaderParameters;

// ---------------------------------------------------------------------------
// Frame sink
// ---------------------------------------------------------------------------

/// Receives each produced frame. Submission is fire-and-forget.
pub trait FrameSink {
    fn submit(&mut self, params: &ShaderParameters);
}

impl<F: FnMut(&ShaderParameters)> FrameSink for F {
    fn submit(&mut self, params: &ShaderParameters) {
        self(params)
    }
}

// ---------------------------------------------------------------------------
// Input events
// ---------------------------------------------------------------------------

/// One primitive event from the host UI, in window coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    Scroll {
        delta_y: f64,
        x: f64,
        y: f64,
    },
    /// Pointer moved by `(dx, dy)` while held; `(x, y)` is where the drag
    /// started.
    Drag {
        dx: f64,
        dy: f64,
        x: f64,
        y: f64,
    },
    KeyDown {
        direction: PanDirection,
    },
    KeyUp {
        direction: PanDirection,
    },
    Resize {
        canvas: Rect,
    },
    ResolutionScale {
        scale: f64,
    },
    DisplayScale {
        scale: f64,
    },
    Mode {
        mode: FractalKind,
    },
    Reset,
    Root {
        index: usize,
        value: Complex,
    },
    StepCount {
        steps: u32,
    },
    ColourPeriod {
        period: u32,
    },
    ZoomSlider {
        zoom_log2: f64,
    },
    PrecisionCutoff {
        cutoff: f64,
    },
    NewtonColouring {
        colouring: NewtonColouring,
    },
    /// Set the Julia `c` directly, e.g. from a numeric entry field.
    JuliaSeed {
        seed: Complex,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session {
    camera: Camera,
    viewport: Viewport,
    scheduler: RenderScheduler,
    scroll_sensitivity: f64,
}

impl Session {
    /// Start a session with a default camera tuned by `settings`.
    pub fn new(settings: &SessionSettings, canvas: Rect) -> crate::Result<Self> {
        let mut camera = Camera::default();
        camera.set_step_count(settings.step_count);
        camera.set_colour_period(settings.colour_period);
        camera.set_precision_cutoff(settings.precision_cutoff_log2.exp2());
        Self::with_camera(settings, canvas, camera)
    }

    /// Start a session from a restored camera.
    pub fn with_camera(
        settings: &SessionSettings,
        canvas: Rect,
        camera: Camera,
    ) -> crate::Result<Self> {
        settings.validate()?;
        let viewport = Viewport::new(canvas, settings.display_scale, settings.resolution_scale)?;
        info!(
            width = canvas.width,
            height = canvas.height,
            mode = camera.mode().label(),
            zoom = camera.zoom(),
            "Session started"
        );
        Ok(Self {
            camera,
            viewport,
            scheduler: RenderScheduler::new(),
            scroll_sensitivity: settings.scroll_sensitivity,
        })
    }

    // -- Accessors --

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Surface size the renderer should allocate.
    pub fn draw_size(&self) -> (f64, f64) {
        self.viewport.scaled_draw_size()
    }

    /// Fractal coordinate under a window position, for status readouts.
    pub fn fractal_point(&self, x: f64, y: f64) -> Complex {
        self.camera.fractal_point(x, y, &self.viewport)
    }

    // -- Dispatch --

    /// Route one event to its handler.
    pub fn handle(&mut self, event: InputEvent) -> crate::Result<()> {
        match event {
            InputEvent::Scroll { delta_y, x, y } => self.on_scroll(delta_y, x, y),
            InputEvent::Drag { dx, dy, x, y } => {
                self.on_drag_delta(dx, dy, x, y);
            }
            InputEvent::KeyDown { direction } => self.on_key_down(direction),
            InputEvent::KeyUp { direction } => self.on_key_up(direction),
            InputEvent::Resize { canvas } => self.on_resize(canvas)?,
            InputEvent::ResolutionScale { scale } => self.on_resolution_scale_change(scale)?,
            InputEvent::DisplayScale { scale } => self.on_display_scale_change(scale)?,
            InputEvent::Mode { mode } => self.on_mode_change(mode),
            InputEvent::Reset => self.on_reset(),
            InputEvent::Root { index, value } => self.on_root_change(index, value)?,
            InputEvent::StepCount { steps } => self.on_step_count_change(steps),
            InputEvent::ColourPeriod { period } => self.on_colour_period_change(period),
            InputEvent::ZoomSlider { zoom_log2 } => self.on_zoom_slider(zoom_log2),
            InputEvent::PrecisionCutoff { cutoff } => self.on_precision_cutoff_change(cutoff),
            InputEvent::NewtonColouring { colouring } => {
                self.on_newton_colouring_change(colouring)
            }
            InputEvent::JuliaSeed { seed } => self.on_julia_seed_change(seed),
        }
        Ok(())
    }

    // -- Navigation --

    pub fn on_scroll(&mut self, delta_y: f64, x: f64, y: f64) {
        self.camera.apply_scroll_with_sensitivity(
            delta_y,
            x,
            y,
            self.scroll_sensitivity,
            &self.viewport,
        );
        self.scheduler.mark_dirty();
    }

    /// Returns `false` when the drag started off the canvas and was ignored.
    pub fn on_drag_delta(&mut self, dx: f64, dy: f64, x: f64, y: f64) -> bool {
        let moved = self.camera.apply_drag(dx, dy, x, y, &self.viewport);
        if moved {
            self.scheduler.mark_dirty();
        }
        moved
    }

    pub fn on_key_down(&mut self, direction: PanDirection) {
        if self.camera.press_key(direction) {
            self.scheduler.mark_dirty();
        }
    }

    /// Releasing a key changes nothing on screen, so it never schedules a
    /// frame.
    pub fn on_key_up(&mut self, direction: PanDirection) {
        self.camera.release_key(direction);
    }

    pub fn on_zoom_slider(&mut self, zoom_log2: f64) {
        self.camera.set_zoom_log2(zoom_log2, &self.viewport);
        self.scheduler.mark_dirty();
    }

    // -- Geometry --

    pub fn on_resize(&mut self, canvas: Rect) -> crate::Result<()> {
        self.viewport = self.viewport.with_canvas(canvas)?;
        debug!(width = canvas.width, height = canvas.height, "Canvas resized");
        self.scheduler.mark_dirty();
        Ok(())
    }

    /// Change the render downsampling factor, clamped to `1..=8`.
    ///
    /// The zoom is scaled by `old / new` so each window pixel keeps showing
    /// the same fractal point.
    pub fn on_resolution_scale_change(&mut self, scale: f64) -> crate::Result<()> {
        let scale = scale.clamp(MIN_RESOLUTION_SCALE, MAX_RESOLUTION_SCALE);
        let old = self.viewport.resolution_scale;
        self.viewport = self.viewport.with_resolution_scale(scale)?;
        self.camera.rescale_zoom(old / scale);
        debug!(from = old, to = scale, "Resolution scale changed");
        self.scheduler.mark_dirty();
        Ok(())
    }

    /// The window moved to a monitor with a different pixel density. The
    /// zoom is scaled by `new / old` to keep the picture in place.
    pub fn on_display_scale_change(&mut self, scale: f64) -> crate::Result<()> {
        let old = self.viewport.display_scale;
        self.viewport = self.viewport.with_display_scale(scale)?;
        self.camera.rescale_zoom(scale / old);
        debug!(from = old, to = scale, "Display scale changed");
        self.scheduler.mark_dirty();
        Ok(())
    }

    // -- Fractal parameters --

    pub fn on_mode_change(&mut self, mode: FractalKind) {
        if self.camera.set_mode(mode) {
            self.scheduler.mark_dirty();
        }
    }

    pub fn on_reset(&mut self) {
        self.camera.reset();
        self.scheduler.mark_dirty();
    }

    pub fn on_root_change(&mut self, index: usize, value: Complex) -> crate::Result<()> {
        self.camera.set_root(index, value)?;
        self.scheduler.mark_dirty();
        Ok(())
    }

    pub fn on_step_count_change(&mut self, steps: u32) {
        self.camera.set_step_count(steps);
        self.scheduler.mark_dirty();
    }

    pub fn on_colour_period_change(&mut self, period: u32) {
        self.camera.set_colour_period(period);
        self.scheduler.mark_dirty();
    }

    pub fn on_precision_cutoff_change(&mut self, cutoff: f64) {
        self.camera.set_precision_cutoff(cutoff);
        self.scheduler.mark_dirty();
    }

    pub fn on_newton_colouring_change(&mut self, colouring: NewtonColouring) {
        self.camera.set_newton_colouring(colouring);
        self.scheduler.mark_dirty();
    }

    pub fn on_julia_seed_change(&mut self, seed: Complex) {
        self.camera.set_julia_seed(seed);
        self.scheduler.mark_dirty();
    }

    // -- Frames --

    /// Run one scheduler tick. `Some` means the surface must be redrawn.
    pub fn maybe_render_frame(&mut self) -> Option<ShaderParameters> {
        self.scheduler.tick(&mut self.camera)
    }

    /// Run one scheduler tick and hand any produced frame to `sink`.
    /// Returns whether a frame was submitted.
    pub fn tick(&mut self, sink: &mut impl FrameSink) -> bool {
        match self.maybe_render_frame() {
            Some(params) => {
                sink.submit(&params);
                true
            }
            None => false,
        }
    }
}
