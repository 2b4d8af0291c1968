use tracing::trace;

use fraczoom_core::Camera;

use crate::shader_params::ShaderParameters;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Whether the last produced frame still matches the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// The frame on screen is current; ticks produce nothing.
    Idle,
    /// Something changed since the last frame. A fresh scheduler starts
    /// here so the first tick always draws.
    #[default]
    Dirty,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Decides once per display refresh whether a new frame is needed.
///
/// Held pan keys produce a frame on every tick that actually moves the view;
/// otherwise a frame is only built after [`mark_dirty`](Self::mark_dirty).
#[derive(Debug, Default)]
pub struct RenderScheduler {
    state: SchedulerState,
    ticks: u64,
    frames: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.state == SchedulerState::Dirty
    }

    pub fn mark_dirty(&mut self) {
        self.state = SchedulerState::Dirty;
    }

    /// Ticks seen so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames produced so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one refresh tick.
    ///
    /// Advances key panning by one step, then builds parameters if the view
    /// is dirty or the step moved it. Returns `None` when the last frame is
    /// still valid, including when held keys push against the pan box.
    pub fn tick(&mut self, camera: &mut Camera) -> Option<ShaderParameters> {
        self.ticks += 1;
        let moved = camera.advance_pan();
        if self.state == SchedulerState::Idle && !moved {
            return None;
        }

        let params = ShaderParameters::build(camera);
        self.frames += 1;
        self.state = SchedulerState::Idle;
        trace!(
            frame = self.frames,
            tick = self.ticks,
            zoom = camera.zoom(),
            mode = camera.mode().label(),
            "Frame produced"
        );
        Some(params)
    }
}
