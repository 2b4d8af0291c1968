use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Deepest zoom, as a power of two. Past this the double-float pair runs out
/// of bits.
pub const MAX_ZOOM_LOG2: f64 = 50.0;

pub const DEFAULT_ZOOM: f64 = 300.0;
pub const DEFAULT_OFFSET: Complex = Complex::new(-2.85, -1.32);
pub const DEFAULT_STEP_COUNT: u32 = 500;
pub const DEFAULT_COLOUR_PERIOD: u32 = 100;
/// Zoom above which the shader switches to double-float math: `2^22`.
pub const DEFAULT_PRECISION_CUTOFF: f64 = 4_194_304.0;

pub const MIN_STEP_COUNT: u32 = 2;
/// Higher step counts can hang the GPU on an all-interior frame.
pub const MAX_STEP_COUNT: u32 = 20_000;

/// Scroll-to-zoom tuning: log2 zoom change per unit of scroll delta, per
/// unit of current log2 zoom.
pub const SCROLL_SENSITIVITY: f64 = 0.0005;
/// Lower bound on the log2 zoom used to scale scroll steps, so shallow
/// zooms still move.
pub const SCROLL_FLOOR_LOG2: f64 = 1.0;

/// Key panning speed in canvas pixels per tick.
pub const KEY_PAN_PIXELS: f64 = 10.0;
/// Key panning keeps the moving coordinate inside `[-2, 2]²`.
pub const PAN_LIMIT: f64 = 2.0;
/// Newton roots are kept inside `[-5, 5]²`.
pub const ROOT_LIMIT: f64 = 5.0;

pub const ROOT_COUNT: usize = 3;

/// The cube roots of unity: the classic `z³ - 1` Newton fractal.
pub const DEFAULT_ROOTS: [Complex; ROOT_COUNT] = [
    Complex::new(1.0, 0.0),
    Complex::new(-0.5, 0.866_025_403_784_438_6),
    Complex::new(-0.5, -0.866_025_403_784_438_6),
];

// ---------------------------------------------------------------------------
// Modes and keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    #[default]
    Mandelbrot,
    Julia,
    Newton,
}

impl FractalKind {
    /// Newton fractals live on a fixed-scale plane and may zoom out past 1.
    pub fn min_zoom(self) -> f64 {
        match self {
            Self::Newton => 0.001,
            Self::Mandelbrot | Self::Julia => 1.0,
        }
    }

    /// Julia mode pans and zooms the seed rather than the offset.
    pub fn moves_seed(self) -> bool {
        self == Self::Julia
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
            Self::Newton => "Newton",
        }
    }
}

/// How Newton mode colours a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewtonColouring {
    /// By which root the iteration converged to.
    #[default]
    Root,
    /// By how many iterations convergence took.
    Iterations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

impl PanDirection {
    fn bit(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 1 << 1,
            Self::Up => 1 << 2,
            Self::Down => 1 << 3,
        }
    }
}

/// Set of currently held pan keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKeys(u8);

impl HeldKeys {
    #[inline]
    fn contains(self, direction: PanDirection) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Net direction per axis in canvas space (y up); opposing keys cancel.
    fn axes(self) -> (f64, f64) {
        let axis = |neg: PanDirection, pos: PanDirection| {
            self.contains(pos) as i8 as f64 - self.contains(neg) as i8 as f64
        };
        (
            axis(PanDirection::Left, PanDirection::Right),
            axis(PanDirection::Down, PanDirection::Up),
        )
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// Persistent view and fractal parameters.
///
/// A fractal-space point is `canvas_pixel / zoom + moving`, where the moving
/// field is `offset` in Mandelbrot and Newton mode and `julia_seed` in Julia
/// mode. All mutators keep `mode.min_zoom() ≤ zoom ≤ 2^50`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    zoom: f64,
    offset: Complex,
    julia_seed: Complex,
    mode: FractalKind,
    step_count: u32,
    colour_period: u32,
    precision_cutoff: f64,
    roots: [Complex; ROOT_COUNT],
    newton_colouring: NewtonColouring,
    #[serde(skip)]
    held: HeldKeys,
}

/// Clamps every field into range on load so restored views keep the
/// camera invariants.
impl<'de> Deserialize<'de> for Camera {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            zoom: f64,
            offset: Complex,
            julia_seed: Complex,
            mode: FractalKind,
            step_count: u32,
            colour_period: u32,
            #[serde(default = "default_precision_cutoff")]
            precision_cutoff: f64,
            #[serde(default = "default_roots")]
            roots: [Complex; ROOT_COUNT],
            #[serde(default)]
            newton_colouring: NewtonColouring,
        }
        let raw = Raw::deserialize(deserializer)?;
        let mut camera = Self {
            zoom: raw.zoom,
            offset: raw.offset,
            julia_seed: raw.julia_seed,
            mode: raw.mode,
            newton_colouring: raw.newton_colouring,
            ..Self::default()
        };
        camera.clamp_zoom();
        camera.set_step_count(raw.step_count);
        camera.set_colour_period(raw.colour_period);
        camera.set_precision_cutoff(raw.precision_cutoff);
        for (i, root) in raw.roots.into_iter().enumerate() {
            camera.roots[i] = root.clamp(-ROOT_LIMIT, ROOT_LIMIT);
        }
        Ok(camera)
    }
}

fn default_precision_cutoff() -> f64 {
    DEFAULT_PRECISION_CUTOFF
}

fn default_roots() -> [Complex; ROOT_COUNT] {
    DEFAULT_ROOTS
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            offset: DEFAULT_OFFSET,
            julia_seed: Complex::ZERO,
            mode: FractalKind::Mandelbrot,
            step_count: DEFAULT_STEP_COUNT,
            colour_period: DEFAULT_COLOUR_PERIOD,
            precision_cutoff: DEFAULT_PRECISION_CUTOFF,
            roots: DEFAULT_ROOTS,
            newton_colouring: NewtonColouring::Root,
            held: HeldKeys::default(),
        }
    }
}

impl Camera {
    // -- Accessors --

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[inline]
    pub fn offset(&self) -> Complex {
        self.offset
    }

    #[inline]
    pub fn julia_seed(&self) -> Complex {
        self.julia_seed
    }

    #[inline]
    pub fn mode(&self) -> FractalKind {
        self.mode
    }

    #[inline]
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    #[inline]
    pub fn colour_period(&self) -> u32 {
        self.colour_period
    }

    #[inline]
    pub fn precision_cutoff(&self) -> f64 {
        self.precision_cutoff
    }

    #[inline]
    pub fn roots(&self) -> [Complex; ROOT_COUNT] {
        self.roots
    }

    #[inline]
    pub fn newton_colouring(&self) -> NewtonColouring {
        self.newton_colouring
    }

    /// The coordinate that pan and zoom act on in the current mode.
    #[inline]
    pub fn moving(&self) -> Complex {
        if self.mode.moves_seed() {
            self.julia_seed
        } else {
            self.offset
        }
    }

    #[inline]
    fn moving_mut(&mut self) -> &mut Complex {
        if self.mode.moves_seed() {
            &mut self.julia_seed
        } else {
            &mut self.offset
        }
    }

    /// Whether the shader should use double-float math for this view.
    #[inline]
    pub fn uses_double_precision(&self) -> bool {
        self.zoom > self.precision_cutoff
    }

    /// The fractal-space point under a window position.
    pub fn fractal_point(&self, pointer_x: f64, pointer_y: f64, viewport: &Viewport) -> Complex {
        viewport.window_to_canvas(pointer_x, pointer_y) / self.zoom + self.moving()
    }

    fn zoom_bounds(&self) -> (f64, f64) {
        (self.mode.min_zoom(), MAX_ZOOM_LOG2.exp2())
    }

    fn clamp_zoom(&mut self) {
        let (min, max) = self.zoom_bounds();
        self.zoom = self.zoom.clamp(min, max);
    }

    // -- Zoom --

    /// Set the zoom while keeping the fractal point under the pointer fixed.
    ///
    /// `new_zoom` is clamped into the mode's range first.
    pub fn zoom_centred(
        &mut self,
        pointer_x: f64,
        pointer_y: f64,
        new_zoom: f64,
        viewport: &Viewport,
    ) {
        let (min, max) = self.zoom_bounds();
        let new_zoom = new_zoom.clamp(min, max);
        let centre = viewport.window_to_canvas(pointer_x, pointer_y);
        let delta = centre / self.zoom - centre / new_zoom;
        *self.moving_mut() += delta;
        self.zoom = new_zoom;
    }

    /// Scroll-wheel zoom with the default [`SCROLL_SENSITIVITY`].
    pub fn apply_scroll(
        &mut self,
        scroll_delta_y: f64,
        pointer_x: f64,
        pointer_y: f64,
        viewport: &Viewport,
    ) {
        self.apply_scroll_with_sensitivity(
            scroll_delta_y,
            pointer_x,
            pointer_y,
            SCROLL_SENSITIVITY,
            viewport,
        );
    }

    /// Scroll-wheel zoom in log2 space.
    ///
    /// Each step is proportional to the current log2 zoom, so a scroll tick
    /// feels the same at any depth.
    pub fn apply_scroll_with_sensitivity(
        &mut self,
        scroll_delta_y: f64,
        pointer_x: f64,
        pointer_y: f64,
        sensitivity: f64,
        viewport: &Viewport,
    ) {
        let current = self.zoom.log2();
        let step = scroll_delta_y * sensitivity * current.max(SCROLL_FLOOR_LOG2);
        let target = (current + step).clamp(self.mode.min_zoom().log2(), MAX_ZOOM_LOG2);
        self.zoom_centred(pointer_x, pointer_y, target.exp2(), viewport);
    }

    /// Zoom-slider semantics: set `log2(zoom)` centred on the canvas.
    pub fn set_zoom_log2(&mut self, zoom_log2: f64, viewport: &Viewport) {
        let (x, y) = viewport.canvas_centre_window();
        self.zoom_centred(x, y, zoom_log2.exp2(), viewport);
    }

    /// Multiply the zoom by `ratio`, keeping it in range. Used to hold the
    /// picture steady when the pixel density of the canvas changes.
    pub fn rescale_zoom(&mut self, ratio: f64) {
        self.zoom *= ratio;
        self.clamp_zoom();
    }

    // -- Pan --

    /// Drag the view by a window-space delta.
    ///
    /// Returns `false` without touching anything when the drag started off
    /// the canvas.
    pub fn apply_drag(
        &mut self,
        delta_x: f64,
        delta_y: f64,
        start_x: f64,
        start_y: f64,
        viewport: &Viewport,
    ) -> bool {
        if !viewport.contains_window_point(start_x, start_y) {
            return false;
        }
        let delta = viewport.window_delta_to_canvas_delta(delta_x, delta_y) / self.zoom;
        *self.moving_mut() += delta;
        true
    }

    /// Returns `true` if the key was not already held.
    pub fn press_key(&mut self, direction: PanDirection) -> bool {
        let was_held = self.held.contains(direction);
        self.held.0 |= direction.bit();
        !was_held
    }

    /// Returns `true` if the key was held.
    pub fn release_key(&mut self, direction: PanDirection) -> bool {
        let was_held = self.held.contains(direction);
        self.held.0 &= !direction.bit();
        was_held
    }

    pub fn release_all_keys(&mut self) {
        self.held = HeldKeys::default();
    }

    /// Fractal-space distance the held keys move the view per tick.
    pub fn pan_velocity(&self) -> Complex {
        let (x, y) = self.held.axes();
        Complex::new(x, y) * (KEY_PAN_PIXELS / self.zoom)
    }

    #[inline]
    pub fn is_panning(&self) -> bool {
        !self.pan_velocity().is_zero()
    }

    /// Apply one tick of key panning. Returns whether the view moved.
    ///
    /// Motion is confined to `[-2, 2]²`; a coordinate already outside the box
    /// may move back towards it but never further out. Pushing against the
    /// edge of the box returns `false`.
    pub fn advance_pan(&mut self) -> bool {
        let velocity = self.pan_velocity();
        if velocity.is_zero() {
            return false;
        }
        let current = self.moving();
        let proposed = current + velocity;
        let bound = |now: f64, next: f64| next.clamp(now.min(-PAN_LIMIT), now.max(PAN_LIMIT));
        let next = Complex::new(
            bound(current.re, proposed.re),
            bound(current.im, proposed.im),
        );
        *self.moving_mut() = next;
        next != current
    }

    pub fn set_offset(&mut self, offset: Complex) {
        self.offset = offset;
    }

    pub fn set_julia_seed(&mut self, seed: Complex) {
        self.julia_seed = seed;
    }

    // -- Mode and parameters --

    /// Switch fractal kind.
    ///
    /// Offset and seed trade places so the new mode's moving coordinate
    /// starts from the old one's. Entering Newton resets zoom to 1.
    pub fn set_mode(&mut self, mode: FractalKind) -> bool {
        if mode == self.mode {
            return false;
        }
        debug!(from = self.mode.label(), to = mode.label(), "Switching fractal mode");
        std::mem::swap(&mut self.offset, &mut self.julia_seed);
        self.mode = mode;
        if mode == FractalKind::Newton {
            self.zoom = 1.0;
        }
        self.clamp_zoom();
        true
    }

    /// Restore the default zoom, offset, step count and colour period.
    pub fn reset(&mut self) {
        debug!(mode = self.mode.label(), "Resetting camera");
        self.zoom = DEFAULT_ZOOM;
        self.offset = DEFAULT_OFFSET;
        self.step_count = DEFAULT_STEP_COUNT;
        self.colour_period = DEFAULT_COLOUR_PERIOD;
        self.clamp_zoom();
    }

    pub fn set_step_count(&mut self, steps: u32) {
        self.step_count = steps.clamp(MIN_STEP_COUNT, MAX_STEP_COUNT);
    }

    pub fn set_colour_period(&mut self, period: u32) {
        self.colour_period = period.clamp(MIN_STEP_COUNT, MAX_STEP_COUNT);
    }

    pub fn set_precision_cutoff(&mut self, cutoff: f64) {
        self.precision_cutoff = cutoff.clamp(2.0, MAX_ZOOM_LOG2.exp2());
    }

    pub fn set_newton_colouring(&mut self, colouring: NewtonColouring) {
        self.newton_colouring = colouring;
    }

    /// Move one Newton root, clamped to `[-5, 5]²`.
    pub fn set_root(&mut self, index: usize, value: Complex) -> crate::Result<()> {
        let root = self
            .roots
            .get_mut(index)
            .ok_or(CoreError::RootIndexOutOfRange(index))?;
        *root = value.clamp(-ROOT_LIMIT, ROOT_LIMIT);
        Ok(())
    }
}
