use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Smallest drawable surface edge, in pixels.
pub const MIN_DRAW_SIZE: f64 = 50.0;

/// An axis-aligned rectangle in window coordinates (top-left origin, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

/// Canvas geometry as reported by the host UI.
///
/// The GPU surface addresses pixels from the bottom-left corner and at
/// `display_scale / resolution_scale` pixels per window unit, while pointer
/// events arrive top-left based in window units. Everything here converts
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Canvas area within the window.
    pub canvas: Rect,

    /// Physical pixels per window unit (2.0 on a typical high-DPI monitor).
    pub display_scale: f64,

    /// Render downsampling factor; 1.0 draws at full resolution.
    pub resolution_scale: f64,
}

impl Viewport {
    pub fn new(canvas: Rect, display_scale: f64, resolution_scale: f64) -> crate::Result<Self> {
        if !(canvas.width >= 0.0 && canvas.height >= 0.0)
            || !canvas.width.is_finite()
            || !canvas.height.is_finite()
        {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "canvas size must be finite and non-negative, got {}×{}",
                    canvas.width, canvas.height
                ),
            });
        }
        validate_scale("display scale", display_scale)?;
        validate_scale("resolution scale", resolution_scale)?;
        Ok(Self {
            canvas,
            display_scale,
            resolution_scale,
        })
    }

    pub fn with_canvas(self, canvas: Rect) -> crate::Result<Self> {
        Self::new(canvas, self.display_scale, self.resolution_scale)
    }

    pub fn with_display_scale(self, display_scale: f64) -> crate::Result<Self> {
        Self::new(self.canvas, display_scale, self.resolution_scale)
    }

    pub fn with_resolution_scale(self, resolution_scale: f64) -> crate::Result<Self> {
        Self::new(self.canvas, self.display_scale, resolution_scale)
    }

    /// Canvas pixels per window unit.
    #[inline]
    pub fn pixel_scale(&self) -> f64 {
        self.display_scale / self.resolution_scale
    }

    /// Window point → canvas pixel (bottom-left origin, y up, resolution
    /// scaled). `re` is x, `im` is y.
    #[inline]
    pub fn window_to_canvas(&self, pointer_x: f64, pointer_y: f64) -> Complex {
        let s = self.pixel_scale();
        Complex::new(
            (pointer_x - self.canvas.x) * s,
            (self.canvas.max_y() - pointer_y) * s,
        )
    }

    /// Convert a window-space drag delta to canvas pixels.
    ///
    /// Computed as the difference of two mapped points rather than by
    /// scaling each axis, so the y flip is applied exactly once.
    #[inline]
    pub fn window_delta_to_canvas_delta(&self, dx: f64, dy: f64) -> Complex {
        self.window_to_canvas(0.0, 0.0) - self.window_to_canvas(dx, -dy)
    }

    /// Size of the drawable surface in pixels, floored at [`MIN_DRAW_SIZE`].
    pub fn scaled_draw_size(&self) -> (f64, f64) {
        let s = self.pixel_scale();
        (
            (self.canvas.width * s).max(MIN_DRAW_SIZE),
            (self.canvas.height * s).max(MIN_DRAW_SIZE),
        )
    }

    /// Whether a window point lies on the canvas, bottom row included.
    pub fn contains_window_point(&self, pointer_x: f64, pointer_y: f64) -> bool {
        pointer_x >= self.canvas.x
            && pointer_x <= self.canvas.max_x()
            && pointer_y >= self.canvas.y
            && pointer_y <= self.canvas.max_y()
    }

    /// Window coordinates of the canvas centre.
    pub fn canvas_centre_window(&self) -> (f64, f64) {
        (
            self.canvas.x + self.canvas.width / 2.0,
            self.canvas.y + self.canvas.height / 2.0,
        )
    }
}

fn validate_scale(name: &str, value: f64) -> crate::Result<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(CoreError::InvalidViewport {
            reason: format!("{name} must be positive and finite, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn viewport(display: f64, resolution: f64) -> Viewport {
        Viewport::new(Rect::new(150.0, 20.0, 800.0, 600.0), display, resolution).unwrap()
    }

    #[test]
    fn canvas_origin_is_bottom_left() {
        let vp = viewport(1.0, 1.0);
        // Bottom-left corner of the canvas in window space.
        let c = vp.window_to_canvas(150.0, 620.0);
        assert_eq!(c, Complex::ZERO);
        // Top-right corner.
        let c = vp.window_to_canvas(950.0, 20.0);
        assert_eq!(c, Complex::new(800.0, 600.0));
    }

    #[test]
    fn window_to_canvas_applies_display_and_resolution_scale() {
        let vp = viewport(2.0, 4.0);
        let c = vp.window_to_canvas(350.0, 520.0);
        assert!((c.re - 100.0).abs() < EPSILON);
        assert!((c.im - 50.0).abs() < EPSILON);
    }

    #[test]
    fn delta_flips_y_once() {
        let vp = viewport(2.0, 1.0);
        let d = vp.window_delta_to_canvas_delta(10.0, 5.0);
        assert!((d.re - (-20.0)).abs() < EPSILON);
        assert!((d.im - (-10.0)).abs() < EPSILON);
    }

    #[test]
    fn delta_is_independent_of_canvas_origin() {
        let a = viewport(1.0, 2.0);
        let b = Viewport::new(Rect::new(0.0, 0.0, 300.0, 100.0), 1.0, 2.0).unwrap();
        assert_eq!(
            a.window_delta_to_canvas_delta(7.0, -3.0),
            b.window_delta_to_canvas_delta(7.0, -3.0)
        );
    }

    #[test]
    fn draw_size_scales_and_floors() {
        assert_eq!(viewport(2.0, 1.0).scaled_draw_size(), (1600.0, 1200.0));
        assert_eq!(viewport(1.0, 8.0).scaled_draw_size(), (100.0, 75.0));
        let tiny = Viewport::new(Rect::new(0.0, 0.0, 120.0, 0.0), 1.0, 8.0).unwrap();
        assert_eq!(tiny.scaled_draw_size(), (MIN_DRAW_SIZE, MIN_DRAW_SIZE));
    }

    #[test]
    fn contains_includes_edges() {
        let vp = viewport(1.0, 1.0);
        assert!(vp.contains_window_point(150.0, 20.0));
        assert!(vp.contains_window_point(950.0, 620.0));
        assert!(!vp.contains_window_point(149.0, 300.0));
        assert!(!vp.contains_window_point(500.0, 621.0));
    }

    #[test]
    fn centre_of_canvas() {
        assert_eq!(viewport(1.0, 1.0).canvas_centre_window(), (550.0, 320.0));
    }

    #[test]
    fn invalid_scales_rejected() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(Viewport::new(r, 0.0, 1.0).is_err());
        assert!(Viewport::new(r, 1.0, -1.0).is_err());
        assert!(Viewport::new(r, f64::NAN, 1.0).is_err());
        assert!(Viewport::new(r, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn invalid_canvas_rejected() {
        assert!(Viewport::new(Rect::new(0.0, 0.0, -1.0, 10.0), 1.0, 1.0).is_err());
        assert!(Viewport::new(Rect::new(0.0, 0.0, 10.0, f64::NAN), 1.0, 1.0).is_err());
    }

    #[test]
    fn with_resolution_scale_keeps_canvas() {
        let vp = viewport(1.0, 1.0).with_resolution_scale(2.0).unwrap();
        assert_eq!(vp.canvas, Rect::new(150.0, 20.0, 800.0, 600.0));
        assert_eq!(vp.resolution_scale, 2.0);
    }
}
