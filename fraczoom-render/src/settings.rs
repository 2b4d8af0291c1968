use std::time::Duration;

use serde::{Deserialize, Serialize};

use fraczoom_core::camera::{DEFAULT_COLOUR_PERIOD, DEFAULT_STEP_COUNT, SCROLL_SENSITIVITY};

use crate::error::RenderError;

pub const MIN_FPS: u32 = 5;
pub const MAX_FPS: u32 = 60;
pub const MIN_RESOLUTION_SCALE: f64 = 1.0;
pub const MAX_RESOLUTION_SCALE: f64 = 8.0;

/// Tunables for a [`Session`](crate::Session).
///
/// Every field has a serde default so partial preference files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Scheduler ticks per second.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Render downsampling factor (1 = full resolution, 8 = coarsest).
    #[serde(default = "default_scale")]
    pub resolution_scale: f64,
    /// Physical pixels per window unit at startup.
    #[serde(default = "default_scale")]
    pub display_scale: f64,
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: f64,
    /// `log2` of the zoom above which double-float math kicks in.
    #[serde(default = "default_precision_cutoff_log2")]
    pub precision_cutoff_log2: f64,
    #[serde(default = "default_step_count")]
    pub step_count: u32,
    #[serde(default = "default_colour_period")]
    pub colour_period: u32,
}

fn default_fps() -> u32 {
    60
}
fn default_scale() -> f64 {
    1.0
}
fn default_scroll_sensitivity() -> f64 {
    SCROLL_SENSITIVITY
}
fn default_precision_cutoff_log2() -> f64 {
    22.0
}
fn default_step_count() -> u32 {
    DEFAULT_STEP_COUNT
}
fn default_colour_period() -> u32 {
    DEFAULT_COLOUR_PERIOD
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            resolution_scale: default_scale(),
            display_scale: default_scale(),
            scroll_sensitivity: default_scroll_sensitivity(),
            precision_cutoff_log2: default_precision_cutoff_log2(),
            step_count: default_step_count(),
            colour_period: default_colour_period(),
        }
    }
}

impl SessionSettings {
    /// Checks the values the core does not validate itself. Scales are
    /// checked when the viewport is built.
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            return Err(RenderError::InvalidFrameRate(self.fps));
        }
        if !(MIN_RESOLUTION_SCALE..=MAX_RESOLUTION_SCALE).contains(&self.resolution_scale) {
            return Err(RenderError::InvalidResolutionScale(self.resolution_scale));
        }
        if self.scroll_sensitivity <= 0.0 || !self.scroll_sensitivity.is_finite() {
            return Err(RenderError::InvalidScrollSensitivity(self.scroll_sensitivity));
        }
        Ok(())
    }

    /// Time between scheduler ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.clamp(MIN_FPS, MAX_FPS) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = SessionSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.fps, 60);
        assert_eq!(s.step_count, 500);
        assert_eq!(s.colour_period, 100);
    }

    #[test]
    fn frame_rate_bounds() {
        let mut s = SessionSettings::default();
        s.fps = 4;
        assert!(matches!(s.validate(), Err(RenderError::InvalidFrameRate(4))));
        s.fps = 61;
        assert!(s.validate().is_err());
        s.fps = 30;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn frame_interval_matches_fps() {
        let s = SessionSettings {
            fps: 50,
            ..SessionSettings::default()
        };
        assert_eq!(s.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn resolution_scale_bounds() {
        let mut s = SessionSettings::default();
        s.resolution_scale = 0.5;
        assert!(matches!(
            s.validate(),
            Err(RenderError::InvalidResolutionScale(_))
        ));
        s.resolution_scale = 8.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_sensitivity_rejected() {
        let s = SessionSettings {
            scroll_sensitivity: 0.0,
            ..SessionSettings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(RenderError::InvalidScrollSensitivity(_))
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: SessionSettings = serde_json::from_str(r#"{"fps": 30}"#).unwrap();
        assert_eq!(s.fps, 30);
        assert_eq!(s.resolution_scale, 1.0);
        assert_eq!(s.precision_cutoff_log2, 22.0);
    }
}
