//! Headless frame pacing: replays a scripted input sequence against a
//! [`Session`] at the configured frame rate.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fraczoom_render::{FrameSink, InputEvent, Session, ShaderParameters};

/// Ticks to keep running after the script ends before giving up on the
/// session going idle (held keys pan forever).
pub const SETTLE_TICKS: u32 = 600;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// One scripted input, delivered after `wait_ticks` refresh ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub wait_ticks: u32,
    pub input: InputEvent,
}

/// Read a JSON array of [`ScriptStep`]s. Any failure is logged and yields
/// an empty script.
pub fn load_script(path: &Path) -> Vec<ScriptStep> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to read event script {}: {e}", path.display());
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<ScriptStep>>(&json) {
        Ok(steps) => {
            info!(steps = steps.len(), "Loaded event script from {}", path.display());
            steps
        }
        Err(e) => {
            warn!("Failed to parse event script {}: {e}", path.display());
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Stands in for the GPU: logs each frame and keeps running totals.
#[derive(Debug, Default)]
pub struct LoggingSink {
    pub frames: u64,
    pub bytes: usize,
    pub last: Option<ShaderParameters>,
}

impl FrameSink for LoggingSink {
    fn submit(&mut self, params: &ShaderParameters) {
        let bytes = params.as_bytes();
        self.frames += 1;
        self.bytes += bytes.len();
        debug!(
            frame = self.frames,
            zoom = params.frame.zoom.to_f64(),
            flags = params.flags(),
            len = bytes.len(),
            "Submitting frame"
        );
        self.last = Some(*params);
    }
}

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/// Summary of one pacer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerReport {
    pub ticks: u64,
    pub frames: u64,
    pub rejected_events: usize,
}

pub struct FramePacer {
    /// `None` runs ticks back to back.
    interval: Option<Duration>,
}

impl FramePacer {
    /// Tick at wall-clock pace.
    pub fn realtime(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
        }
    }

    /// Tick as fast as possible.
    pub fn unpaced() -> Self {
        Self { interval: None }
    }

    /// Play `script`, then keep ticking until the session stops producing
    /// frames or [`SETTLE_TICKS`] pass.
    pub fn run(
        &self,
        session: &mut Session,
        script: &[ScriptStep],
        sink: &mut impl FrameSink,
    ) -> PacerReport {
        let ticks_before = session.scheduler().ticks();
        let frames_before = session.scheduler().frames();
        let mut rejected_events = 0;
        let mut next = Instant::now();

        for step in script {
            for _ in 0..step.wait_ticks {
                self.tick(&mut next, session, sink);
            }
            if let Err(e) = session.handle(step.input.clone()) {
                warn!("Rejected scripted event {:?}: {e}", step.input);
                rejected_events += 1;
            }
        }

        for _ in 0..SETTLE_TICKS {
            if !self.tick(&mut next, session, sink) {
                break;
            }
        }

        let report = PacerReport {
            ticks: session.scheduler().ticks() - ticks_before,
            frames: session.scheduler().frames() - frames_before,
            rejected_events,
        };
        info!(
            ticks = report.ticks,
            frames = report.frames,
            rejected = report.rejected_events,
            "Script finished"
        );
        report
    }

    fn tick(&self, next: &mut Instant, session: &mut Session, sink: &mut impl FrameSink) -> bool {
        if let Some(interval) = self.interval {
            *next += interval;
            if let Some(wait) = next.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
        }
        session.tick(sink)
    }
}

#[cfg(test)]
mod tests {
    use fraczoom_core::{FractalKind, PanDirection, Rect};
    use fraczoom_render::SessionSettings;

    use super::*;

    fn session() -> Session {
        Session::new(&SessionSettings::default(), Rect::new(0.0, 0.0, 640.0, 480.0)).unwrap()
    }

    fn step(wait_ticks: u32, input: InputEvent) -> ScriptStep {
        ScriptStep { wait_ticks, input }
    }

    #[test]
    fn empty_script_draws_once() {
        let mut s = session();
        let mut sink = LoggingSink::default();
        let report = FramePacer::unpaced().run(&mut s, &[], &mut sink);
        assert_eq!(report.frames, 1);
        assert_eq!(report.ticks, 2);
        assert_eq!(sink.frames, 1);
        assert_eq!(sink.bytes, 56);
    }

    #[test]
    fn waits_between_events_are_idle() {
        let mut s = session();
        let mut sink = LoggingSink::default();
        let script = [
            step(10, InputEvent::StepCount { steps: 64 }),
            step(
                10,
                InputEvent::Mode {
                    mode: FractalKind::Newton,
                },
            ),
        ];
        let report = FramePacer::unpaced().run(&mut s, &script, &mut sink);
        // Initial frame, one after the step change, one for Newton.
        assert_eq!(report.frames, 3);
        assert_eq!(sink.bytes, 56 + 56 + 232);
        assert!(sink.last.unwrap().newton.is_some());
    }

    #[test]
    fn held_key_settles_at_pan_box() {
        let mut s = session();
        let mut sink = LoggingSink::default();
        let script = [step(
            0,
            InputEvent::KeyDown {
                direction: PanDirection::Right,
            },
        )];
        let report = FramePacer::unpaced().run(&mut s, &script, &mut sink);
        assert_eq!(s.camera().offset().re, 2.0);
        assert!(report.ticks < u64::from(SETTLE_TICKS));
        assert_eq!(report.frames, report.ticks - 1);
    }

    #[test]
    fn rejected_events_are_counted() {
        let mut s = session();
        let mut sink = LoggingSink::default();
        let script = [step(
            0,
            InputEvent::Root {
                index: 9,
                value: fraczoom_core::Complex::ZERO,
            },
        )];
        let report = FramePacer::unpaced().run(&mut s, &script, &mut sink);
        assert_eq!(report.rejected_events, 1);
    }

    #[test]
    fn script_json_format() {
        let json = r#"[
            {"wait_ticks": 5, "input": {"event": "scroll", "delta_y": 120.0, "x": 320.0, "y": 240.0}},
            {"input": {"event": "reset"}}
        ]"#;
        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        assert_eq!(steps[0].wait_ticks, 5);
        assert_eq!(steps[1].wait_ticks, 0);
        assert_eq!(steps[1].input, InputEvent::Reset);
    }

    #[test]
    fn missing_script_is_empty() {
        let path = std::env::temp_dir().join("fraczoom_test_no_such_script.json");
        assert!(load_script(&path).is_empty());
    }
}
