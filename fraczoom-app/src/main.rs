mod pacer;
mod preferences;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use fraczoom_core::{Camera, Rect};
use fraczoom_render::{Session, SessionSettings};

use pacer::{load_script, FramePacer, LoggingSink};
use preferences::AppPreferences;

/// Headless FracZoom: replays an input-event script against a session and
/// logs every frame the renderer would receive.
#[derive(Debug, Parser)]
#[command(name = "FracZoom", version)]
struct Args {
    /// Tick as fast as possible instead of at the configured frame rate.
    #[arg(long)]
    unpaced: bool,

    /// JSON array of `{"wait_ticks": n, "input": {...}}` steps.
    script: Option<PathBuf>,
}

/// Build the session from preferences, falling back to defaults when the
/// stored settings are unusable.
fn start_session(prefs: &AppPreferences) -> fraczoom_render::Result<Session> {
    let canvas = Rect::new(
        0.0,
        0.0,
        f64::from(prefs.window_width),
        f64::from(prefs.window_height),
    );
    let camera = prefs.startup_camera();
    let attempt = match camera.clone() {
        Some(camera) => Session::with_camera(&prefs.settings, canvas, camera),
        None => Session::new(&prefs.settings, canvas),
    };
    match attempt {
        Ok(session) => Ok(session),
        Err(e) => {
            warn!("Stored settings rejected ({e}); using defaults");
            let defaults = SessionSettings::default();
            let canvas = Rect::new(0.0, 0.0, 1280.0, 720.0);
            match camera {
                Some(camera) => Session::with_camera(&defaults, canvas, camera),
                None => Session::new(&defaults, canvas),
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting FracZoom");

    let mut prefs = AppPreferences::load();
    let mut session = match start_session(&prefs) {
        Ok(session) => session,
        Err(e) => {
            error!("Could not start session: {e}");
            return ExitCode::FAILURE;
        }
    };

    let script = args
        .script
        .as_deref()
        .map(load_script)
        .unwrap_or_default();

    let pacer = if args.unpaced {
        FramePacer::unpaced()
    } else {
        FramePacer::realtime(prefs.settings.frame_interval())
    };
    let mut sink = LoggingSink::default();
    let report = pacer.run(&mut session, &script, &mut sink);
    info!(
        ticks = report.ticks,
        rejected = report.rejected_events,
        frames = sink.frames,
        bytes = sink.bytes,
        last_frame_len = sink.last.map_or(0, |p| p.byte_len()),
        zoom = session.camera().zoom(),
        mode = session.camera().mode().label(),
        "Session ended"
    );

    let mut last_view: Camera = session.camera().clone();
    last_view.release_all_keys();
    prefs.last_view = Some(last_view);
    prefs.save();

    ExitCode::SUCCESS
}
