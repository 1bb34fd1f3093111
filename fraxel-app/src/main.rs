use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use fraxel_core::FractalKind;
use fraxel_render::{export_png, to_rgba8, GpuContext};

use fraxel_app::input::{PointerButton, PointerEvent, VirtualCursor};
use fraxel_app::{presence, AppError, Settings, ViewerSession, ZoomPolicy};

const DEFAULT_WIDTH: u32 = 900;
const DEFAULT_HEIGHT: u32 = 600;
const SETTINGS_FILE: &str = "settings.json";

struct Args {
    kind: FractalKind,
    width: u32,
    height: u32,
    out: PathBuf,
    zoom_clicks: u32,
    rect_zoom: bool,
}

fn parse_args() -> Result<Args, AppError> {
    let mut args = std::env::args().skip(1);
    let kind: FractalKind = args
        .next()
        .ok_or(AppError::Usage)?
        .parse()
        .map_err(AppError::UnknownFractal)?;

    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut out = PathBuf::from(format!("{}.png", kind.key()));
    let mut zoom_clicks = 0;
    let mut rect_zoom = false;

    while let Some(flag) = args.next() {
        if flag == "--rect-zoom" {
            rect_zoom = true;
            continue;
        }
        let value = args.next().ok_or(AppError::Usage)?;
        match flag.as_str() {
            "--width" => width = value.parse().map_err(|_| AppError::Usage)?,
            "--height" => height = value.parse().map_err(|_| AppError::Usage)?,
            "--out" => out = PathBuf::from(value),
            "--zoom-clicks" => zoom_clicks = value.parse().map_err(|_| AppError::Usage)?,
            _ => return Err(AppError::Usage),
        }
    }

    Ok(Args {
        kind,
        width,
        height,
        out,
        zoom_clicks,
        rect_zoom,
    })
}

fn run() -> Result<(), AppError> {
    let args = parse_args()?;

    let settings = Settings::load(SETTINGS_FILE)?;
    let ctx = GpuContext::new()?;
    let mut session = if args.rect_zoom {
        ViewerSession::open_with_policy(
            ctx,
            &settings,
            args.kind,
            args.width,
            args.height,
            ZoomPolicy::RectangleDrag,
        )?
    } else {
        ViewerSession::open(ctx, &settings, args.kind, args.width, args.height)?
    };

    let mut presence = presence::connect();
    session.publish_status(presence.as_mut());

    // Optional scripted navigation through the same pointer path a device
    // uses: either click-zoom at the window center, or drag-select the
    // centered half-size rectangle.
    let cursor = VirtualCursor::new(args.width, args.height);
    for _ in 0..args.zoom_clicks {
        if args.rect_zoom {
            let (w, h) = (f64::from(args.width), f64::from(args.height));
            session.handle_event(PointerEvent::Press {
                button: PointerButton::Primary,
                x: w / 4.0,
                y: h / 4.0,
            })?;
            session.handle_event(PointerEvent::Motion {
                x: 3.0 * w / 4.0,
                y: 3.0 * h / 4.0,
            })?;
            session.handle_event(PointerEvent::Release {
                button: PointerButton::Primary,
                x: 3.0 * w / 4.0,
                y: 3.0 * h / 4.0,
            })?;
        } else {
            session.handle_event(cursor.press(PointerButton::Primary))?;
            session.handle_event(cursor.release(PointerButton::Primary))?;
        }
        session.publish_status(presence.as_mut());
    }

    let frame = session.read_frame()?;
    let rgba = to_rgba8(&frame);
    let (state, details) = session.status();
    let description = format!("{state} / {details}");
    export_png(&rgba, args.width, args.height, &description, &args.out)?;

    info!(path = %args.out.display(), "frame exported");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Fraxel");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
