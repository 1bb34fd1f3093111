//! GPU-backed session tests. Skipped when no adapter is present.

use std::fs;
use std::path::PathBuf;

use fraxel_core::FractalKind;
use fraxel_render::GpuContext;

use fraxel_app::input::{PointerButton, PointerEvent};
use fraxel_app::{Settings, ViewerSession, ZoomPolicy};

fn context() -> Option<GpuContext> {
    match GpuContext::new() {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("no GPU available, skipping: {e}");
            None
        }
    }
}

/// An empty settings file: every key falls back to its default.
fn default_settings(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("fraxel-session-tests");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn resize_reallocates_the_target_and_redraws() {
    let Some(ctx) = context() else { return };
    let settings = Settings::load(default_settings("resize.json")).unwrap();

    let mut session =
        ViewerSession::open(ctx, &settings, FractalKind::Mandelbrot, 64, 64).unwrap();
    assert_eq!(session.read_frame().unwrap().len(), 64 * 64 * 4);

    session.resize(90, 48).unwrap();
    assert_eq!(session.read_frame().unwrap().len(), 90 * 48 * 4);
}

#[test]
fn rectangle_policy_session_zooms_on_drag() {
    let Some(ctx) = context() else { return };
    let settings = Settings::load(default_settings("rect.json")).unwrap();

    let mut session = ViewerSession::open_with_policy(
        ctx,
        &settings,
        FractalKind::Mandelbrot,
        64,
        64,
        ZoomPolicy::RectangleDrag,
    )
    .unwrap();

    let redrawn = session
        .handle_event(PointerEvent::Press {
            button: PointerButton::Primary,
            x: 16.0,
            y: 16.0,
        })
        .unwrap();
    assert!(!redrawn);
    let redrawn = session
        .handle_event(PointerEvent::Motion { x: 48.0, y: 48.0 })
        .unwrap();
    assert!(!redrawn, "preview motion must not dispatch");
    let redrawn = session
        .handle_event(PointerEvent::Release {
            button: PointerButton::Primary,
            x: 48.0,
            y: 48.0,
        })
        .unwrap();
    assert!(redrawn, "rectangle release dispatches the zoomed frame");
    assert_eq!(session.read_frame().unwrap().len(), 64 * 64 * 4);
}
