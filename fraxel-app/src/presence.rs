use std::time::SystemTime;

use tracing::{debug, info};

/// Rich-presence sink updated after every redraw.
///
/// Implementations must never fail loudly; presence is cosmetic and can
/// never be allowed to affect rendering.
pub trait Presence {
    /// `state` is the short line ("Viewing Mandelbrot"), `details` the
    /// second line ("Zoom: 4 / Max Iterations: 200"), `start` the session
    /// start time used for the elapsed counter.
    fn update(&mut self, state: &str, details: &str, start: SystemTime);
}

/// Presence sink that discards every update.
pub struct NoopPresence;

impl Presence for NoopPresence {
    fn update(&mut self, _state: &str, _details: &str, _start: SystemTime) {}
}

/// Presence sink that mirrors updates into the log. Useful headless and as
/// the default when no external presence service is reachable.
pub struct LogPresence;

impl Presence for LogPresence {
    fn update(&mut self, state: &str, details: &str, _start: SystemTime) {
        debug!(state, details, "presence update");
    }
}

/// Connects to the best available presence sink. Any failure degrades to a
/// no-op sink, so callers never have to handle presence errors.
pub fn connect() -> Box<dyn Presence> {
    // No external presence service is wired in this build; log locally.
    info!("presence: using local log sink");
    Box::new(LogPresence)
}
