//! Logical pointer input.
//!
//! Controllers consume `PointerEvent`s rather than device APIs, so a mouse
//! and an analog stick drive the same code path. `VirtualCursor` turns stick
//! vectors into the equivalent pointer stream.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A device-independent pointer event in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { button: PointerButton, x: f64, y: f64 },
    Motion { x: f64, y: f64 },
    Release { button: PointerButton, x: f64, y: f64 },
}

/// Pixels per second of cursor travel at full stick deflection.
const STICK_SPEED: f64 = 600.0;
/// Deflections below this magnitude are treated as centered.
const STICK_DEADZONE: f64 = 0.15;

/// A cursor position driven by analog stick input.
///
/// Integrates the stick vector over elapsed time, clamps to the window, and
/// emits the same logical events a mouse would.
#[derive(Debug, Clone)]
pub struct VirtualCursor {
    x: f64,
    y: f64,
    width: u32,
    height: u32,
}

impl VirtualCursor {
    /// Starts at the window center.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: f64::from(width) / 2.0,
            y: f64::from(height) / 2.0,
            width,
            height,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.x = self.x.clamp(0.0, f64::from(self.width.saturating_sub(1)));
        self.y = self.y.clamp(0.0, f64::from(self.height.saturating_sub(1)));
    }

    /// Advances the cursor by one tick of stick input. Returns a `Motion`
    /// event when the cursor actually moved.
    pub fn tick(&mut self, stick_x: f64, stick_y: f64, dt_seconds: f64) -> Option<PointerEvent> {
        if stick_x.hypot(stick_y) < STICK_DEADZONE {
            return None;
        }
        let (prev_x, prev_y) = (self.x, self.y);
        self.x += stick_x * STICK_SPEED * dt_seconds;
        self.y += stick_y * STICK_SPEED * dt_seconds;
        self.clamp();
        if self.x == prev_x && self.y == prev_y {
            return None;
        }
        Some(PointerEvent::Motion {
            x: self.x,
            y: self.y,
        })
    }

    /// Maps a button press at the current cursor position.
    pub fn press(&self, button: PointerButton) -> PointerEvent {
        PointerEvent::Press {
            button,
            x: self.x,
            y: self.y,
        }
    }

    pub fn release(&self, button: PointerButton) -> PointerEvent {
        PointerEvent::Release {
            button,
            x: self.x,
            y: self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_starts_centered() {
        let cursor = VirtualCursor::new(800, 600);
        assert_eq!(cursor.position(), (400.0, 300.0));
    }

    #[test]
    fn deadzone_swallows_small_deflections() {
        let mut cursor = VirtualCursor::new(800, 600);
        assert_eq!(cursor.tick(0.05, 0.05, 0.016), None);
        assert_eq!(cursor.position(), (400.0, 300.0));
    }

    #[test]
    fn full_deflection_moves_at_stick_speed() {
        let mut cursor = VirtualCursor::new(800, 600);
        let event = cursor.tick(1.0, 0.0, 0.5).unwrap();
        assert_eq!(
            event,
            PointerEvent::Motion {
                x: 400.0 + STICK_SPEED * 0.5,
                y: 300.0
            }
        );
    }

    #[test]
    fn cursor_clamps_to_window_edges() {
        let mut cursor = VirtualCursor::new(100, 100);
        for _ in 0..100 {
            cursor.tick(1.0, 1.0, 1.0);
        }
        assert_eq!(cursor.position(), (99.0, 99.0));
        // Pinned against the edge, further deflection emits nothing.
        assert_eq!(cursor.tick(1.0, 1.0, 1.0), None);
    }

    #[test]
    fn press_and_release_carry_cursor_position() {
        let mut cursor = VirtualCursor::new(800, 600);
        cursor.tick(1.0, 0.0, 0.1);
        let (x, y) = cursor.position();
        assert_eq!(
            cursor.press(PointerButton::Primary),
            PointerEvent::Press {
                button: PointerButton::Primary,
                x,
                y
            }
        );
        assert_eq!(
            cursor.release(PointerButton::Primary),
            PointerEvent::Release {
                button: PointerButton::Primary,
                x,
                y
            }
        );
    }

    #[test]
    fn resize_reclamps_the_cursor() {
        let mut cursor = VirtualCursor::new(800, 600);
        cursor.resize(200, 150);
        assert_eq!(cursor.position(), (199.0, 149.0));
    }
}
