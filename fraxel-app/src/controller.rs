use tracing::debug;

use fraxel_core::{FractalKind, Viewport};

use crate::input::{PointerButton, PointerEvent};

/// How pointer input maps to zooming for one fractal family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomPolicy {
    /// Left click zooms in by `factor` anchored at the cursor, right click
    /// zooms out by the reciprocal.
    ClickAnchor { factor: f64 },
    /// Left drag selects a rectangle; release zooms to it with aspect lock.
    RectangleDrag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Created but the first frame has not been presented yet. Input is
    /// ignored until `activate()`.
    Initializing,
    Idle,
    Dragging,
}

/// Live selection rectangle in pixel coordinates, for drawing the preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// What the session should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerAction {
    None,
    /// The viewport changed; re-dispatch and present.
    Redraw,
    /// A drag is in progress; overlay the selection rectangle.
    Preview(DragRect),
}

/// Pointer-driven navigation for the escape-time and Newton viewers.
///
/// One policy-parameterized type covers every family; the policy decides
/// whether clicks anchor-zoom directly or drags select a rectangle.
#[derive(Debug, Clone)]
pub struct ViewController {
    kind: FractalKind,
    escape_radius: f64,
    policy: ZoomPolicy,
    state: ControllerState,
    viewport: Viewport,
    width: u32,
    height: u32,
    /// Set on primary press; a drag only begins on the first motion after it.
    press_origin: Option<(f64, f64)>,
}

impl ViewController {
    pub fn new(
        kind: FractalKind,
        escape_radius: f64,
        policy: ZoomPolicy,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            kind,
            escape_radius,
            policy,
            state: ControllerState::Initializing,
            viewport: Viewport::initial(kind, escape_radius),
            width,
            height,
            press_origin: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Marks the first frame as presented; input is live from here on.
    pub fn activate(&mut self) {
        if self.state == ControllerState::Initializing {
            self.state = ControllerState::Idle;
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Restores the family's initial bounds.
    pub fn reset(&mut self) -> ControllerAction {
        self.viewport.reset(self.kind, self.escape_radius);
        self.press_origin = None;
        if self.state == ControllerState::Dragging {
            self.state = ControllerState::Idle;
        }
        ControllerAction::Redraw
    }

    pub fn handle_event(&mut self, event: PointerEvent) -> ControllerAction {
        if self.state == ControllerState::Initializing {
            return ControllerAction::None;
        }
        match self.policy {
            ZoomPolicy::ClickAnchor { factor } => self.handle_click_anchor(event, factor),
            ZoomPolicy::RectangleDrag => self.handle_rectangle_drag(event),
        }
    }

    fn handle_click_anchor(&mut self, event: PointerEvent, factor: f64) -> ControllerAction {
        match event {
            PointerEvent::Press { button, x, y } => {
                let factor = match button {
                    PointerButton::Primary => factor,
                    PointerButton::Secondary => 1.0 / factor,
                };
                self.viewport.zoom_at(x, y, self.width, self.height, factor);
                debug!(zoom = self.viewport.zoom, "click zoom");
                ControllerAction::Redraw
            }
            PointerEvent::Motion { .. } | PointerEvent::Release { .. } => ControllerAction::None,
        }
    }

    fn handle_rectangle_drag(&mut self, event: PointerEvent) -> ControllerAction {
        match event {
            PointerEvent::Press {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                self.press_origin = Some((x, y));
                ControllerAction::None
            }
            PointerEvent::Motion { x, y } => match self.press_origin {
                Some((x0, y0)) => {
                    self.state = ControllerState::Dragging;
                    ControllerAction::Preview(DragRect { x0, y0, x1: x, y1: y })
                }
                None => ControllerAction::None,
            },
            PointerEvent::Release {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                let origin = self.press_origin.take();
                if self.state != ControllerState::Dragging {
                    // A click that never moved selects nothing.
                    return ControllerAction::None;
                }
                self.state = ControllerState::Idle;
                let Some((x0, y0)) = origin else {
                    return ControllerAction::None;
                };
                let before = self.viewport;
                self.viewport
                    .zoom_to_rect(x0, y0, x, y, self.width, self.height, true);
                if self.viewport == before {
                    return ControllerAction::None;
                }
                debug!(zoom = self.viewport.zoom, "rectangle zoom");
                ControllerAction::Redraw
            }
            _ => ControllerAction::None,
        }
    }
}

/// The Sierpinski carpet navigates in pixel space with an integer zoom
/// accumulator, so it gets its own small controller.
#[derive(Debug, Clone)]
pub struct CarpetController {
    state: ControllerState,
    zoom_increase: u32,
    center: (f32, f32),
    zoom: u32,
}

impl CarpetController {
    pub fn new(zoom_increase: u32, width: u32, height: u32) -> Self {
        Self {
            state: ControllerState::Initializing,
            zoom_increase: zoom_increase.max(2),
            center: (width as f32 / 2.0, height as f32 / 2.0),
            zoom: 1,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        self.center
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn activate(&mut self) {
        if self.state == ControllerState::Initializing {
            self.state = ControllerState::Idle;
        }
    }

    pub fn reset(&mut self, width: u32, height: u32) -> ControllerAction {
        self.center = (width as f32 / 2.0, height as f32 / 2.0);
        self.zoom = 1;
        ControllerAction::Redraw
    }

    pub fn handle_event(&mut self, event: PointerEvent) -> ControllerAction {
        if self.state == ControllerState::Initializing {
            return ControllerAction::None;
        }
        match event {
            PointerEvent::Press {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                self.center = (x as f32, y as f32);
                self.zoom = self.zoom.saturating_mul(self.zoom_increase);
                debug!(zoom = self.zoom, "carpet zoom in");
                ControllerAction::Redraw
            }
            PointerEvent::Press {
                button: PointerButton::Secondary,
                x,
                y,
            } => {
                // Flooring at 1 keeps the shader's divide by zoom safe.
                if self.zoom == 1 {
                    return ControllerAction::None;
                }
                self.center = (x as f32, y as f32);
                self.zoom = (self.zoom / self.zoom_increase).max(1);
                debug!(zoom = self.zoom, "carpet zoom out");
                ControllerAction::Redraw
            }
            _ => ControllerAction::None,
        }
    }
}
