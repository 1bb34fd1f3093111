use std::time::SystemTime;

use tracing::{info, warn};

use fraxel_core::{FractalKind, FractalParams, Precision};
use fraxel_render::{CompiledKernel, GpuContext, KernelSource, KernelUniforms, RenderTarget};

use crate::controller::{CarpetController, ControllerAction, ViewController, ZoomPolicy};
use crate::error::AppError;
use crate::input::PointerEvent;
use crate::presence::Presence;
use crate::settings::Settings;

/// Navigation state for one viewer. The carpet works in pixel space with an
/// integer zoom accumulator; every other family navigates the complex plane.
enum Navigation {
    Plane(ViewController),
    Carpet(CarpetController),
}

/// One open fractal viewer: parameters, compiled kernel, render target and
/// navigation state, plus the GPU context that drives them.
pub struct ViewerSession {
    ctx: GpuContext,
    params: FractalParams,
    kernel: CompiledKernel,
    target: RenderTarget,
    nav: Navigation,
    width: u32,
    height: u32,
    started: SystemTime,
}

impl ViewerSession {
    /// Opens a viewer for `kind`: resolves parameters from settings,
    /// compiles the kernel, allocates the target and renders the first
    /// frame. Plane viewers get the configured click-anchor zoom.
    pub fn open(
        ctx: GpuContext,
        settings: &Settings,
        kind: FractalKind,
        width: u32,
        height: u32,
    ) -> Result<Self, AppError> {
        let params = settings.fractal_params(kind)?;
        let policy = ZoomPolicy::ClickAnchor {
            factor: params.zoom_increase,
        };
        Self::open_inner(ctx, params, policy, width, height)
    }

    /// Like [`open`](Self::open) but with an explicit zoom policy, for the
    /// rectangle-selection viewer. The carpet ignores the policy.
    pub fn open_with_policy(
        ctx: GpuContext,
        settings: &Settings,
        kind: FractalKind,
        width: u32,
        height: u32,
        policy: ZoomPolicy,
    ) -> Result<Self, AppError> {
        let params = settings.fractal_params(kind)?;
        Self::open_inner(ctx, params, policy, width, height)
    }

    fn open_inner(
        ctx: GpuContext,
        mut params: FractalParams,
        policy: ZoomPolicy,
        width: u32,
        height: u32,
    ) -> Result<Self, AppError> {
        let kind = params.kind;
        if params.precision == Precision::Double && !ctx.supports_f64() {
            warn!(
                kind = kind.key(),
                "adapter lacks f64 shader support, falling back to single precision"
            );
            params.precision = Precision::Single;
        }

        let source = KernelSource::build(&params)?;
        let kernel = CompiledKernel::compile(&ctx, &source)?;
        let target = RenderTarget::new(&ctx, width, height)?;

        let nav = if !kind.is_escape_time() {
            let factor = params.zoom_increase.round().max(2.0) as u32;
            Navigation::Carpet(CarpetController::new(factor, width, height))
        } else {
            Navigation::Plane(ViewController::new(
                kind,
                params.escape_radius,
                policy,
                width,
                height,
            ))
        };

        let mut session = Self {
            ctx,
            params,
            kernel,
            target,
            nav,
            width,
            height,
            started: SystemTime::now(),
        };
        session.redraw()?;
        match &mut session.nav {
            Navigation::Plane(c) => c.activate(),
            Navigation::Carpet(c) => c.activate(),
        }
        info!(kind = kind.key(), width, height, "viewer session open");
        Ok(session)
    }

    pub fn kind(&self) -> FractalKind {
        self.params.kind
    }

    pub fn params(&self) -> &FractalParams {
        &self.params
    }

    fn uniforms(&self) -> KernelUniforms {
        match &self.nav {
            Navigation::Plane(c) => {
                let vp = c.viewport();
                KernelUniforms::Escape {
                    max_iter: self.params.max_iterations,
                    resolution: (self.width, self.height),
                    real_range: (vp.real_min, vp.real_max),
                    imag_range: (vp.imag_min, vp.imag_max),
                }
            }
            Navigation::Carpet(c) => KernelUniforms::Carpet {
                depth: self.params.depth,
                zoom: c.zoom(),
                center: c.center(),
            },
        }
    }

    /// Re-issues the dispatch with the current uniforms.
    pub fn redraw(&mut self) -> Result<(), AppError> {
        self.ctx.dispatch(&self.kernel, &self.target, &self.uniforms())?;
        Ok(())
    }

    /// Feeds one pointer event to the controller; returns true when the
    /// view changed and a new frame was dispatched.
    pub fn handle_event(&mut self, event: PointerEvent) -> Result<bool, AppError> {
        let action = match &mut self.nav {
            Navigation::Plane(c) => c.handle_event(event),
            Navigation::Carpet(c) => c.handle_event(event),
        };
        match action {
            ControllerAction::Redraw => {
                self.redraw()?;
                Ok(true)
            }
            ControllerAction::Preview(_) | ControllerAction::None => Ok(false),
        }
    }

    /// Restores the initial view and redraws.
    pub fn reset(&mut self) -> Result<(), AppError> {
        match &mut self.nav {
            Navigation::Plane(c) => c.reset(),
            Navigation::Carpet(c) => c.reset(self.width, self.height),
        };
        self.redraw()
    }

    /// Reallocates the render target for a new window size and redraws.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), AppError> {
        self.target = RenderTarget::new(&self.ctx, width, height)?;
        self.width = width;
        self.height = height;
        if let Navigation::Plane(c) = &mut self.nav {
            c.resize(width, height);
        }
        self.redraw()
    }

    /// Reads the current frame back as rgba32float texels.
    pub fn read_frame(&self) -> Result<Vec<f32>, AppError> {
        Ok(self.ctx.read_back(&self.target)?)
    }

    /// Presence status lines for the current view.
    pub fn status(&self) -> (String, String) {
        let state = format!("Viewing {}", self.params.kind.display_name());
        let details = match &self.nav {
            Navigation::Plane(c) => format!(
                "Zoom: {:.0} / Max Iterations: {}",
                c.viewport().zoom,
                self.params.max_iterations
            ),
            Navigation::Carpet(c) => {
                format!("Zoom: {} / Depth: {}", c.zoom(), self.params.depth)
            }
        };
        (state, details)
    }

    /// Pushes the current status to the presence sink.
    pub fn publish_status(&self, presence: &mut dyn Presence) {
        let (state, details) = self.status();
        presence.update(&state, &details, self.started);
    }
}
