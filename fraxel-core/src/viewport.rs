use crate::complex::Complex;
use crate::error::CoreError;
use crate::params::FractalKind;

/// The visible rectangle of the complex plane.
///
/// Pixel coordinates map linearly into `[real_min, real_max] ×
/// [imag_min, imag_max]`. `zoom` starts at 1.0: click-zoom viewers treat it
/// as a multiplicative accumulator, rectangle-zoom viewers derive it as
/// `initial_real_span / current_real_span`. Every zoom interaction only
/// rewrites these bounds; the compiled kernel is untouched and the next
/// dispatch just receives new range uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub real_min: f64,
    pub real_max: f64,
    pub imag_min: f64,
    pub imag_max: f64,

    /// Current zoom level relative to the initial bounds.
    pub zoom: f64,

    /// Real-axis span of the initial rectangle, kept so rectangle zooms can
    /// derive the zoom level.
    initial_real_span: f64,
}

impl Viewport {
    /// Family-specific initial bounds.
    ///
    /// Mandelbrot uses the historical `[-2, 1] × [-1, 1]` window; Julia sets
    /// are framed by the square `±escape_radius` (nothing outside it can be
    /// in the filled set); the burning ship and Newton windows frame the
    /// ship silhouette and the roots of `z³ − 1` respectively. The
    /// Sierpinski carpet navigates in pixel space and never consults its
    /// viewport.
    pub fn initial(kind: FractalKind, escape_radius: f64) -> Self {
        let (real_min, real_max, imag_min, imag_max) = match kind {
            FractalKind::Mandelbrot => (-2.0, 1.0, -1.0, 1.0),
            FractalKind::Julia => (
                -escape_radius,
                escape_radius,
                -escape_radius,
                escape_radius,
            ),
            FractalKind::BurningShip => (-2.5, 1.5, -2.0, 1.0),
            FractalKind::NewtonFractal => (-2.0, 2.0, -2.0, 2.0),
            FractalKind::SierpinskyCarpet => (-2.0, 2.0, -2.0, 2.0),
        };
        Self {
            real_min,
            real_max,
            imag_min,
            imag_max,
            zoom: 1.0,
            initial_real_span: real_max - real_min,
        }
    }

    /// Create a viewport with explicit bounds.
    pub fn new(
        real_min: f64,
        real_max: f64,
        imag_min: f64,
        imag_max: f64,
    ) -> crate::Result<Self> {
        if real_max <= real_min || imag_max <= imag_min {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "bounds must satisfy real_max > real_min and imag_max > imag_min, \
                     got re [{real_min}, {real_max}], im [{imag_min}, {imag_max}]"
                ),
            });
        }
        Ok(Self {
            real_min,
            real_max,
            imag_min,
            imag_max,
            zoom: 1.0,
            initial_real_span: real_max - real_min,
        })
    }

    #[inline]
    pub fn real_span(&self) -> f64 {
        self.real_max - self.real_min
    }

    #[inline]
    pub fn imag_span(&self) -> f64 {
        self.imag_max - self.imag_min
    }

    /// Map a pixel coordinate to a point on the complex plane.
    ///
    /// `(0, 0)` maps exactly to `(real_min, imag_min)` and `(w, h)` to
    /// `(real_max, imag_max)`; this is the same interpolation the generated
    /// kernels perform in `map_pixel`.
    #[inline]
    pub fn pixel_to_complex(&self, px: f64, py: f64, window_w: u32, window_h: u32) -> Complex {
        Complex::new(
            self.real_min + (px / window_w as f64) * self.real_span(),
            self.imag_min + (py / window_h as f64) * self.imag_span(),
        )
    }

    /// Zoom anchored at a pixel: both spans shrink by `1/factor` and the
    /// rectangle is recentred on the anchor's complex coordinate.
    ///
    /// Zoom-out is the same call with the reciprocal factor. The `zoom`
    /// accumulator is multiplied so the round trip (factor then reciprocal)
    /// restores both bounds and zoom.
    pub fn zoom_at(&mut self, anchor_px: f64, anchor_py: f64, window_w: u32, window_h: u32, factor: f64) {
        let anchor = self.pixel_to_complex(anchor_px, anchor_py, window_w, window_h);

        let new_real_span = self.real_span() / factor;
        let new_imag_span = self.imag_span() / factor;

        self.real_min = anchor.re - new_real_span / 2.0;
        self.real_max = anchor.re + new_real_span / 2.0;
        self.imag_min = anchor.im - new_imag_span / 2.0;
        self.imag_max = anchor.im + new_imag_span / 2.0;
        self.zoom *= factor;
    }

    /// Replace the bounds with a drag rectangle given in pixel space.
    ///
    /// Degenerate drags (zero width or zero height) are a complete no-op.
    /// With `aspect_lock` the shorter dimension grows (never shrinks)
    /// away from the drag origin `(px0, py0)` until the rectangle's aspect
    /// matches `window_w / window_h`. The derived zoom is
    /// `initial_real_span / new_real_span`.
    pub fn zoom_to_rect(
        &mut self,
        px0: f64,
        py0: f64,
        px1: f64,
        py1: f64,
        window_w: u32,
        window_h: u32,
        aspect_lock: bool,
    ) {
        let (mut px1, mut py1) = (px1, py1);
        if px1 == px0 || py1 == py0 {
            return;
        }

        if aspect_lock {
            let window_aspect = window_w as f64 / window_h as f64;
            let rect_w = (px1 - px0).abs();
            let rect_h = (py1 - py0).abs();
            if rect_w / rect_h < window_aspect {
                // Too narrow: widen in the drag direction.
                let grown = rect_h * window_aspect;
                px1 = px0 + grown * (px1 - px0).signum();
            } else {
                let grown = rect_w / window_aspect;
                py1 = py0 + grown * (py1 - py0).signum();
            }
        }

        let a = self.pixel_to_complex(px0, py0, window_w, window_h);
        let b = self.pixel_to_complex(px1, py1, window_w, window_h);

        self.real_min = a.re.min(b.re);
        self.real_max = a.re.max(b.re);
        self.imag_min = a.im.min(b.im);
        self.imag_max = a.im.max(b.im);
        self.zoom = self.initial_real_span / self.real_span();
    }

    /// Restore the family-specific initial bounds and reset zoom to 1.0.
    pub fn reset(&mut self, kind: FractalKind, escape_radius: f64) {
        *self = Self::initial(kind, escape_radius);
    }
}
