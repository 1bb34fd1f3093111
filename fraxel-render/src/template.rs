//! Kernel source assembly.
//!
//! `KernelSource::build` selects the iteration and coloring fragments for a
//! fractal family, substitutes the numeric-type tokens and parameter
//! literals, and concatenates a complete WGSL compute kernel. No fractal
//! math happens here, only text assembly, checked against each fragment's
//! substitution contract.

use std::collections::HashMap;

use tracing::debug;

use fraxel_core::{FractalKind, FractalParams, Precision};

use crate::error::RenderError;
use crate::fragment::{self, Fragment};

/// Which uniform block the assembled kernel expects at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelLayout {
    /// `u_maxIter`, `u_resolution`, `u_real_range`, `u_imag_range`.
    Escape,
    /// `u_depth`, `u_zoom`, `u_center`.
    Carpet,
}

/// A fully assembled compute-kernel source, ready to compile.
#[derive(Debug, Clone)]
pub struct KernelSource {
    pub source: String,
    pub layout: KernelLayout,
    /// The precision actually baked into the source (may be downgraded from
    /// the requested one, see [`KernelSource::build`]).
    pub precision: Precision,
}

impl KernelSource {
    /// Assemble the kernel for `params`.
    ///
    /// Fragment selection: Mandelbrot and Julia split into direct-multiply
    /// and polar multibrot/multi-Julia variants on `exponent == 2`; the
    /// burning ship always uses fire coloring; the Newton fractal always
    /// uses discrete coloring; the Sierpinski carpet is a standalone
    /// template. Double precision is honored only for `exponent == 2`;
    /// the polar kernels need `pow`/`atan2`/`sin`/`cos`, which the shader
    /// backend only provides at f32.
    pub fn build(params: &FractalParams) -> Result<Self, RenderError> {
        params.validate()?;

        let precision = effective_precision(params);
        let subs = substitutions(params, precision);

        if params.kind == FractalKind::SierpinskyCarpet {
            let source = substitute(&fragment::CARPET, &subs)?;
            return Ok(Self {
                source,
                layout: KernelLayout::Carpet,
                precision,
            });
        }

        let (iteration, coloring) = select_fragments(params.kind, params.exponent);
        debug!(
            kind = %params.kind,
            iteration = iteration.name,
            coloring = coloring.name,
            %precision,
            "assembling kernel source"
        );

        let mut source = String::new();
        source.push_str(&substitute(&fragment::HEADER_ESCAPE, &subs)?);
        source.push('\n');
        source.push_str(&substitute(&coloring, &subs)?);
        source.push('\n');
        source.push_str(&substitute(&iteration, &subs)?);
        source.push('\n');
        source.push_str(&substitute(&fragment::MAP_PIXEL, &subs)?);
        source.push('\n');
        source.push_str(&substitute(&fragment::ENTRY_ESCAPE, &subs)?);

        Ok(Self {
            source,
            layout: KernelLayout::Escape,
            precision,
        })
    }
}

/// Double precision is only available for the direct-multiply kernels.
fn effective_precision(params: &FractalParams) -> Precision {
    if params.precision == Precision::Double && params.exponent != 2 {
        debug!(
            exponent = params.exponent,
            "polar kernel requested with double precision; using single"
        );
        return Precision::Single;
    }
    params.precision
}

fn select_fragments(kind: FractalKind, exponent: i32) -> (Fragment, Fragment) {
    match kind {
        FractalKind::Mandelbrot if exponent == 2 => {
            (fragment::ITER_MANDELBROT, fragment::COLOR_SMOOTH)
        }
        FractalKind::Mandelbrot => (fragment::ITER_MULTIBROT, fragment::COLOR_SMOOTH),
        FractalKind::Julia if exponent == 2 => (fragment::ITER_JULIA, fragment::COLOR_SMOOTH),
        FractalKind::Julia => (fragment::ITER_MULTI_JULIA, fragment::COLOR_SMOOTH),
        FractalKind::BurningShip => (fragment::ITER_BURNING_SHIP, fragment::COLOR_FIRE),
        FractalKind::NewtonFractal => (fragment::ITER_NEWTON, fragment::COLOR_DISCRETE),
        FractalKind::SierpinskyCarpet => unreachable!("carpet uses the standalone template"),
    }
}

/// The full substitution map for one build.
fn substitutions(params: &FractalParams, precision: Precision) -> HashMap<&'static str, String> {
    let (vec2type, floattype) = match precision {
        Precision::Single => ("vec2<f32>", "f32"),
        Precision::Double => ("vec2<f64>", "f64"),
    };
    let mut map = HashMap::new();
    map.insert("{vec2type}", vec2type.to_string());
    map.insert("{floattype}", floattype.to_string());
    map.insert("{escape_radius}", format!("{:?}", params.escape_radius));
    map.insert("{exponent}", params.exponent.to_string());
    map.insert(
        "{julia_c}",
        format!("{:?}, {:?}", params.julia_c.re, params.julia_c.im),
    );
    map
}

/// Instantiate one fragment: verify its required tokens are supplied,
/// replace them, and reject any known token that survives.
fn substitute(
    fragment: &Fragment,
    subs: &HashMap<&'static str, String>,
) -> Result<String, RenderError> {
    let mut text = fragment.source.to_string();
    for &token in fragment.required_keys {
        let value = subs.get(token).ok_or(RenderError::MissingSubstitution {
            fragment: fragment.name,
            token,
        })?;
        text = text.replace(token, value);
    }
    for token in fragment::KNOWN_TOKENS {
        if text.contains(token) {
            return Err(RenderError::UnresolvedToken {
                fragment: fragment.name.to_string(),
                token: token.to_string(),
            });
        }
    }
    Ok(text)
}
