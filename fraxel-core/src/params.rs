use std::fmt;
use std::str::FromStr;

use crate::complex::Complex;
use crate::error::CoreError;

/// The fractal families the viewer can dispatch.
///
/// Multibrot and multi-Julia are not separate kinds: they are the
/// `exponent != 2` variants of [`Mandelbrot`](Self::Mandelbrot) and
/// [`Julia`](Self::Julia), selected when the kernel source is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
    BurningShip,
    NewtonFractal,
    SierpinskyCarpet,
}

impl FractalKind {
    pub const ALL: [FractalKind; 5] = [
        FractalKind::Mandelbrot,
        FractalKind::Julia,
        FractalKind::BurningShip,
        FractalKind::NewtonFractal,
        FractalKind::SierpinskyCarpet,
    ];

    /// The key prefix used in the settings store (`"{key}_max_iter"` etc.).
    pub fn key(self) -> &'static str {
        match self {
            FractalKind::Mandelbrot => "mandelbrot",
            FractalKind::Julia => "julia",
            FractalKind::BurningShip => "burning_ship",
            FractalKind::NewtonFractal => "newton_fractal",
            FractalKind::SierpinskyCarpet => "sierpinsky",
        }
    }

    /// Human-readable family name, used in status updates.
    pub fn display_name(self) -> &'static str {
        match self {
            FractalKind::Mandelbrot => "Mandelbrot",
            FractalKind::Julia => "Julia",
            FractalKind::BurningShip => "Burning Ship",
            FractalKind::NewtonFractal => "Newton Fractal",
            FractalKind::SierpinskyCarpet => "Sierpinsky Carpet",
        }
    }

    /// Escape-time kinds map pixels into the complex plane and take the
    /// range/iteration uniform block; the carpet takes depth/zoom/center.
    pub fn is_escape_time(self) -> bool {
        !matches!(self, FractalKind::SierpinskyCarpet)
    }

    /// Whether the family has a configurable exponent (`"{key}_n"`).
    pub fn supports_exponent(self) -> bool {
        matches!(self, FractalKind::Mandelbrot | FractalKind::Julia)
    }
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FractalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mandelbrot" => Ok(FractalKind::Mandelbrot),
            "julia" => Ok(FractalKind::Julia),
            "burning_ship" | "burning-ship" => Ok(FractalKind::BurningShip),
            "newton_fractal" | "newton" => Ok(FractalKind::NewtonFractal),
            "sierpinsky" | "sierpinsky_carpet" => Ok(FractalKind::SierpinskyCarpet),
            other => Err(format!("unknown fractal: {other:?}")),
        }
    }
}

/// Numeric precision of the generated kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    #[default]
    Single,
    Double,
}

impl FromStr for Precision {
    type Err = CoreError;

    /// Parses the settings-store strings `"Single"` / `"Double"`
    /// case-insensitively; anything else is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Precision::Single),
            "double" => Ok(Precision::Double),
            _ => Err(CoreError::InvalidPrecision(s.to_string())),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Single => "Single",
            Precision::Double => "Double",
        })
    }
}

// ---------------------------------------------------------------------------
// Julia presets
// ---------------------------------------------------------------------------

/// A named Julia constant.
#[derive(Debug, Clone, Copy)]
pub struct JuliaPreset {
    pub name: &'static str,
    pub c: Complex,
}

/// Default preset used when the settings store has no `julia_type` key.
pub const DEFAULT_JULIA_PRESET: &str = "Classic swirling";

/// The fixed table of named Julia constants.
pub fn julia_presets() -> &'static [JuliaPreset] {
    const PRESETS: [JuliaPreset; 6] = [
        JuliaPreset {
            name: "Classic swirling",
            c: Complex { re: -0.7, im: 0.27015 },
        },
        JuliaPreset {
            name: "Dendrite",
            c: Complex { re: 0.0, im: 1.0 },
        },
        JuliaPreset {
            name: "Douady rabbit",
            c: Complex { re: -0.123, im: 0.745 },
        },
        JuliaPreset {
            name: "San Marco",
            c: Complex { re: -0.75, im: 0.0 },
        },
        JuliaPreset {
            name: "Siegel disk",
            c: Complex { re: -0.391, im: -0.587 },
        },
        JuliaPreset {
            name: "Frost",
            c: Complex { re: -0.4, im: 0.6 },
        },
    ];
    &PRESETS
}

/// Look up a Julia constant by preset name.
pub fn julia_constant(name: &str) -> crate::Result<Complex> {
    julia_presets()
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.c)
        .ok_or_else(|| CoreError::UnknownJuliaPreset(name.to_string()))
}

// ---------------------------------------------------------------------------
// Fractal parameters
// ---------------------------------------------------------------------------

/// Everything a viewer session fixes at construction time.
///
/// Immutable for the lifetime of one session: any of these changing means a
/// new kernel, so the session is reopened. Pan/zoom only touches the
/// [`Viewport`](crate::Viewport), never these.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalParams {
    pub kind: FractalKind,
    pub precision: Precision,
    /// Iteration exponent `n`; 2 selects the direct complex-multiply
    /// kernels, anything larger the polar multibrot/multi-Julia variants.
    pub exponent: i32,
    pub escape_radius: f64,
    pub max_iterations: u32,
    /// Name of the Julia preset in use (Julia kind only).
    pub julia_type: String,
    /// The resolved Julia constant for `julia_type`.
    pub julia_c: Complex,
    /// Recursion depth (Sierpinski carpet only).
    pub depth: u32,
    /// Zoom factor applied per click.
    pub zoom_increase: f64,
}

impl FractalParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 200;
    pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;
    pub const DEFAULT_ZOOM_INCREASE: f64 = 2.0;
    pub const DEFAULT_DEPTH: u32 = 10;

    /// Documented defaults for a family; the settings store overrides
    /// individual fields afterwards and then calls [`validate`](Self::validate).
    pub fn for_kind(kind: FractalKind) -> Self {
        Self {
            kind,
            precision: Precision::Single,
            exponent: 2,
            escape_radius: Self::DEFAULT_ESCAPE_RADIUS,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            julia_type: DEFAULT_JULIA_PRESET.to_string(),
            julia_c: julia_constant(DEFAULT_JULIA_PRESET).expect("default preset exists"),
            depth: Self::DEFAULT_DEPTH,
            zoom_increase: Self::DEFAULT_ZOOM_INCREASE,
        }
    }

    /// Resolve a Julia preset by name, updating both the name and constant.
    pub fn set_julia_type(&mut self, name: &str) -> crate::Result<()> {
        self.julia_c = julia_constant(name)?;
        self.julia_type = name.to_string();
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(self.max_iterations));
        }
        if self.escape_radius <= 0.0 || !self.escape_radius.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(self.escape_radius));
        }
        if self.exponent < 2 {
            return Err(CoreError::InvalidExponent(self.exponent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_key() {
        for kind in FractalKind::ALL {
            assert_eq!(kind.key().parse::<FractalKind>().unwrap(), kind);
        }
    }

    #[test]
    fn precision_parses_case_insensitively() {
        assert_eq!("Single".parse::<Precision>().unwrap(), Precision::Single);
        assert_eq!("double".parse::<Precision>().unwrap(), Precision::Double);
        assert_eq!("DOUBLE".parse::<Precision>().unwrap(), Precision::Double);
    }

    #[test]
    fn invalid_precision_is_an_error() {
        let err = "quad".parse::<Precision>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrecision(s) if s == "quad"));
    }

    #[test]
    fn default_preset_is_in_the_table() {
        let c = julia_constant(DEFAULT_JULIA_PRESET).unwrap();
        assert!((c.re - (-0.7)).abs() < 1e-12);
        assert!((c.im - 0.27015).abs() < 1e-12);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = julia_constant("No such swirl").unwrap_err();
        assert!(matches!(err, CoreError::UnknownJuliaPreset(_)));
    }

    #[test]
    fn defaults_validate() {
        for kind in FractalKind::ALL {
            FractalParams::for_kind(kind).validate().unwrap();
        }
    }

    #[test]
    fn bad_params_rejected() {
        let mut p = FractalParams::for_kind(FractalKind::Mandelbrot);
        p.max_iterations = 0;
        assert!(p.validate().is_err());

        let mut p = FractalParams::for_kind(FractalKind::Mandelbrot);
        p.escape_radius = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = FractalParams::for_kind(FractalKind::Julia);
        p.exponent = 1;
        assert!(p.validate().is_err());
    }
}
