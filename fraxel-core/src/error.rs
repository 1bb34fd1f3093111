use thiserror::Error;

/// Errors originating from the core viewport and parameter types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid precision: {0:?} (expected \"Single\" or \"Double\")")]
    InvalidPrecision(String),

    #[error("unknown Julia preset: {0:?}")]
    UnknownJuliaPreset(String),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid escape radius: {0} (must be > 0.0)")]
    InvalidEscapeRadius(f64),

    #[error("invalid exponent: {0} (must be >= 2)")]
    InvalidExponent(i32),
}
