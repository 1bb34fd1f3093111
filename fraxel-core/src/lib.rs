pub mod complex;
pub mod error;
pub mod params;
pub mod reference;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use params::{
    julia_constant, julia_presets, FractalKind, FractalParams, JuliaPreset, Precision,
    DEFAULT_JULIA_PRESET,
};
pub use viewport::Viewport;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
