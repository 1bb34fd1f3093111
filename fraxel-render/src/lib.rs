pub mod error;
pub mod export;
pub mod fragment;
pub mod gpu;
pub mod template;

pub use error::RenderError;
pub use export::{export_png, to_rgba8};
pub use gpu::{CompiledKernel, GpuContext, KernelUniforms, RenderTarget};
pub use template::{KernelLayout, KernelSource};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
