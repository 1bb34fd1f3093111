use thiserror::Error;

/// Errors originating from kernel assembly and GPU dispatch.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("generated kernel failed to compile:\n{log}")]
    ShaderCompile { log: String },

    #[error("fragment {fragment:?} requires substitution token {token:?}")]
    MissingSubstitution {
        fragment: &'static str,
        token: &'static str,
    },

    #[error("token {token:?} left unresolved in fragment {fragment:?}")]
    UnresolvedToken { fragment: String, token: String },

    #[error("invalid render target dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("uniform block does not match the kernel's declared layout")]
    UniformMismatch,

    #[error("render target readback failed: {0}")]
    Readback(String),

    #[error("PNG export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Core(#[from] fraxel_core::CoreError),
}
