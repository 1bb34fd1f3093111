use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the viewer application itself.
///
/// Core and render failures pass through transparently so `main` can print
/// one coherent message regardless of which layer failed.
#[derive(Debug, Error)]
pub enum AppError {
    /// The settings file could not be read. Fatal at startup.
    #[error("failed to read settings file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not a JSON object of the expected shape.
    #[error("invalid settings file {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    /// A settings key holds a value of the wrong type.
    #[error("settings key {key:?} has an invalid value: {reason}")]
    ConfigValue { key: String, reason: String },

    #[error(
        "usage: fraxel <fractal> [--width W] [--height H] [--out PATH] \
         [--zoom-clicks N] [--rect-zoom]"
    )]
    Usage,

    #[error("{0}")]
    UnknownFractal(String),

    #[error(transparent)]
    Core(#[from] fraxel_core::CoreError),

    #[error(transparent)]
    Render(#[from] fraxel_render::RenderError),
}
