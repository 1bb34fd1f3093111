use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use fraxel_core::{FractalKind, FractalParams, Precision, DEFAULT_JULIA_PRESET};

use crate::error::AppError;

/// Fallback iteration count when a `{kind}_max_iter` key is absent.
const DEFAULT_MAX_ITER: u32 = 200;
/// Fallback escape radius when a `{kind}_escape_radius` key is absent.
const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;
/// Fallback click-zoom factor when a `{kind}_zoom_increase` key is absent.
const DEFAULT_ZOOM_INCREASE: f64 = 2.0;
/// Fallback exponent when a `{kind}_n` key is absent.
const DEFAULT_EXPONENT: i32 = 2;
/// Fallback carpet recursion depth when `sierpinsky_depth` is absent.
const DEFAULT_DEPTH: u32 = 10;

/// Flat key/value settings store backed by a JSON file.
///
/// The file is read once at startup. Per-fractal keys are namespaced by the
/// fractal's key, e.g. `mandelbrot_max_iter` or `julia_escape_radius`.
/// A missing key falls back to a documented default; a missing or malformed
/// file is fatal.
#[derive(Debug, Clone)]
pub struct Settings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| AppError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| AppError::ConfigInvalid {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let values = match value {
            Value::Object(map) => map,
            other => {
                return Err(AppError::ConfigInvalid {
                    path,
                    reason: format!("expected a JSON object, got {other}"),
                })
            }
        };
        info!(path = %path.display(), keys = values.len(), "loaded settings");
        Ok(Self { path, values })
    }

    /// In-memory store for tests.
    #[cfg(test)]
    fn from_values(values: Map<String, Value>) -> Self {
        Self {
            path: PathBuf::from("<test>"),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn u32_key(&self, key: &str, default: u32) -> Result<u32, AppError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| AppError::ConfigValue {
                    key: key.to_string(),
                    reason: format!("expected a non-negative integer, got {v}"),
                }),
        }
    }

    fn f64_key(&self, key: &str, default: f64) -> Result<f64, AppError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(v) => v.as_f64().ok_or_else(|| AppError::ConfigValue {
                key: key.to_string(),
                reason: format!("expected a number, got {v}"),
            }),
        }
    }

    fn str_key<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, AppError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(v) => v.as_str().ok_or_else(|| AppError::ConfigValue {
                key: key.to_string(),
                reason: format!("expected a string, got {v}"),
            }),
        }
    }

    pub fn max_iterations(&self, kind: FractalKind) -> Result<u32, AppError> {
        self.u32_key(&format!("{}_max_iter", kind.key()), DEFAULT_MAX_ITER)
    }

    pub fn escape_radius(&self, kind: FractalKind) -> Result<f64, AppError> {
        self.f64_key(
            &format!("{}_escape_radius", kind.key()),
            DEFAULT_ESCAPE_RADIUS,
        )
    }

    pub fn precision(&self, kind: FractalKind) -> Result<Precision, AppError> {
        let key = format!("{}_precision", kind.key());
        let raw = self.str_key(&key, "single")?;
        raw.parse().map_err(|e: fraxel_core::CoreError| {
            AppError::ConfigValue {
                key,
                reason: e.to_string(),
            }
        })
    }

    pub fn zoom_increase(&self, kind: FractalKind) -> Result<f64, AppError> {
        self.f64_key(
            &format!("{}_zoom_increase", kind.key()),
            DEFAULT_ZOOM_INCREASE,
        )
    }

    pub fn exponent(&self, kind: FractalKind) -> Result<i32, AppError> {
        let key = format!("{}_n", kind.key());
        match self.values.get(&key) {
            None => Ok(DEFAULT_EXPONENT),
            Some(v) => v
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| AppError::ConfigValue {
                    key,
                    reason: format!("expected an integer, got {v}"),
                }),
        }
    }

    pub fn julia_type(&self) -> Result<&str, AppError> {
        self.str_key("julia_type", DEFAULT_JULIA_PRESET)
    }

    pub fn depth(&self) -> Result<u32, AppError> {
        self.u32_key("sierpinsky_depth", DEFAULT_DEPTH)
    }

    /// Assembles validated fractal parameters for one family from the
    /// namespaced keys, falling back to defaults for anything unset.
    pub fn fractal_params(&self, kind: FractalKind) -> Result<FractalParams, AppError> {
        let mut params = FractalParams::for_kind(kind);
        params.max_iterations = self.max_iterations(kind)?;
        params.escape_radius = self.escape_radius(kind)?;
        params.precision = self.precision(kind)?;
        params.zoom_increase = self.zoom_increase(kind)?;
        if kind.supports_exponent() {
            params.exponent = self.exponent(kind)?;
        }
        if kind == FractalKind::Julia {
            params.set_julia_type(self.julia_type()?)?;
        }
        if kind == FractalKind::SierpinskyCarpet {
            params.depth = self.depth()?;
        }
        params.validate()?;
        debug!(kind = kind.key(), ?params, "resolved fractal parameters");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: Value) -> Settings {
        match value {
            Value::Object(map) => Settings::from_values(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn defaults_apply_when_keys_are_absent() {
        let s = settings(json!({}));
        let p = s.fractal_params(FractalKind::Mandelbrot).unwrap();
        assert_eq!(p.max_iterations, 200);
        assert_eq!(p.escape_radius, 2.0);
        assert_eq!(p.precision, Precision::Single);
        assert_eq!(p.zoom_increase, 2.0);
        assert_eq!(p.exponent, 2);
    }

    #[test]
    fn namespaced_keys_override_defaults() {
        let s = settings(json!({
            "mandelbrot_max_iter": 500,
            "mandelbrot_precision": "double",
            "mandelbrot_n": 3,
            "julia_max_iter": 120,
            "julia_type": "Dendrite",
            "sierpinsky_depth": 4,
        }));
        let m = s.fractal_params(FractalKind::Mandelbrot).unwrap();
        assert_eq!(m.max_iterations, 500);
        assert_eq!(m.precision, Precision::Double);
        assert_eq!(m.exponent, 3);

        let j = s.fractal_params(FractalKind::Julia).unwrap();
        assert_eq!(j.max_iterations, 120);
        assert_eq!(j.julia_type, "Dendrite");

        let c = s.fractal_params(FractalKind::SierpinskyCarpet).unwrap();
        assert_eq!(c.depth, 4);
    }

    #[test]
    fn wrong_value_type_is_an_error() {
        let s = settings(json!({ "mandelbrot_max_iter": "lots" }));
        let err = s.fractal_params(FractalKind::Mandelbrot).unwrap_err();
        assert!(matches!(err, AppError::ConfigValue { .. }));
    }

    #[test]
    fn unknown_julia_preset_is_fatal() {
        let s = settings(json!({ "julia_type": "Nonsense" }));
        let err = s.fractal_params(FractalKind::Julia).unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(fraxel_core::CoreError::UnknownJuliaPreset(_))
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = Settings::load("/nonexistent/fraxel-settings.json").unwrap_err();
        assert!(matches!(err, AppError::ConfigRead { .. }));
    }
}
