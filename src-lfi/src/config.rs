//! Bounds and fitness-weight documents
//!
//! Both are JSON. Every field of the bounds document is required; the weights
//! document may omit entries, which then keep their default value.
//!
//! ```json
//! { "x": { "min": 0, "max": 2000, "step": 5 }, "y": { ... }, "delay": { ... },
//!   "power_width": { ... }, "intensity": { ... } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use lfi_bench::STAGE_SIZE;
use lfi_ga::{FieldBounds, FitnessWeights, GaError, ParameterBounds};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid strategy: {0}")]
    Strategy(String),

    #[error(transparent)]
    Invalid(#[from] GaError),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Library defaults with x and y opened to the whole stage
pub fn default_bounds() -> ParameterBounds {
    ParameterBounds {
        x: FieldBounds::new(0.0, STAGE_SIZE, 5.0),
        y: FieldBounds::new(0.0, STAGE_SIZE, 5.0),
        ..ParameterBounds::default()
    }
}

pub fn load_bounds(path: &Path) -> Result<ParameterBounds, ConfigError> {
    let bounds: ParameterBounds = read_json(path)?;
    bounds.validate()?;
    log::debug!("bounds from {}: {:?}", path.display(), bounds);
    Ok(bounds)
}

pub fn load_weights(path: &Path) -> Result<FitnessWeights, ConfigError> {
    let weights: FitnessWeights = read_json(path)?;
    weights.validate()?;
    log::debug!("fitness weights from {}: {:?}", path.display(), weights);
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const FULL_BOUNDS: &str = r#"{
        "x": { "min": 0, "max": 2000, "step": 5 },
        "y": { "min": 0, "max": 2000, "step": 5 },
        "delay": { "min": 1, "max": 100, "step": 10 },
        "power_width": { "min": 1, "max": 100, "step": 5 },
        "intensity": { "min": 0, "max": 100, "step": 1 }
    }"#;

    #[test]
    fn test_load_bounds() {
        let file = write_tmp(FULL_BOUNDS);
        let bounds = load_bounds(file.path()).unwrap();
        assert_eq!(bounds, default_bounds());
    }

    #[test]
    fn test_missing_bound_field_is_fatal() {
        let file = write_tmp(r#"{ "x": { "min": 0, "max": 10, "step": 1 } }"#);
        assert!(matches!(load_bounds(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_fractional_intensity_bounds_rejected() {
        let file = write_tmp(&FULL_BOUNDS.replace(r#""step": 1 }"#, r#""step": 0.5 }"#));
        assert!(matches!(load_bounds(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_weights_keep_defaults() {
        let file = write_tmp(r#"{ "mute": 12.0 }"#);
        let weights = load_weights(file.path()).unwrap();
        assert_eq!(weights.mute, 12.0);
        assert_eq!(weights.fail, FitnessWeights::default().fail);
    }

    #[test]
    fn test_unreadable_file() {
        let res = load_weights(Path::new("/this/file/does/not/exist.json"));
        assert!(matches!(res, Err(ConfigError::Io { .. })));
    }
}
