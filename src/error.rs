//! Error types for the fallible edges of the crate: parsing configuration and
//! importing/exporting graphs. Interactive editing never fails.

use thiserror::Error;

/// Errors produced while loading an [`EditorConfig`](crate::EditorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} {value} is outside the supported scale range {min}..={max}")]
    ScaleOutOfBounds { field: &'static str, value: f32, min: f32, max: f32 },

    #[error("min_scale {min} is larger than max_scale {max}")]
    ScaleRange { min: f32, max: f32 },
}

/// Errors produced while importing a computed skeleton or a saved graph.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("import JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Every entry was malformed, nothing could be imported.
    #[error("import contained no usable seeds or paths ({dropped} entries dropped)")]
    Empty { dropped: usize },
}

pub type ImportResult<T> = Result<T, ImportError>;
