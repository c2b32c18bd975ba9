// Custom error types for better error handling and debugging
//
// Using thiserror for ergonomic error definitions with:
// - Context preservation
// - Type-safe error matching
// - Automatic Display/Error trait implementations
// - Source error chaining

use thiserror::Error;

/// Codec errors (base64 transport encoding and decoding)
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("input file not found: {path}")]
    NotFound { path: String },

    #[error("unsupported encoding input: {path} is not a regular file")]
    Unsupported { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("image serialization failed: {0}")]
    Encode(image::ImageError),

    #[error("base64 decoding failed: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("decoded payload is not a valid image: {0}")]
    Malformed(image::ImageError),
}

/// Segmentation service errors
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("segmentation request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("segmentation service returned {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("no foreground found in input image")]
    NoForeground,

    #[error("confidence mask is {got_width}x{got_height} but input image is {want_width}x{want_height}")]
    DimensionMismatch {
        got_width: u32,
        got_height: u32,
        want_width: u32,
        want_height: u32,
    },

    #[error("invalid segmentation response: {0}")]
    InvalidResponse(String),

    #[error("failed to encode request image: {0}")]
    Codec(#[from] CodecError),
}

/// Translation service errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("translation service returned {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("invalid translation response: {0}")]
    InvalidResponse(String),
}

/// Generative edit service errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("prompt translation failed: {0}")]
    Translation(#[from] TranslationError),

    #[error("invalid edit request: {0}")]
    InvalidRequest(String),

    #[error("generative service request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("generative service returned {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("generative service returned no images")]
    EmptyResponse,

    #[error("failed to encode or decode image payload: {0}")]
    Codec(#[from] CodecError),
}

/// Pipeline orchestration errors
///
/// Each variant names the stage that failed so a single run log is enough
/// to diagnose without re-running.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input image not found: {path}")]
    InputNotFound { path: String },

    #[error("failed to load input image {path}: {source}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("segmentation stage failed: {0}")]
    Segmentation(#[from] SegmentationError),

    #[error("failed to persist mask to {path}: {source}")]
    MaskPersistence {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("generation stage failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("failed to write output image {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to move output into place at {path}: {source}")]
    OutputRename {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("cfg scale must be in [1.1, 10.0], got {0}")]
    InvalidCfgScale(f64),

    #[error("number of images must be > 0")]
    InvalidImageCount,
}

// Convenience type aliases for Results
pub type CodecResult<T> = Result<T, CodecError>;
pub type SegmentationResult<T> = Result<T, SegmentationError>;
pub type TranslationResult<T> = Result<T, TranslationError>;
pub type GenerationResult<T> = Result<T, GenerationError>;
pub type PipelineResult<T> = Result<T, PipelineError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
