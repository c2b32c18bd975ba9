pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::Config;
pub use errors::{
    CodecError, ConfigError, GenerationError, PipelineError, SegmentationError, TranslationError,
};
pub use types::{EditRequest, EditResult, TaskType};
