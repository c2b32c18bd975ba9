// Library exports for the product photo edit pipeline
//
// Stages: segmentation -> mask building -> prompt translation -> generative
// inpainting, glued by the base64 image codec and sequenced by the
// orchestrator.

// Core modules
pub mod core;
pub mod orchestration;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions
pub use crate::core::{
    config::Config,
    errors::{
        CodecError, ConfigError, GenerationError, PipelineError, SegmentationError,
        TranslationError,
    },
    types::{EditRequest, EditResult, TaskType},
};

pub use orchestration::pipeline::EditPipeline;

pub use services::{
    GenerativeEditClient, ImageGenerator, SegmentationClient, Segmenter, TranslationClient,
    Translator,
};

pub use utils::{binarize, decode, encode, ImageSource};
