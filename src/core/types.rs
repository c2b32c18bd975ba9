// Data contracts shared between the pipeline stages

use image::{DynamicImage, GrayImage};

use crate::core::errors::GenerationError;

/// Edit task understood by the generative service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// Regenerate the editable region of a masked image
    Inpainting,
    /// Extend a masked image beyond its preserved region
    Outpainting,
    /// Re-render the whole image without a mask
    Variation,
}

impl TaskType {
    /// Wire name of the task, upper-case as the service expects
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Inpainting => "INPAINTING",
            TaskType::Outpainting => "OUTPAINTING",
            TaskType::Variation => "IMAGE_VARIATION",
        }
    }

    /// Whether the request must carry a mask of matching dimensions
    pub fn requires_mask(self) -> bool {
        match self {
            TaskType::Inpainting | TaskType::Outpainting => true,
            TaskType::Variation => false,
        }
    }

    /// Key of the per-task parameter block in the request body
    pub fn params_key(self) -> &'static str {
        match self {
            TaskType::Inpainting => "inPaintingParams",
            TaskType::Outpainting => "outPaintingParams",
            TaskType::Variation => "imageVariationParams",
        }
    }
}

/// One generative edit request, validated at construction
///
/// The prompt carried here is the already-translated prompt; translation
/// happens before the request is built so a translation failure can never
/// produce a request with the untranslated text.
#[derive(Debug)]
pub struct EditRequest {
    pub task_type: TaskType,
    pub prompt: String,
    pub negative_prompt: String,
    pub base_image: DynamicImage,
    pub mask: Option<GrayImage>,
    pub seed: u64,
}

impl EditRequest {
    /// Build a request, enforcing the mask invariants of the task type:
    /// mask-requiring tasks must carry a mask with the base image's exact
    /// dimensions, non-masked tasks must not carry one.
    pub fn new(
        task_type: TaskType,
        prompt: String,
        negative_prompt: String,
        base_image: DynamicImage,
        mask: Option<GrayImage>,
        seed: u64,
    ) -> Result<Self, GenerationError> {
        match (&mask, task_type.requires_mask()) {
            (None, true) => {
                return Err(GenerationError::InvalidRequest(format!(
                    "task {} requires a mask",
                    task_type.as_str()
                )));
            }
            (Some(m), true) => {
                if m.dimensions() != (base_image.width(), base_image.height()) {
                    return Err(GenerationError::InvalidRequest(format!(
                        "mask is {}x{} but base image is {}x{}",
                        m.width(),
                        m.height(),
                        base_image.width(),
                        base_image.height()
                    )));
                }
            }
            (Some(_), false) => {
                return Err(GenerationError::InvalidRequest(format!(
                    "task {} does not accept a mask",
                    task_type.as_str()
                )));
            }
            (None, false) => {}
        }

        Ok(Self {
            task_type,
            prompt,
            negative_prompt,
            base_image,
            mask,
            seed,
        })
    }
}

/// One generated image together with the seed and prompt that produced it
#[derive(Debug)]
pub struct EditResult {
    pub image: DynamicImage,
    pub seed: u64,
    pub prompt: String,
}
