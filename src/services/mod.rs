pub mod generation;
pub mod segmentation;
pub mod translation;

// Re-export commonly used services
pub use generation::{GenerativeEditClient, ImageGenerator};
pub use segmentation::{SegmentationClient, Segmenter};
pub use translation::{TranslationClient, Translator};
