// Binary mask building
//
// The segmentation service returns a continuous-valued foreground confidence
// raster; the generative service needs a strict two-level mask. Pixels at or
// above the threshold are preserved, pixels below it are regenerated. The
// tie-break (>=, not >) controls the inpainting boundary and must stay exact.

use image::{GrayImage, Luma};

/// Pixel value the generative model is allowed to regenerate
pub const EDITABLE: u8 = 0;

/// Pixel value the generative model must leave unchanged
pub const PRESERVED: u8 = 255;

/// Threshold a grayscale confidence image into a strict binary mask.
///
/// Deterministic and side-effect free; the threshold is always the caller's
/// configured value, never an implicit constant.
pub fn binarize(confidence: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(confidence.width(), confidence.height(), |x, y| {
        let intensity = confidence.get_pixel(x, y)[0];
        if intensity >= threshold {
            Luma([PRESERVED])
        } else {
            Luma([EDITABLE])
        }
    })
}
