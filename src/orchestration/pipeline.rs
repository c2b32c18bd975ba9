// End-to-end edit pipeline
//
// Sequences segmentation, mask building, mask persistence, base image
// loading, the generative edit and output persistence. Strictly sequential:
// each stage completes before the next begins, and any stage failure skips
// everything after it. All intermediate values are local to one run; the only
// shared resource is the mask artifact path, which the configuration
// parameterizes per run.

use image::{DynamicImage, ImageFormat};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::errors::{PipelineError, PipelineResult};
use crate::core::types::{EditResult, TaskType};
use crate::services::generation::ImageGenerator;
use crate::services::segmentation::Segmenter;
use crate::utils::mask::binarize;

/// The edit orchestrator
pub struct EditPipeline<S: Segmenter, G: ImageGenerator> {
    segmenter: S,
    generator: G,
    mask_threshold: u8,
    mask_artifact_path: std::path::PathBuf,
}

impl<S: Segmenter, G: ImageGenerator> EditPipeline<S, G> {
    pub fn new(segmenter: S, generator: G, config: &Config) -> Self {
        Self {
            segmenter,
            generator,
            mask_threshold: config.mask.threshold,
            mask_artifact_path: config.mask.artifact_path.clone(),
        }
    }

    /// Run one edit: segmentation, binarization, mask persistence, the
    /// generative inpainting call and output persistence.
    ///
    /// On success the generated image is at `output_path`; on failure no
    /// partial output file exists there. The mask written to the configured
    /// artifact path is a debug side artifact; the in-memory mask is the
    /// authoritative input to the generative call.
    pub async fn run(
        &self,
        input_path: &Path,
        output_path: &Path,
        prompt: &str,
        negative_prompt: &str,
        seed: u64,
    ) -> PipelineResult<EditResult> {
        let start = Instant::now();
        info!("Starting edit pipeline for {}", input_path.display());

        if !input_path.exists() {
            return Err(PipelineError::InputNotFound {
                path: input_path.display().to_string(),
            });
        }

        let input_image = image::open(input_path).map_err(|source| PipelineError::ImageLoad {
            path: input_path.display().to_string(),
            source,
        })?;
        debug!(
            "Loaded input image: {}x{}",
            input_image.width(),
            input_image.height()
        );

        let confidence = self.segmenter.segment(&input_image).await?;

        let mask = binarize(&confidence, self.mask_threshold);
        debug!(
            "Binarized mask at threshold {} ({} editable pixels)",
            self.mask_threshold,
            mask.pixels().filter(|p| p[0] == 0).count()
        );

        mask.save(&self.mask_artifact_path)
            .map_err(|source| PipelineError::MaskPersistence {
                path: self.mask_artifact_path.display().to_string(),
                source,
            })?;
        info!("Mask written to {}", self.mask_artifact_path.display());

        // The edit operates on luminance only; original chrominance is
        // deliberately discarded.
        let base_image = DynamicImage::ImageLuma8(input_image.to_luma8());

        let result = self
            .generator
            .edit(
                TaskType::Inpainting,
                prompt,
                negative_prompt,
                base_image,
                Some(mask),
                seed,
            )
            .await?;

        persist_output(&result.image, output_path)?;

        info!(
            "Edit completed in {:.2}s, output at {}",
            start.elapsed().as_secs_f64(),
            output_path.display()
        );

        Ok(result)
    }
}

/// Write the generated image without ever leaving a partial file at the
/// destination: write a sibling temp file, then rename into place.
fn persist_output(image: &DynamicImage, output_path: &Path) -> PipelineResult<()> {
    let format = ImageFormat::from_path(output_path).unwrap_or(ImageFormat::Png);

    let mut tmp_path = output_path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_path);

    if let Err(source) = image.save_with_format(&tmp_path, format) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(PipelineError::OutputWrite {
            path: output_path.display().to_string(),
            source,
        });
    }

    std::fs::rename(&tmp_path, output_path).map_err(|source| PipelineError::OutputRename {
        path: output_path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::errors::{GenerationError, SegmentationError};
    use crate::utils::mask::PRESERVED;
    use async_trait::async_trait;
    use image::{GrayImage, Luma};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    enum SegmenterMode {
        Uniform(u8),
        NoForeground,
    }

    struct FakeSegmenter {
        mode: SegmenterMode,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Segmenter for FakeSegmenter {
        async fn segment(
            &self,
            image: &DynamicImage,
        ) -> Result<GrayImage, SegmentationError> {
            self.called.store(true, Ordering::SeqCst);
            match self.mode {
                SegmenterMode::Uniform(value) => Ok(GrayImage::from_pixel(
                    image.width(),
                    image.height(),
                    Luma([value]),
                )),
                SegmenterMode::NoForeground => Err(SegmentationError::NoForeground),
            }
        }
    }

    struct FakeGenerator {
        fail: bool,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn edit(
            &self,
            _task_type: TaskType,
            prompt: &str,
            _negative_prompt: &str,
            base_image: DynamicImage,
            mask: Option<GrayImage>,
            seed: u64,
        ) -> Result<EditResult, GenerationError> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(GenerationError::EmptyResponse);
            }
            assert!(mask.is_some());
            Ok(EditResult {
                image: DynamicImage::new_rgba8(base_image.width(), base_image.height()),
                seed,
                prompt: prompt.to_string(),
            })
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        input: std::path::PathBuf,
        output: std::path::PathBuf,
        config: Config,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.png");
        let output = dir.path().join("output.png");

        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([90u8])));
        image.save(&input).unwrap();

        let mut config = Config::new().unwrap();
        config.mask.threshold = 128;
        config.mask.artifact_path = dir.path().join("mask.png");

        Fixture {
            dir,
            input,
            output,
            config,
        }
    }

    fn pipeline(
        mode: SegmenterMode,
        generator_fails: bool,
        config: &Config,
    ) -> (
        EditPipeline<FakeSegmenter, FakeGenerator>,
        Arc<AtomicBool>,
        Arc<AtomicBool>,
    ) {
        let seg_called = Arc::new(AtomicBool::new(false));
        let gen_called = Arc::new(AtomicBool::new(false));
        let pipeline = EditPipeline::new(
            FakeSegmenter {
                mode,
                called: seg_called.clone(),
            },
            FakeGenerator {
                fail: generator_fails,
                called: gen_called.clone(),
            },
            config,
        );
        (pipeline, seg_called, gen_called)
    }

    #[tokio::test]
    async fn test_happy_path_writes_mask_and_output() {
        let fx = fixture();
        let (pipeline, _, gen_called) =
            pipeline(SegmenterMode::Uniform(200), false, &fx.config);

        let result = pipeline
            .run(&fx.input, &fx.output, "a red apple on a table", "blurry", 42)
            .await
            .unwrap();

        assert_eq!(result.seed, 42);
        assert!(fx.config.mask.artifact_path.exists());
        assert!(fx.output.exists());
        assert!(gen_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_uniform_mid_gray_confidence_preserves_everything() {
        // Segmentation returns uniform mid-gray; at threshold 128 the >=
        // tie-break maps every pixel to "preserved".
        let fx = fixture();
        let (pipeline, _, _) = pipeline(SegmenterMode::Uniform(128), false, &fx.config);

        pipeline
            .run(&fx.input, &fx.output, "prompt", "", 0)
            .await
            .unwrap();

        let saved = image::open(&fx.config.mask.artifact_path).unwrap().to_luma8();
        assert!(saved.pixels().all(|p| p[0] == PRESERVED));
    }

    #[tokio::test]
    async fn test_no_foreground_leaves_no_artifacts() {
        let fx = fixture();
        let (pipeline, _, gen_called) =
            pipeline(SegmenterMode::NoForeground, false, &fx.config);

        let result = pipeline.run(&fx.input, &fx.output, "prompt", "", 0).await;

        assert!(matches!(
            result,
            Err(PipelineError::Segmentation(SegmentationError::NoForeground))
        ));
        assert!(!fx.config.mask.artifact_path.exists());
        assert!(!fx.output.exists());
        assert!(!gen_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_no_output() {
        let fx = fixture();
        let (pipeline, _, _) = pipeline(SegmenterMode::Uniform(200), true, &fx.config);

        let result = pipeline.run(&fx.input, &fx.output, "prompt", "", 0).await;

        assert!(matches!(
            result,
            Err(PipelineError::Generation(GenerationError::EmptyResponse))
        ));
        assert!(!fx.output.exists());
        // No stray temp file either
        assert!(!fx.dir.path().join("output.png.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_input_skips_all_stages() {
        let fx = fixture();
        let (pipeline, seg_called, gen_called) =
            pipeline(SegmenterMode::Uniform(200), false, &fx.config);

        let missing = fx.dir.path().join("missing.png");
        let result = pipeline.run(&missing, &fx.output, "prompt", "", 0).await;

        assert!(matches!(result, Err(PipelineError::InputNotFound { .. })));
        assert!(!seg_called.load(Ordering::SeqCst));
        assert!(!gen_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_generator_failure_does_not_overwrite_existing_output() {
        let fx = fixture();
        std::fs::write(&fx.output, b"previous run output").unwrap();
        let (pipeline, _, _) = pipeline(SegmenterMode::Uniform(200), true, &fx.config);

        let result = pipeline.run(&fx.input, &fx.output, "prompt", "", 0).await;

        assert!(result.is_err());
        assert_eq!(
            std::fs::read(&fx.output).unwrap(),
            b"previous run output"
        );
    }
}
