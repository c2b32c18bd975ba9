// Segmentation service client
//
// The background segmentation model runs behind an HTTP endpoint (rembg-style
// API): POST the raw image bytes, receive a single-channel foreground
// confidence raster of identical dimensions. HTTP 204 is the service's
// explicit "no foreground found" signal.

use async_trait::async_trait;
use image::{DynamicImage, GrayImage};
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::core::config::Config;
use crate::core::errors::{SegmentationError, SegmentationResult};
use crate::utils::codec;

/// Capability to segment a foreground subject out of an image.
///
/// A single method so tests can substitute a deterministic fake without
/// network access.
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Returns a foreground confidence raster with the input's dimensions.
    async fn segment(&self, image: &DynamicImage) -> SegmentationResult<GrayImage>;
}

/// HTTP client for the segmentation service
pub struct SegmentationClient {
    endpoint: String,
    http_client: reqwest::Client,
}

impl SegmentationClient {
    pub fn new(config: &Config) -> SegmentationResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            endpoint: config.segmentation.endpoint.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl Segmenter for SegmentationClient {
    async fn segment(&self, image: &DynamicImage) -> SegmentationResult<GrayImage> {
        let start = Instant::now();
        debug!(
            "Requesting segmentation for {}x{} image",
            image.width(),
            image.height()
        );

        let body = codec::png_bytes(image)?;

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("only_mask", "true")])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            info!("Segmentation service found no foreground subject");
            return Err(SegmentationError::NoForeground);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Segmentation service returned {}: {}", status, body);
            return Err(SegmentationError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let confidence = image::load_from_memory(&bytes)
            .map_err(|e| SegmentationError::InvalidResponse(e.to_string()))?
            .to_luma8();

        if confidence.dimensions() != (image.width(), image.height()) {
            return Err(SegmentationError::DimensionMismatch {
                got_width: confidence.width(),
                got_height: confidence.height(),
                want_width: image.width(),
                want_height: image.height(),
            });
        }

        debug!(
            "Segmentation completed in {:.2}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(confidence)
    }
}
