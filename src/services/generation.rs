// Generative edit service client
//
// Assembles one inpainting/outpainting request for the hosted image model and
// decodes exactly one resulting image. The prompt is translated first; a
// translation failure aborts the edit before any generative request is built,
// so an untranslated prompt can never reach the service.

use async_trait::async_trait;
use image::{DynamicImage, GrayImage};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::errors::{GenerationError, GenerationResult};
use crate::core::types::{EditRequest, EditResult, TaskType};
use crate::services::translation::Translator;
use crate::utils::codec::{self, ImageSource};

/// Capability to run one generative image edit
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn edit(
        &self,
        task_type: TaskType,
        prompt: &str,
        negative_prompt: &str,
        base_image: DynamicImage,
        mask: Option<GrayImage>,
        seed: u64,
    ) -> GenerationResult<EditResult>;
}

/// Fixed generation constants sent with every request
#[derive(Debug, Clone)]
struct GenerationParams {
    quality: String,
    cfg_scale: f64,
    number_of_images: u32,
}

/// HTTP client for the generative image service
pub struct GenerativeEditClient<T: Translator> {
    translator: T,
    endpoint: String,
    model_id: String,
    api_token: Option<String>,
    params: GenerationParams,
    http_client: reqwest::Client,
}

/// Service response: one or more base64-encoded images
#[derive(Debug, Deserialize)]
struct InvokeResponse {
    images: Vec<String>,
}

impl<T: Translator> GenerativeEditClient<T> {
    pub fn new(translator: T, config: &Config) -> GenerationResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            translator,
            endpoint: config.generation.endpoint.clone(),
            model_id: config.generation.model_id.clone(),
            api_token: config.generation.api_token.clone(),
            params: GenerationParams {
                quality: config.generation.quality.clone(),
                cfg_scale: config.generation.cfg_scale,
                number_of_images: config.generation.number_of_images,
            },
            http_client,
        })
    }

    async fn invoke(&self, body: &serde_json::Value) -> GenerationResult<InvokeResponse> {
        let url = format!("{}/model/{}/invoke", self.endpoint, self.model_id);

        let mut request = self.http_client.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<InvokeResponse>()
            .await
            .map_err(GenerationError::from)
    }
}

#[async_trait]
impl<T: Translator> ImageGenerator for GenerativeEditClient<T> {
    async fn edit(
        &self,
        task_type: TaskType,
        prompt: &str,
        negative_prompt: &str,
        base_image: DynamicImage,
        mask: Option<GrayImage>,
        seed: u64,
    ) -> GenerationResult<EditResult> {
        let start = Instant::now();

        // Translate first: a failure here must stop the edit before any
        // request to the generative service is assembled or sent.
        let translated_prompt = self.translator.translate(prompt).await?;

        info!("Invoking generative edit on model {}", self.model_id);
        info!("Prompt (original): {}", prompt);
        info!("Prompt (translated): {}", translated_prompt);
        info!("Negative prompt: {}", negative_prompt);
        info!("Seed: {}", seed);

        let request = EditRequest::new(
            task_type,
            translated_prompt,
            negative_prompt.to_string(),
            base_image,
            mask,
            seed,
        )?;

        let body = build_request_body(&request, &self.params)?;
        let response = self.invoke(&body).await?;

        debug!(
            "Generative service returned {} image(s) in {:.2}s",
            response.images.len(),
            start.elapsed().as_secs_f64()
        );

        let image = decode_first_image(&response.images)?;

        Ok(EditResult {
            image,
            seed: request.seed,
            prompt: request.prompt,
        })
    }
}

/// Build the wire request body for one edit.
///
/// The per-task parameter block carries the translated prompt, the negative
/// prompt and the base64 images; the generation config block carries the
/// fixed constants and the caller's seed unchanged.
fn build_request_body(
    request: &EditRequest,
    params: &GenerationParams,
) -> GenerationResult<serde_json::Value> {
    let image_b64 = codec::encode(ImageSource::Image(&request.base_image))?;

    let task_params = match request.task_type {
        TaskType::Inpainting | TaskType::Outpainting => {
            let mut block = json!({
                "text": request.prompt,
                "negativeText": request.negative_prompt,
                "image": image_b64,
            });
            if let Some(mask) = &request.mask {
                let mask_b64 = codec::encode(ImageSource::Image(
                    &DynamicImage::ImageLuma8(mask.clone()),
                ))?;
                block["maskImage"] = json!(mask_b64);
            }
            if request.task_type == TaskType::Outpainting {
                block["outPaintingMode"] = json!("DEFAULT");
            }
            block
        }
        TaskType::Variation => json!({
            "text": request.prompt,
            "negativeText": request.negative_prompt,
            "images": [image_b64],
        }),
    };

    let mut body = json!({
        "taskType": request.task_type.as_str(),
        "imageGenerationConfig": {
            "numberOfImages": params.number_of_images,
            "quality": params.quality,
            "cfgScale": params.cfg_scale,
            "seed": request.seed,
        },
    });
    body[request.task_type.params_key()] = task_params;

    Ok(body)
}

/// Decode the first returned image; callers must not assume any ordering
/// semantics beyond "first returned". An empty list is a hard failure.
fn decode_first_image(images: &[String]) -> GenerationResult<DynamicImage> {
    let first = images.first().ok_or(GenerationError::EmptyResponse)?;
    Ok(codec::decode(first)?)
}
