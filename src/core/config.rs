use crate::core::errors::ConfigError;
use std::env;
use std::path::PathBuf;
use tracing::Level;

/// Segmentation service configuration
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    pub endpoint: String,
}

/// Translation service configuration
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Generative edit service configuration
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model_id: String,
    pub api_token: Option<String>,
    /// Quality tier passed through to the service unchanged
    pub quality: String,
    /// Guidance scale; the service accepts 1.1 to 10.0
    pub cfg_scale: f64,
    pub number_of_images: u32,
}

/// Mask building configuration
#[derive(Debug, Clone)]
pub struct MaskConfig {
    /// Binarization threshold; intensities at or above it are preserved
    pub threshold: u8,
    /// Where the intermediate mask is written for inspection. Concurrent runs
    /// sharing one artifact path race on it, so callers running in parallel
    /// should point each run at its own scratch location.
    pub artifact_path: PathBuf,
}

/// HTTP client configuration shared by all service clients
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Main application configuration
///
/// Built explicitly and passed into the clients and the pipeline at
/// construction, never read from the environment mid-run, so tests can
/// substitute fake endpoints and constants.
#[derive(Debug, Clone)]
pub struct Config {
    pub segmentation: SegmentationConfig,
    pub translation: TranslationConfig,
    pub generation: GenerationConfig,
    pub mask: MaskConfig,
    pub http: HttpConfig,
    pub log_level: Level,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_env();
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Self {
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "trace" => Some(Level::TRACE),
                "debug" => Some(Level::DEBUG),
                "info" => Some(Level::INFO),
                "warn" | "warning" => Some(Level::WARN),
                "error" => Some(Level::ERROR),
                _ => None,
            })
            .unwrap_or(Level::INFO);

        Self {
            segmentation: SegmentationConfig {
                endpoint: env::var("SEGMENTATION_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:7000/api/remove".to_string()),
            },
            translation: TranslationConfig {
                endpoint: env::var("TRANSLATION_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:7100/translate".to_string()),
                source_lang: env::var("TRANSLATION_SOURCE_LANG")
                    .unwrap_or_else(|_| "ja".to_string()),
                target_lang: env::var("TRANSLATION_TARGET_LANG")
                    .unwrap_or_else(|_| "en".to_string()),
            },
            generation: GenerationConfig {
                endpoint: env::var("GENERATION_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:7200".to_string()),
                model_id: env::var("GENERATION_MODEL_ID")
                    .unwrap_or_else(|_| "amazon.titan-image-generator-v1".to_string()),
                api_token: env::var("GENERATION_API_TOKEN")
                    .ok()
                    .filter(|s| !s.is_empty()),
                quality: env::var("GENERATION_QUALITY")
                    .unwrap_or_else(|_| "standard".to_string()),
                cfg_scale: env::var("GENERATION_CFG_SCALE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8.0),
                number_of_images: 1,
            },
            mask: MaskConfig {
                threshold: env::var("MASK_THRESHOLD")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(128),
                artifact_path: env::var("MASK_ARTIFACT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("generated_mask.png")),
            },
            http: HttpConfig {
                timeout_secs: env::var("HTTP_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            },
            log_level,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.segmentation.endpoint.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "segmentation endpoint",
            });
        }
        if self.translation.endpoint.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "translation endpoint",
            });
        }
        if self.translation.source_lang.is_empty() || self.translation.target_lang.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "translation language code",
            });
        }
        if self.generation.endpoint.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "generation endpoint",
            });
        }
        if self.generation.model_id.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "generation model id",
            });
        }
        if !(1.1..=10.0).contains(&self.generation.cfg_scale) {
            return Err(ConfigError::InvalidCfgScale(self.generation.cfg_scale));
        }
        if self.generation.number_of_images == 0 {
            return Err(ConfigError::InvalidImageCount);
        }

        Ok(())
    }
}
