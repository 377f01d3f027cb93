//! Image generation client.
//!
//! One composed prompt goes out, one image comes back inline, or the whole
//! operation fails. Exactly one network attempt, no retry, no partial result;
//! the caller decides what (if anything) gets persisted.

use anyhow::Context as _;
use base64::Engine as _;

use crate::catalog;
use crate::error::{ThumbforgeError, ThumbforgeResult};
use crate::model::Category;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// What to generate.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub title: String,
    pub category: Category,
    pub style_id: String,
    pub user_prompt: Option<String>,
}

/// A decoded generated image.
#[derive(Clone, Debug)]
pub struct GeneratedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// The inline image reference stored on records.
    pub fn to_data_uri(&self) -> String {
        crate::assets::to_data_uri(&self.mime, &self.bytes)
    }
}

pub trait ImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> ThumbforgeResult<GeneratedImage>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> ThumbforgeResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl ImageGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> ThumbforgeResult<GeneratedImage> {
        let style = catalog::style_by_id(&request.style_id)?;
        let prompt = catalog::compose_prompt(
            &request.title,
            request.category,
            style,
            request.user_prompt.as_deref(),
        );

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        tracing::debug!(model = %self.model, "sending generation request");

        let body = GenerateContentRequest {
            contents: vec![ContentIn {
                parts: vec![PartIn { text: prompt }],
            }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: "16:9".to_string(),
                },
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ThumbforgeError::generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            let detail = detail.chars().take(300).collect::<String>();
            return Err(ThumbforgeError::generation(format!(
                "generation endpoint returned {status}: {detail}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| ThumbforgeError::generation(format!("unparseable response: {e}")))?;
        first_inline_image(&parsed)
    }
}

/// Extract the first inline image part of a generation response.
fn first_inline_image(response: &GenerateContentResponse) -> ThumbforgeResult<GeneratedImage> {
    let inline = response
        .candidates
        .iter()
        .flat_map(|c| c.content.parts.iter())
        .find_map(|p| p.inline_data.as_ref())
        .ok_or_else(|| ThumbforgeError::generation("no image data returned"))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(inline.data.trim())
        .map_err(|e| ThumbforgeError::generation(format!("image payload not base64: {e}")))?;

    Ok(GeneratedImage {
        mime: inline.mime_type.clone(),
        bytes,
    })
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<ContentIn>,
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct ContentIn {
    parts: Vec<PartIn>,
}

#[derive(serde::Serialize)]
struct PartIn {
    text: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    image_config: ImageConfig,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(serde::Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: ContentOut,
}

#[derive(serde::Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartOut {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}
