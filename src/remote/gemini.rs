//! Gemini (Google) client for key probes and image restyling.

use crate::error::{Result, StudioError};
use crate::image::{GeneratedImage, GenerationMetadata};
use crate::remote::client::StudioClient;
use crate::request::TransformationRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Text model used for the key probe.
pub const PROBE_MODEL: &str = "gemini-3-flash-preview";

/// Marker the service puts in the error body for a bad key.
const INVALID_KEY_MARKER: &str = "API_KEY_INVALID";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Flash Image (fast, economical).
    #[default]
    FlashImage,
    /// Gemini 3 Pro Image (highest quality).
    ProImage,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImage => "gemini-2.5-flash-image",
            Self::ProImage => "nano-banana-pro-preview",
        }
    }
}

/// Builder for GeminiClient.
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    base_url: Option<String>,
    model: GeminiModel,
    probe_model: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API base URL (proxies, test servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the image model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the model used for key probes.
    pub fn probe_model(mut self, model: impl Into<String>) -> Self {
        self.probe_model = Some(model.into());
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<GeminiClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(StudioError::InvalidRequest(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        Ok(GeminiClient {
            client: reqwest::Client::new(),
            base_url,
            model: self.model,
            probe_model: self.probe_model.unwrap_or_else(|| PROBE_MODEL.to_string()),
        })
    }
}

/// Gemini client.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: GeminiModel,
    probe_model: String,
}

impl GeminiClient {
    /// Creates a new `GeminiClientBuilder`.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    /// The image model this client restyles with.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn post(&self, api_key: &str, model: &str, body: &GeminiRequest) -> Result<GeminiResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl StudioClient for GeminiClient {
    async fn probe(&self, api_key: &str) -> Result<()> {
        self.post(api_key, &self.probe_model, &GeminiRequest::probe())
            .await
            .map(|_| ())
    }

    async fn transform(
        &self,
        api_key: &str,
        request: &TransformationRequest,
    ) -> Result<GeneratedImage> {
        let start = Instant::now();
        let body = GeminiRequest::from_transformation(request);
        let response = self.post(api_key, self.model.as_str(), &body).await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            model = self.model.as_str(),
            style = %request.style_id(),
            duration_ms,
            "Gemini transformation returned"
        );

        extract_image(
            response,
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        )
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

/// Maps a non-success response to an error.
fn parse_error(status: u16, text: &str) -> StudioError {
    if text.contains(INVALID_KEY_MARKER) {
        return StudioError::InvalidKey;
    }
    let message = serde_json::from_str::<GeminiErrorEnvelope>(text)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| text.trim().to_string());
    if status == 401 || status == 403 {
        return StudioError::Auth(message);
    }
    StudioError::Api { status, message }
}

/// Takes the first inline image in the first candidate.
fn extract_image(response: GeminiResponse, metadata: GenerationMetadata) -> Result<GeneratedImage> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        tracing::warn!(%reason, "Gemini blocked the prompt");
        return Err(StudioError::GenerationFailed(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| StudioError::GenerationFailed("no candidates in response".into()))?;

    let inline_data = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data);

    match inline_data {
        Some(inline) => GeneratedImage::from_base64_png(&inline.data, metadata),
        None => {
            let detail = match candidate.finish_reason {
                Some(reason) => format!("no image data in response (finish reason {reason})"),
                None => "no image data in response".to_string(),
            };
            Err(StudioError::GenerationFailed(detail))
        }
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn probe() -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiRequestPart::Text {
                    text: "ping".to_string(),
                }],
            }],
            generation_config: None,
        }
    }

    fn from_transformation(req: &TransformationRequest) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: req.image().mime_type().to_string(),
                    data: req.image().payload().to_string(),
                },
            },
            GeminiRequestPart::Text {
                text: req.instruction(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: Some(GeminiConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: Option<String>,
}
