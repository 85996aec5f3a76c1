/// Gemini image-edit client
///
/// Sends the original photo as inline data together with an editing
/// instruction to the `generateContent` endpoint and returns the first
/// image part of the answer.

use super::{EditFailure, ImagePipeline};
use crate::config::StudioConfig;
use crate::state::image::ImagePayload;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Gemini `generateContent` client for outfit edits
#[derive(Clone)]
pub struct GeminiPipeline {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// A content part is either text or inline binary data
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl GeminiPipeline {
    /// Build a client from the application config. A missing API key is
    /// accepted here and reported on the first edit instead.
    pub fn new(config: &StudioConfig) -> Result<Self, EditFailure> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        if !config.has_api_key() {
            warn!("⚠️  No API key configured; outfit generation will fail until one is set");
        }

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

impl std::fmt::Debug for GeminiPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiPipeline")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[async_trait]
impl ImagePipeline for GeminiPipeline {
    async fn edit(&self, original: &ImagePayload, prompt: &str) -> Result<ImagePayload, EditFailure> {
        let api_key = self.api_key.as_deref().ok_or(EditFailure::MissingApiKey)?;

        let url = self.endpoint();
        debug!(
            "Sending edit request to {} ({} bytes, {})",
            url,
            original.len(),
            original.mime()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&build_request(original, prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!("Image service responded with {}", status);

        if !status.is_success() {
            error!("Image service error: {} - {}", status, body);
            return Err(service_failure(status.as_u16(), &body));
        }

        let image = parse_response(&body)?;
        info!("🎨 Received edited image ({} bytes, {})", image.len(), image.mime());
        Ok(image)
    }
}

/// Instruction sent alongside the photo
fn build_instruction(prompt: &str) -> String {
    format!(
        "Edit this photo: change the clothing of the person to the following outfit: {}. \
         Keep the person's face, hair, body shape, pose and the background exactly as they are. \
         Return only the edited image.",
        prompt.trim()
    )
}

fn build_request(original: &ImagePayload, prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: original.mime().to_string(),
                        data: original.to_base64(),
                    }),
                    ..Part::default()
                },
                Part {
                    text: Some(build_instruction(prompt)),
                    ..Part::default()
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE", "TEXT"],
        },
    }
}

/// Turn a non-success answer into a failure, preferring the service's own
/// error message over the raw body
fn service_failure(status: u16, body: &str) -> EditFailure {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    EditFailure::Service { status, message }
}

/// Extract the first inline image from a successful answer
fn parse_response(body: &str) -> Result<ImagePayload, EditFailure> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| EditFailure::InvalidResponse(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Err(EditFailure::Blocked(reason));
    }

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| {
            if let Some(reason) = &candidate.finish_reason {
                debug!("Candidate finished with {}", reason);
            }
            candidate.content
        })
        .map(|content| content.parts)
        .unwrap_or_default();

    let mut text = Vec::new();
    for part in parts {
        if let Some(inline) = part.inline_data {
            return ImagePayload::from_base64(inline.mime_type, &inline.data)
                .map_err(|e| EditFailure::InvalidResponse(e.to_string()));
        }
        if let Some(t) = part.text {
            text.push(t);
        }
    }

    Err(EditFailure::NoImage(text.join(" ").trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DEFAULT_FAILURE_MESSAGE;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    fn photo() -> ImagePayload {
        ImagePayload::new("image/png", b"cat.png".to_vec())
    }

    #[test]
    fn test_request_carries_image_and_prompt() {
        let request = build_request(&photo(), "  Steampunk Gear ");
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], BASE64.encode(b"cat.png"));
        assert!(parts[0].get("text").is_none());
        assert!(parts[1]["text"].as_str().unwrap().contains("outfit: Steampunk Gear."));
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_parse_inline_image() {
        let body = format!(
            r#"{{
                "candidates": [{{
                    "content": {{
                        "role": "model",
                        "parts": [
                            {{ "text": "Here is your outfit." }},
                            {{ "inlineData": {{ "mimeType": "image/png", "data": "{}" }} }}
                        ]
                    }},
                    "finishReason": "STOP"
                }}]
            }}"#,
            BASE64.encode(b"cat_steampunk.png")
        );

        let image = parse_response(&body).unwrap();
        assert_eq!(image, ImagePayload::new("image/png", b"cat_steampunk.png".to_vec()));
    }

    #[test]
    fn test_corrupt_image_data_is_invalid_response() {
        let body = r#"{
            "candidates": [{
                "content": { "parts": [ { "inlineData": { "mimeType": "image/png", "data": "@@@" } } ] }
            }]
        }"#;

        assert!(matches!(
            parse_response(body),
            Err(EditFailure::InvalidResponse(message)) if message.starts_with("Invalid base64 image data")
        ));
    }

    #[test]
    fn test_text_only_answer_is_no_image() {
        let body = r#"{
            "candidates": [{
                "content": { "parts": [ { "text": "I cannot edit this image." } ] }
            }]
        }"#;

        match parse_response(body) {
            Err(EditFailure::NoImage(text)) => assert_eq!(text, "I cannot edit this image."),
            other => panic!("expected NoImage, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_answer_falls_back_to_default_message() {
        let failure = parse_response(r#"{ "candidates": [] }"#).unwrap_err();
        assert_eq!(failure.user_message(), DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_blocked_prompt() {
        let body = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
        assert!(matches!(
            parse_response(body),
            Err(EditFailure::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_garbage_is_invalid_response() {
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(EditFailure::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_service_failure_uses_error_message() {
        let body = r#"{ "error": { "code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED" } }"#;
        let failure = service_failure(429, body);
        assert_eq!(failure.user_message(), "quota exceeded");

        let failure = service_failure(502, "Bad Gateway\n");
        assert_eq!(failure.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_endpoint() {
        let config = StudioConfig {
            base_url: "http://localhost:9000/v1beta/models/".to_string(),
            model: "test-model".to_string(),
            ..StudioConfig::default()
        };
        let pipeline = GeminiPipeline::new(&config).unwrap();
        assert_eq!(
            pipeline.endpoint(),
            "http://localhost:9000/v1beta/models/test-model:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let pipeline = GeminiPipeline::new(&StudioConfig::default()).unwrap();
        let result = pipeline.edit(&photo(), "Classic Tuxedo").await;
        assert!(matches!(result, Err(EditFailure::MissingApiKey)));
    }
}
