pub mod client;
#[cfg(feature = "ssr")]
pub mod completion;
#[cfg(feature = "ssr")]
pub mod handler;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{generate_image, GenerateImageError};

pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Prompt is required")]
    Validation,
    #[error("No image URL found")]
    UpstreamExtraction,
    #[error("{0}")]
    UpstreamCall(String),
}

impl GenerationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenerationError::Validation => StatusCode::BAD_REQUEST,
            GenerationError::UpstreamExtraction | GenerationError::UpstreamCall(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Trims the prompt and rejects it when nothing is left.
pub fn normalize_prompt(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|prompt| !prompt.is_empty())
}

// Upstream chat completion payload. Every level is optional so a partial
// response still deserializes and extraction decides what is missing.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Parts(Vec<ContentPart>),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<ImageReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageReference {
    #[serde(default)]
    pub url: Option<String>,
}

impl MessageContent {
    pub fn parts(&self) -> Option<&[ContentPart]> {
        match self {
            MessageContent::Parts(parts) => Some(parts),
            MessageContent::Text(_) => None,
        }
    }
}

/// first choice -> message -> content list -> first image reference -> url
pub fn extract_image_url(completion: &ChatCompletion) -> Option<&str> {
    completion
        .choices
        .first()?
        .message
        .as_ref()?
        .content
        .as_ref()?
        .parts()?
        .iter()
        .find_map(|part| {
            part.image_url
                .as_ref()?
                .url
                .as_deref()
                .filter(|url| !url.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(value: serde_json::Value) -> ChatCompletion {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_prompt() {
        assert_eq!(normalize_prompt(Some("  a cat  ")), Some("a cat"));
        assert_eq!(normalize_prompt(Some(" \t\n ")), None);
        assert_eq!(normalize_prompt(Some("")), None);
        assert_eq!(normalize_prompt(None), None);
    }

    #[test]
    fn test_extracts_first_image_reference() {
        let payload = completion(serde_json::json!({
            "choices": [{
                "message": {
                    "content": [
                        { "type": "text", "text": "here you go" },
                        { "type": "image_url", "image_url": { "url": "https://img/1.png" } },
                        { "type": "image_url", "image_url": { "url": "https://img/2.png" } }
                    ]
                }
            }]
        }));
        assert_eq!(extract_image_url(&payload), Some("https://img/1.png"));
    }

    #[test]
    fn test_empty_image_url_does_not_stop_the_search() {
        let payload = completion(serde_json::json!({
            "choices": [{
                "message": {
                    "content": [
                        { "type": "image_url", "image_url": { "url": "" } },
                        { "type": "image_url", "image_url": { "url": "https://img/2.png" } }
                    ]
                }
            }]
        }));
        assert_eq!(extract_image_url(&payload), Some("https://img/2.png"));
    }

    #[test]
    fn test_extraction_tolerates_missing_pieces() {
        let cases = [
            serde_json::json!({}),
            serde_json::json!({ "choices": [] }),
            serde_json::json!({ "choices": [{}] }),
            serde_json::json!({ "choices": [{ "message": {} }] }),
            serde_json::json!({ "choices": [{ "message": { "content": null } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": "just text" } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": [] } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": [{ "type": "text", "text": "no image" }] } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": [{ "type": "image_url", "image_url": {} }] } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": [{ "type": "image_url", "image_url": { "url": "" } }] } }] }),
        ];

        for case in cases {
            let payload = completion(case.clone());
            assert_eq!(extract_image_url(&payload), None, "payload: {case}");
        }
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(GenerationError::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GenerationError::UpstreamExtraction.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GenerationError::UpstreamCall("boom".into()).to_string(),
            "boom"
        );
    }
}
