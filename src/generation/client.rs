//! Browser-side wrapper around the generation proxy.
//!
//! UI components call [`generate_image`] and get either the image URL or an
//! error message that is safe to show inline.

use async_trait::async_trait;
use log::error;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{normalize_prompt, GenerateImageRequest, GENERATE_IMAGE_PATH};

const GENERIC_FAILURE: &str = "Failed to generate image";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateImageError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Server(String),
    #[error("Image URL not returned from API")]
    MissingImageUrl,
    #[error("Invalid response from image API: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait ProxyTransport {
    async fn post_json(&self, path: &str, body: String) -> Result<ProxyResponse, String>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyReply {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// `fetch` against the same origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl ProxyTransport for FetchTransport {
    async fn post_json(&self, path: &str, body: String) -> Result<ProxyResponse, String> {
        let window = web_sys::window().ok_or_else(|| "No browser window available".to_string())?;

        let headers = web_sys::Headers::new().map_err(js_error)?;
        headers.set("Content-Type", "application/json").map_err(js_error)?;

        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));

        let request = web_sys::Request::new_with_str_and_init(path, &init).map_err(js_error)?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let response: web_sys::Response = value.dyn_into().map_err(js_error)?;

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;

        Ok(ProxyResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub async fn generate_image(prompt: &str) -> Result<String, GenerateImageError> {
    generate_image_with(&FetchTransport, prompt).await
}

pub async fn generate_image_with<T: ProxyTransport>(
    transport: &T,
    prompt: &str,
) -> Result<String, GenerateImageError> {
    let result = request_image(transport, prompt).await;
    if let Err(e) = &result {
        error!("Error in generate_image: {e}");
    }
    result
}

async fn request_image<T: ProxyTransport>(
    transport: &T,
    prompt: &str,
) -> Result<String, GenerateImageError> {
    let prompt = normalize_prompt(Some(prompt))
        .ok_or_else(|| GenerateImageError::InvalidArgument("Prompt is required".to_string()))?;

    let body = serde_json::to_string(&GenerateImageRequest { prompt: Some(prompt.to_string()) })
        .map_err(|e| GenerateImageError::InvalidArgument(e.to_string()))?;

    let response = transport
        .post_json(GENERATE_IMAGE_PATH, body)
        .await
        .map_err(GenerateImageError::Network)?;

    interpret_response(&response)
}

/// The body is parsed regardless of status so server messages survive.
pub fn interpret_response(response: &ProxyResponse) -> Result<String, GenerateImageError> {
    let parsed = serde_json::from_str::<ProxyReply>(&response.body);

    if !response.is_success() {
        let message = parsed
            .ok()
            .and_then(|reply| reply.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return Err(GenerateImageError::Server(message));
    }

    let reply = parsed.map_err(|e| GenerateImageError::InvalidResponse(e.to_string()))?;
    reply
        .image_url
        .filter(|url| !url.is_empty())
        .ok_or(GenerateImageError::MissingImageUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MockProxy {
        status: u16,
        body: &'static str,
        requests: RefCell<Vec<(String, String)>>,
    }

    impl MockProxy {
        fn new(status: u16, body: &'static str) -> Self {
            MockProxy { status, body, requests: RefCell::new(Vec::new()) }
        }
    }

    #[async_trait(?Send)]
    impl ProxyTransport for MockProxy {
        async fn post_json(&self, path: &str, body: String) -> Result<ProxyResponse, String> {
            self.requests.borrow_mut().push((path.to_string(), body));
            Ok(ProxyResponse { status: self.status, body: self.body.to_string() })
        }
    }

    struct OfflineProxy;

    #[async_trait(?Send)]
    impl ProxyTransport for OfflineProxy {
        async fn post_json(&self, _path: &str, _body: String) -> Result<ProxyResponse, String> {
            Err("connection refused".to_string())
        }
    }

    #[tokio::test]
    async fn test_returns_image_url_on_success() {
        let proxy = MockProxy::new(200, r#"{"imageUrl":"https://x/y.png"}"#);

        let url = generate_image_with(&proxy, "cat").await.unwrap();

        assert_eq!(url, "https://x/y.png");
        let requests = proxy.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "/api/generate-image");
        assert_eq!(requests[0].1, r#"{"prompt":"cat"}"#);
    }

    #[tokio::test]
    async fn test_sends_trimmed_prompt() {
        let proxy = MockProxy::new(200, r#"{"imageUrl":"https://x/y.png"}"#);

        generate_image_with(&proxy, "   cat  ").await.unwrap();

        assert_eq!(proxy.requests.borrow()[0].1, r#"{"prompt":"cat"}"#);
    }

    #[tokio::test]
    async fn test_blank_prompt_fails_before_request() {
        let proxy = MockProxy::new(400, r#"{"error":"Prompt is required"}"#);

        for prompt in ["", "   "] {
            let err = generate_image_with(&proxy, prompt).await.unwrap_err();
            assert_eq!(err, GenerateImageError::InvalidArgument("Prompt is required".into()));
        }

        assert!(proxy.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_url_on_success_status() {
        let proxy = MockProxy::new(200, "{}");

        let err = generate_image_with(&proxy, "cat").await.unwrap_err();

        assert_eq!(err, GenerateImageError::MissingImageUrl);
        assert_eq!(err.to_string(), "Image URL not returned from API");
    }

    #[tokio::test]
    async fn test_server_message_is_surfaced() {
        let proxy = MockProxy::new(500, r#"{"error":"No image URL found"}"#);

        let err = generate_image_with(&proxy, "cat").await.unwrap_err();

        assert_eq!(err.to_string(), "No image URL found");
    }

    #[tokio::test]
    async fn test_generic_message_when_server_gives_none() {
        for body in ["{}", "<html>bad gateway</html>"] {
            let proxy = MockProxy::new(502, body);
            let err = generate_image_with(&proxy, "cat").await.unwrap_err();
            assert_eq!(err, GenerateImageError::Server("Failed to generate image".into()));
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let err = generate_image_with(&OfflineProxy, "cat").await.unwrap_err();
        assert_eq!(err, GenerateImageError::Network("connection refused".into()));
    }
}
