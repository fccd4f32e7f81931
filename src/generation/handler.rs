use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};

use super::completion::{CompletionService, SharedCompletion};
use super::{
    extract_image_url, normalize_prompt, ErrorBody, GenerateImageRequest, GenerateImageResponse,
    GenerationError,
};

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// `POST /api/generate-image`
pub async fn generate_image(
    State(completion): State<SharedCompletion>,
    body: Bytes,
) -> Response {
    match generate(completion.as_ref(), &body).await {
        Ok(image_url) => Json(GenerateImageResponse { image_url }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Unparseable bodies count as a missing prompt.
pub async fn generate(
    completion: &dyn CompletionService,
    body: &[u8],
) -> Result<String, GenerationError> {
    let request: GenerateImageRequest = serde_json::from_slice(body).unwrap_or_default();
    let prompt = normalize_prompt(request.prompt.as_deref()).ok_or(GenerationError::Validation)?;

    let response = completion.complete(prompt).await.map_err(|e| {
        error!("Image generation error: {e}");
        GenerationError::UpstreamCall(e.to_string())
    })?;

    match extract_image_url(&response) {
        Some(url) => Ok(url.to_string()),
        None => {
            warn!("Completion response carried no image reference");
            Err(GenerationError::UpstreamExtraction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::completion::CompletionError;
    use crate::generation::ChatCompletion;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    enum Reply {
        Payload(serde_json::Value),
        Fail(String),
    }

    struct MockCompletion {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl MockCompletion {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(MockCompletion { reply, prompts: Mutex::new(Vec::new()) })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for MockCompletion {
        async fn complete(&self, prompt: &str) -> Result<ChatCompletion, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Reply::Payload(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                Reply::Fail(message) => Err(CompletionError::Api { status: 502, message: message.clone() }),
            }
        }
    }

    fn image_payload(url: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": {
                    "content": [{ "type": "image_url", "image_url": { "url": url } }]
                }
            }]
        })
    }

    fn app(mock: Arc<MockCompletion>) -> Router {
        let shared: SharedCompletion = mock;
        Router::new()
            .route("/api/generate-image", post(generate_image))
            .with_state(shared)
    }

    async fn call(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate-image")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_blank_prompts_are_rejected_without_upstream_call() {
        let mock = MockCompletion::new(Reply::Payload(image_payload("https://x/y.png")));

        for body in [r#"{"prompt":""}"#, r#"{"prompt":"   \n\t"}"#, r#"{}"#, r#"{"prompt":42}"#, "not json"] {
            let (status, json) = call(app(mock.clone()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json, serde_json::json!({ "error": "Prompt is required" }));
        }

        assert!(mock.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_trimmed_prompt_is_sent_upstream() {
        let mock = MockCompletion::new(Reply::Payload(image_payload("https://x/y.png")));

        let (status, json) = call(app(mock.clone()), r#"{"prompt":"  a cat on a skateboard \n"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "imageUrl": "https://x/y.png" }));
        assert_eq!(mock.prompts(), vec!["a cat on a skateboard".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_image_reference_is_server_error() {
        for payload in [
            serde_json::json!({ "choices": [{ "message": { "content": [] } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": [{ "type": "text", "text": "sorry" }] } }] }),
        ] {
            let mock = MockCompletion::new(Reply::Payload(payload));
            let (status, json) = call(app(mock), r#"{"prompt":"cat"}"#).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(json, serde_json::json!({ "error": "No image URL found" }));
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_message_is_returned() {
        let mock = MockCompletion::new(Reply::Fail("upstream exploded".into()));

        let (status, json) = call(app(mock.clone()), r#"{"prompt":"cat"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "upstream exploded" }));
        assert_eq!(mock.prompts().len(), 1);
    }
}
