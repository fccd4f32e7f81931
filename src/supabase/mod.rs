//! Thin REST clients for the hosted Supabase project: the auth service,
//! the `profiles` table and the `avatars` storage bucket.

pub mod auth;
pub mod profiles;
pub mod storage;

use postgrest::Postgrest;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request failed: {0}")]
    Rest(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0} is not configured on this server")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

impl SupabaseClient {
    pub fn new(http: Client, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        SupabaseClient {
            http,
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_role_key: None,
        }
    }

    pub fn with_service_role_key(mut self, key: Option<String>) -> Self {
        self.service_role_key = key;
        self
    }

    pub fn from_config(http: Client, config: &AppConfig) -> Self {
        Self::new(http, config.supabase_url.clone(), config.supabase_key.clone())
            .with_service_role_key(config.supabase_service_role_key.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Row access on behalf of a user, or with the anon key when `access_token` is `None`.
    pub(crate) fn rest(&self, access_token: Option<&str>) -> Postgrest {
        let bearer = access_token.unwrap_or(&self.anon_key);
        Postgrest::new(format!("{}/rest/v1", self.url))
            .insert_header("apikey", &self.anon_key)
            .insert_header("Authorization", format!("Bearer {bearer}"))
    }

    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        self.http
            .request(method, format!("{}{path}", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Auth admin endpoints, authorised by the service role key.
    pub(crate) fn admin_request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, SupabaseError> {
        let key = self
            .service_role_key
            .as_deref()
            .ok_or(SupabaseError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY"))?;
        Ok(self
            .http
            .request(method, format!("{}{path}", self.url))
            .header("apikey", key)
            .bearer_auth(key))
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Supabase services disagree on which field carries the error text.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|e| e.msg.or(e.message).or(e.error_description).or(e.error))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Supabase request failed with status {status}"))
}

pub(crate) fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, SupabaseError> {
    if !(200..300).contains(&status) {
        return Err(SupabaseError::Api { status, message: error_message(status, body) });
    }
    Ok(serde_json::from_str(body)?)
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SupabaseError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    decode(status, &body)
}

pub(crate) async fn expect_success(response: reqwest::Response) -> Result<(), SupabaseError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(());
    }
    let body = response.text().await?;
    Err(SupabaseError::Api { status, message: error_message(status, &body) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_field_precedence() {
        assert_eq!(error_message(400, r#"{"msg":"User already registered"}"#), "User already registered");
        assert_eq!(error_message(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#), "Invalid login credentials");
        assert_eq!(error_message(404, r#"{"message":"Object not found"}"#), "Object not found");
        assert_eq!(error_message(502, "<html>"), "Supabase request failed with status 502");
    }

    #[test]
    fn test_decode_session() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {
                "id": "4b1c",
                "email": "ada@example.com",
                "user_metadata": { "avatar_url": "https://lh3.googleusercontent.com/a/pic", "full_name": "Ada" }
            }
        }"#;

        let session: Session = decode(200, body).unwrap();

        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.id, "4b1c");
        assert_eq!(
            session.user.user_metadata.avatar_url.as_deref(),
            Some("https://lh3.googleusercontent.com/a/pic")
        );
    }

    #[test]
    fn test_decode_error_status() {
        let err = decode::<Session>(400, r#"{"msg":"Invalid login credentials"}"#).unwrap_err();
        assert!(matches!(err, SupabaseError::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
