use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{expect_success, read_json, SupabaseClient, SupabaseError};

pub const AVATAR_BUCKET: &str = "avatars";

#[derive(Debug, Deserialize)]
struct StorageObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Splits `user/file.png` into (`user`, `file.png`).
pub fn split_object_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((prefix, name)) => (prefix, name),
        None => ("", path),
    }
}

fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl SupabaseClient {
    pub async fn upload_object(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), SupabaseError> {
        debug!("Uploading {} bytes to {bucket}/{path}", bytes.len());
        let response = self
            .request(
                Method::POST,
                &format!("/storage/v1/object/{bucket}/{}", encode_object_path(path)),
                Some(access_token),
            )
            .header("content-type", content_type)
            .header("cache-control", "3600")
            .header("x-upsert", upsert.to_string())
            .body(bytes)
            .send()
            .await?;
        expect_success(response).await
    }

    pub async fn object_exists(&self, access_token: &str, bucket: &str, path: &str) -> Result<bool, SupabaseError> {
        let (prefix, name) = split_object_path(path);
        let response = self
            .request(Method::POST, &format!("/storage/v1/object/list/{bucket}"), Some(access_token))
            .json(&json!({ "prefix": prefix, "search": name, "limit": 100 }))
            .send()
            .await?;
        let objects: Vec<StorageObject> = read_json(response).await?;
        Ok(objects.iter().any(|object| object.name == name))
    }

    pub async fn create_signed_url(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        expires_in: Duration,
    ) -> Result<String, SupabaseError> {
        let response = self
            .request(
                Method::POST,
                &format!("/storage/v1/object/sign/{bucket}/{}", encode_object_path(path)),
                Some(access_token),
            )
            .json(&json!({ "expiresIn": expires_in.as_secs() }))
            .send()
            .await?;
        let signed: SignedUrlResponse = read_json(response).await?;
        Ok(format!("{}/storage/v1{}", self.url, signed.signed_url))
    }

    pub async fn remove_objects(&self, access_token: &str, bucket: &str, paths: &[String]) -> Result<(), SupabaseError> {
        let response = self
            .request(Method::DELETE, &format!("/storage/v1/object/{bucket}"), Some(access_token))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        expect_success(response).await
    }
}

/// The part of object storage avatar resolution depends on.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn exists(&self, path: &str) -> Result<bool, SupabaseError>;
    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<String, SupabaseError>;
}

/// A user's stored avatar: the profile column pointing at it and the file
/// itself. Upload and cleanup go through this.
#[async_trait]
pub trait AvatarAccount: AvatarStore {
    async fn stored_path(&self) -> Result<Option<String>, SupabaseError>;
    async fn set_stored_path(&self, path: Option<&str>) -> Result<(), SupabaseError>;
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), SupabaseError>;
    async fn remove(&self, path: &str) -> Result<(), SupabaseError>;
}

/// The avatars bucket and profile row as seen by one signed-in user.
#[derive(Clone)]
pub struct UserAvatarStore {
    client: SupabaseClient,
    access_token: String,
    user_id: String,
}

impl UserAvatarStore {
    pub fn new(client: SupabaseClient, access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        UserAvatarStore {
            client,
            access_token: access_token.into(),
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl AvatarStore for UserAvatarStore {
    async fn exists(&self, path: &str) -> Result<bool, SupabaseError> {
        self.client.object_exists(&self.access_token, AVATAR_BUCKET, path).await
    }

    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<String, SupabaseError> {
        self.client
            .create_signed_url(&self.access_token, AVATAR_BUCKET, path, expires_in)
            .await
    }
}

#[async_trait]
impl AvatarAccount for UserAvatarStore {
    async fn stored_path(&self) -> Result<Option<String>, SupabaseError> {
        let profile = self.client.fetch_profile(&self.access_token, &self.user_id).await?;
        Ok(profile.and_then(|profile| profile.avatar_url))
    }

    async fn set_stored_path(&self, path: Option<&str>) -> Result<(), SupabaseError> {
        self.client
            .update_avatar_path(&self.access_token, &self.user_id, path)
            .await
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), SupabaseError> {
        self.client
            .upload_object(&self.access_token, AVATAR_BUCKET, path, bytes, content_type, true)
            .await
    }

    async fn remove(&self, path: &str) -> Result<(), SupabaseError> {
        self.client
            .remove_objects(&self.access_token, AVATAR_BUCKET, &[path.to_string()])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_object_path() {
        assert_eq!(split_object_path("u1/me.png"), ("u1", "me.png"));
        assert_eq!(split_object_path("me.png"), ("", "me.png"));
    }

    #[test]
    fn test_encode_object_path_keeps_separators() {
        assert_eq!(encode_object_path("u1/my photo.png"), "u1/my%20photo.png");
    }
}
