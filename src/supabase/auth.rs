use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{expect_success, read_json, AuthUser, Session, SupabaseClient, SupabaseError};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    /// Email confirmation is disabled, so the user is signed in right away.
    Session(Session),
    /// Email confirmation is pending.
    User(AuthUser),
}

impl SupabaseClient {
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        debug!("Signing up {email}");
        let response = self
            .request(Method::POST, "/auth/v1/signup", None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        debug!("Password sign-in for {email}");
        let response = self
            .request(Method::POST, "/auth/v1/token?grant_type=password", None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        read_json(response).await
    }

    /// Where the browser goes to start an OAuth sign-in with PKCE.
    pub fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&format!("{}/auth/v1/authorize", self.url))?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "s256")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");
        Ok(url.into())
    }

    pub async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, SupabaseError> {
        let response = self
            .request(Method::POST, "/auth/v1/token?grant_type=pkce", None)
            .json(&json!({ "auth_code": auth_code, "code_verifier": code_verifier }))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .request(Method::GET, "/auth/v1/user", Some(access_token))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthUser, SupabaseError> {
        let response = self
            .request(Method::PUT, "/auth/v1/user", Some(access_token))
            .json(&json!({ "data": metadata }))
            .send()
            .await?;
        read_json(response).await
    }

    /// Removes the auth user for good. Needs the service role key.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), SupabaseError> {
        debug!("Deleting auth user {user_id}");
        let response = self
            .admin_request(Method::DELETE, &format!("/auth/v1/admin/users/{}", urlencoding::encode(user_id)))?
            .send()
            .await?;
        expect_success(response).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .request(Method::POST, "/auth/v1/logout", Some(access_token))
            .send()
            .await?;
        expect_success(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_authorize_url() {
        let client = SupabaseClient::new(Client::new(), "https://proj.supabase.co/", "anon");

        let url = client
            .authorize_url("google", "http://localhost:3000/auth/callback?flow=abc", "challenge")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.path(), "/auth/v1/authorize");
        assert!(pairs.contains(&("provider".into(), "google".into())));
        assert!(pairs.contains(&(
            "redirect_to".into(),
            "http://localhost:3000/auth/callback?flow=abc".into()
        )));
        assert!(pairs.contains(&("code_challenge_method".into(), "s256".into())));
    }

    #[tokio::test]
    async fn test_delete_user_requires_service_role_key() {
        let client = SupabaseClient::new(Client::new(), "https://proj.supabase.co", "anon");

        let err = client.delete_user("u1").await.unwrap_err();

        assert!(matches!(err, SupabaseError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY")));
    }

    #[test]
    fn test_sign_up_outcome_variants() {
        let pending: SignUpOutcome =
            serde_json::from_str(r#"{"id":"u1","email":"ada@example.com","confirmation_sent_at":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(pending, SignUpOutcome::User(ref user) if user.id == "u1"));

        let signed_in: SignUpOutcome =
            serde_json::from_str(r#"{"access_token":"jwt","user":{"id":"u1"}}"#).unwrap();
        assert!(matches!(signed_in, SignUpOutcome::Session(ref session) if session.access_token == "jwt"));
    }
}
