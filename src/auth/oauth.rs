//! Google sign-in through the auth service's PKCE flow.
//!
//! `/auth/google` stores a verifier under a random flow id and sends the
//! browser to the provider; `/auth/callback?flow=..&code=..` trades the code
//! for a session and drops the access token into the session cookie.

use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use dashmap::DashMap;
use log::{debug, error, info};
use rand::{thread_rng, Rng};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::server::session_cookie;
use crate::state::AppState;

/// How long a started sign-in may take before its verifier is dropped.
const FLOW_TTL: Duration = Duration::from_secs(600);

#[derive(Clone, Debug)]
pub struct OAuthState {
    pub verifier: String,
    pub started_at: Instant,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub flow: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    Unknown,
    Expired,
}

/// Drops sign-in flows that were never completed.
pub fn prune_flows(states: &DashMap<String, OAuthState>, now: Instant) {
    states.retain(|_, flow| now.saturating_duration_since(flow.started_at) < FLOW_TTL);
}

/// Claims a flow's verifier. Each flow can be claimed once, and only within
/// `FLOW_TTL` of starting.
pub fn take_flow(states: &DashMap<String, OAuthState>, flow: &str, now: Instant) -> Result<String, FlowError> {
    let (_, state) = states.remove(flow).ok_or(FlowError::Unknown)?;
    if now.saturating_duration_since(state.started_at) >= FLOW_TTL {
        return Err(FlowError::Expired);
    }
    Ok(state.verifier)
}

pub fn generate_pkce() -> (String, String) {
    let mut verifier_bytes = [0u8; 32];
    thread_rng().fill(&mut verifier_bytes);

    let code_verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);
    let code_challenge = pkce_challenge(&code_verifier);
    (code_verifier, code_challenge)
}

pub fn pkce_challenge(code_verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code_verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

pub fn callback_url(site_url: &str, flow: &str) -> String {
    format!("{site_url}/auth/callback?flow={}", urlencoding::encode(flow))
}

fn login_error(message: &str) -> Response {
    Redirect::to(&format!("/login?error={}", urlencoding::encode(message))).into_response()
}

pub async fn google_login(State(state): State<AppState>) -> Response {
    prune_flows(&state.oauth_states, Instant::now());

    let flow = uuid::Uuid::new_v4().to_string();
    let (code_verifier, code_challenge) = generate_pkce();

    let redirect_to = callback_url(&state.config.site_url, &flow);
    let auth_url = match state.supabase.authorize_url("google", &redirect_to, &code_challenge) {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to build authorize url: {e}");
            return login_error("Google sign-in is unavailable");
        }
    };

    state.oauth_states.insert(
        flow.clone(),
        OAuthState { verifier: code_verifier, started_at: Instant::now() },
    );
    debug!("Started Google sign-in flow {flow}");

    Redirect::to(&auth_url).into_response()
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> Response {
    if let Some(description) = params.error_description.as_deref() {
        error!("Provider returned an error: {description}");
        return login_error(description);
    }

    let (Some(code), Some(flow)) = (params.code.as_deref(), params.flow.as_deref()) else {
        return login_error("Missing authorization code");
    };

    let verifier = match take_flow(&state.oauth_states, flow, Instant::now()) {
        Ok(verifier) => verifier,
        Err(e) => {
            error!("Rejected OAuth callback for flow {flow}: {e:?}");
            return login_error("Sign-in expired, please try again");
        }
    };

    let session = match state
        .supabase
        .exchange_code_for_session(code, &verifier)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            error!("Code exchange failed: {e}");
            return login_error(&e.to_string());
        }
    };

    if let Err(e) = state
        .supabase
        .load_or_create_profile(&session.access_token, &session.user)
        .await
    {
        // the dashboard retries this on first load
        error!("Failed to prepare profile for {}: {e}", session.user.id);
    }

    info!("User {} signed in with Google", session.user.id);

    let mut headers = HeaderMap::new();
    match session_cookie(&session).to_string().parse() {
        Ok(value) => {
            headers.insert(header::SET_COOKIE, value);
        }
        Err(e) => {
            error!("Failed to encode session cookie: {e}");
            return login_error("Sign-in failed");
        }
    }

    (headers, Redirect::to("/dashboard")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkce_pair() {
        let (verifier, challenge) = generate_pkce();
        assert_eq!(verifier.len(), 43);
        assert_eq!(challenge, pkce_challenge(&verifier));
        assert!(!challenge.contains('='));
    }

    #[test]
    fn test_known_challenge() {
        // RFC 7636 appendix B
        assert_eq!(
            pkce_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    fn flows(age: Duration) -> (DashMap<String, OAuthState>, Instant) {
        let started_at = Instant::now();
        let states = DashMap::new();
        states.insert(
            "flow-1".to_string(),
            OAuthState { verifier: "verifier-1".into(), started_at },
        );
        (states, started_at + age)
    }

    #[test]
    fn test_take_flow_once() {
        let (states, now) = flows(Duration::from_secs(30));

        assert_eq!(take_flow(&states, "flow-1", now), Ok("verifier-1".to_string()));
        assert_eq!(take_flow(&states, "flow-1", now), Err(FlowError::Unknown));
    }

    #[test]
    fn test_unknown_flow_is_rejected() {
        let (states, now) = flows(Duration::ZERO);

        assert_eq!(take_flow(&states, "someone-else", now), Err(FlowError::Unknown));
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn test_expired_flow_is_rejected_and_dropped() {
        let (states, now) = flows(FLOW_TTL);

        assert_eq!(take_flow(&states, "flow-1", now), Err(FlowError::Expired));
        assert!(states.is_empty());
    }

    #[test]
    fn test_prune_keeps_recent_flows() {
        let (states, started) = flows(Duration::ZERO);
        states.insert(
            "flow-2".to_string(),
            OAuthState { verifier: "verifier-2".into(), started_at: started + FLOW_TTL },
        );

        prune_flows(&states, started + FLOW_TTL);

        assert!(!states.contains_key("flow-1"));
        assert!(states.contains_key("flow-2"));
    }

    #[test]
    fn test_callback_url() {
        assert_eq!(
            callback_url("https://thumbs.example", "a b"),
            "https://thumbs.example/auth/callback?flow=a%20b"
        );
    }
}
