//! Session plumbing shared by the server functions: the access token lives in
//! an http-only cookie and is checked against the auth service on use.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time;
use http::{HeaderName, HeaderValue};
use leptos::prelude::*;
use log::debug;

use super::types::{to_server_error, AuthError, SESSION_COOKIE_NAME};
use crate::state::AppState;
use crate::supabase::{AuthUser, Session};

pub fn app_state() -> Result<AppState, ServerFnError> {
    use_context::<AppState>().ok_or_else(|| to_server_error(AuthError::MissingState))
}

pub fn session_cookie(session: &Session) -> Cookie<'static> {
    let max_age = session.expires_in.unwrap_or(3600);
    Cookie::build((SESSION_COOKIE_NAME, session.access_token.clone()))
        .path("/")
        .secure(true)
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(-1))
        .build()
}

/// Queues a `set-cookie` header on the server function response.
pub fn set_cookie(cookie: &Cookie<'_>) -> Result<(), ServerFnError> {
    let response_options = use_context::<leptos_axum::ResponseOptions>()
        .ok_or_else(|| to_server_error(AuthError::CookieError("response options not found".into())))?;

    let cookie_value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| to_server_error(AuthError::CookieError(e.to_string())))?;

    response_options.insert_header(HeaderName::from_static("set-cookie"), cookie_value);
    Ok(())
}

pub async fn access_token() -> Result<Option<String>, ServerFnError> {
    let jar = leptos_axum::extract::<CookieJar>()
        .await
        .map_err(|e| to_server_error(AuthError::CookieError(e.to_string())))?;

    Ok(jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty()))
}

/// The current token and the user it belongs to, or `None` when signed out
/// or the token is no longer accepted.
pub async fn current_session() -> Result<Option<(String, AuthUser)>, ServerFnError> {
    let Some(token) = access_token().await? else {
        return Ok(None);
    };

    let state = app_state()?;
    match state.supabase.get_user(&token).await {
        Ok(user) => Ok(Some((token, user))),
        Err(e) => {
            debug!("Session token rejected: {e}");
            Ok(None)
        }
    }
}

pub async fn require_session() -> Result<(String, AuthUser), ServerFnError> {
    current_session()
        .await?
        .ok_or_else(|| to_server_error(AuthError::NotSignedIn))
}
