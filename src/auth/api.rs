use leptos::prelude::*;

use crate::models::users::{SignUpResult, UserView};

#[server(SignIn, "/api")]
pub async fn sign_in(email: String, password: String) -> Result<(), ServerFnError> {
    use super::server::{app_state, session_cookie, set_cookie};
    use super::types::{to_server_error, AuthError};

    let email = email.trim().to_string();
    if email.is_empty() || password.is_empty() {
        return Err(to_server_error(AuthError::MissingCredentials));
    }

    let state = app_state()?;
    let session = state
        .supabase
        .sign_in_with_password(&email, &password)
        .await
        .map_err(|e| to_server_error(AuthError::Supabase(e.to_string())))?;

    set_cookie(&session_cookie(&session))?;

    if let Err(e) = state
        .supabase
        .load_or_create_profile(&session.access_token, &session.user)
        .await
    {
        log::error!("Failed to prepare profile for {}: {e}", session.user.id);
    }

    log::info!("User {} signed in", session.user.id);
    Ok(())
}

#[server(SignUp, "/api")]
pub async fn sign_up(email: String, password: String) -> Result<SignUpResult, ServerFnError> {
    use super::server::{app_state, session_cookie, set_cookie};
    use super::types::{to_server_error, AuthError};
    use crate::supabase::auth::SignUpOutcome;

    let email = email.trim().to_string();
    if email.is_empty() || password.is_empty() {
        return Err(to_server_error(AuthError::MissingCredentials));
    }

    let state = app_state()?;
    let outcome = state
        .supabase
        .sign_up(&email, &password)
        .await
        .map_err(|e| to_server_error(AuthError::Supabase(e.to_string())))?;

    match outcome {
        SignUpOutcome::Session(session) => {
            set_cookie(&session_cookie(&session))?;
            if let Err(e) = state
                .supabase
                .load_or_create_profile(&session.access_token, &session.user)
                .await
            {
                log::error!("Failed to create profile for {}: {e}", session.user.id);
            }
            log::info!("User {} signed up", session.user.id);
            Ok(SignUpResult::SignedIn)
        }
        SignUpOutcome::User(user) => {
            log::info!("User {} signed up, awaiting confirmation", user.id);
            Ok(SignUpResult::ConfirmationRequired)
        }
    }
}

#[server(SignOut, "/api")]
pub async fn sign_out() -> Result<(), ServerFnError> {
    use super::server::{access_token, app_state, expired_session_cookie, set_cookie};

    if let Some(token) = access_token().await? {
        let state = app_state()?;
        if let Err(e) = state.supabase.sign_out(&token).await {
            log::warn!("Failed to revoke session: {e}");
        }
    }

    set_cookie(&expired_session_cookie())?;
    log::info!("Signed out");
    Ok(())
}

#[server(GetCurrentUser, "/api")]
pub async fn get_current_user() -> Result<Option<UserView>, ServerFnError> {
    use super::server::current_session;

    Ok(current_session()
        .await?
        .map(|(_, user)| UserView::from(&user)))
}
