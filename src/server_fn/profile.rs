use cfg_if::cfg_if;
use leptos::prelude::*;

use crate::models::users::ProfileView;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use std::fmt;

        use crate::avatar::{forget_stale_avatar, AvatarContext, AvatarResolver, AvatarUploadError};
        use crate::state::AppState;
        use crate::supabase::profiles::Profile;
        use crate::supabase::storage::UserAvatarStore;
        use crate::supabase::{AuthUser, SupabaseError};

        #[derive(Debug)]
        enum ProfileError {
            Supabase(SupabaseError),
            Upload(AvatarUploadError),
            InvalidUsername,
            Decode(String),
        }

        impl fmt::Display for ProfileError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    ProfileError::Supabase(e) => write!(f, "{e}"),
                    ProfileError::Upload(e) => write!(f, "{e}"),
                    ProfileError::InvalidUsername => write!(f, "Username cannot be empty"),
                    ProfileError::Decode(e) => write!(f, "Invalid file data: {e}"),
                }
            }
        }

        impl From<ProfileError> for ServerFnError {
            fn from(error: ProfileError) -> Self {
                ServerFnError::ServerError(error.to_string())
            }
        }

        impl From<SupabaseError> for ProfileError {
            fn from(error: SupabaseError) -> Self {
                ProfileError::Supabase(error)
            }
        }

        impl From<AvatarUploadError> for ProfileError {
            fn from(error: AvatarUploadError) -> Self {
                ProfileError::Upload(error)
            }
        }

        /// The user's avatar store plus a resolver over it. Expired signed
        /// URLs are dropped from the shared cache first.
        fn avatar_resolver(state: &AppState, token: &str, user: &AuthUser) -> (UserAvatarStore, AvatarResolver) {
            let purged = state.avatar_cache.purge_expired();
            if purged > 0 {
                log::debug!("Purged {purged} expired avatar URLs");
            }

            let store = UserAvatarStore::new(state.supabase.clone(), token, user.id.clone());
            let resolver = AvatarResolver::standard(store.clone(), state.avatar_cache.clone());
            (store, resolver)
        }

        /// Resolves the avatar and builds the view, forgetting a stored path
        /// whose file has disappeared.
        async fn profile_view(
            state: &AppState,
            token: &str,
            user: &AuthUser,
            profile: Profile,
        ) -> ProfileView {
            let (store, resolver) = avatar_resolver(state, token, user);
            let resolution = resolver
                .resolve(&AvatarContext { user, profile: Some(&profile) })
                .await;
            forget_stale_avatar(&store, &user.id, &resolution).await;
            let usage = profile.plan_usage();

            ProfileView {
                id: user.id.clone(),
                email: user.email.clone(),
                display_name: crate::avatar::display_name(
                    profile.username.as_deref(),
                    user.user_metadata.username.as_deref(),
                    user.email.as_deref(),
                ),
                username: profile.username.unwrap_or_default(),
                avatar_url: resolution.url,
                avatar_source: resolution.source.to_string(),
                usage,
            }
        }
    }
}

#[server(GetProfile, "/api")]
pub async fn get_profile() -> Result<ProfileView, ServerFnError> {
    use crate::auth::server::{app_state, require_session};

    let (token, user) = require_session().await?;
    let state = app_state()?;

    let profile = state
        .supabase
        .load_or_create_profile(&token, &user)
        .await
        .map_err(ProfileError::from)?;

    Ok(profile_view(&state, &token, &user, profile).await)
}

/// Just the avatar, for the header.
#[server(GetAvatarUrl, "/api")]
pub async fn get_avatar_url() -> Result<String, ServerFnError> {
    use crate::auth::server::{app_state, require_session};

    let (token, user) = require_session().await?;
    let state = app_state()?;

    let profile = state
        .supabase
        .fetch_profile(&token, &user.id)
        .await
        .map_err(ProfileError::from)?;

    let (_, resolver) = avatar_resolver(&state, &token, &user);
    let resolution = resolver
        .resolve(&AvatarContext { user: &user, profile: profile.as_ref() })
        .await;

    Ok(resolution.url)
}

#[server(UpdateUsername, "/api")]
pub async fn update_username(username: String) -> Result<ProfileView, ServerFnError> {
    use crate::auth::server::{app_state, require_session};
    use serde_json::json;

    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(ProfileError::InvalidUsername.into());
    }

    let (token, user) = require_session().await?;
    let state = app_state()?;

    state
        .supabase
        .update_username(&token, &user.id, &username)
        .await
        .map_err(ProfileError::from)?;

    if let Err(e) = state
        .supabase
        .update_user_metadata(&token, json!({ "username": username }))
        .await
    {
        log::warn!("Username saved but metadata update failed for {}: {e}", user.id);
    }

    let profile = state
        .supabase
        .load_or_create_profile(&token, &user)
        .await
        .map_err(ProfileError::from)?;

    log::info!("User {} changed username", user.id);
    Ok(profile_view(&state, &token, &user, profile).await)
}

/// Stores a new avatar, replacing the previous file, and returns a signed URL
/// for it.
#[server(UploadAvatar, "/api")]
pub async fn upload_avatar(
    file_name: String,
    content_type: String,
    data_base64: String,
) -> Result<String, ServerFnError> {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    use crate::auth::server::{app_state, require_session};
    use crate::avatar::{avatar_object_path, replace_avatar, validate_avatar_upload};

    let bytes = STANDARD
        .decode(data_base64.as_bytes())
        .map_err(|e| ProfileError::Decode(e.to_string()))?;
    validate_avatar_upload(&content_type, bytes.len()).map_err(ProfileError::from)?;

    let (token, user) = require_session().await?;
    let state = app_state()?;
    let path = avatar_object_path(&user.id, &file_name).map_err(ProfileError::from)?;

    let store = UserAvatarStore::new(state.supabase.clone(), token, user.id.clone());
    let signed = replace_avatar(&store, &state.avatar_cache, &path, bytes, &content_type)
        .await
        .map_err(ProfileError::from)?;

    log::info!("User {} uploaded avatar {path}", user.id);
    Ok(signed)
}
