//! Avatar and display-name resolution.
//!
//! Both follow the same policy: an ordered list of sources, first hit wins.
//! For avatars that is the uploaded file in storage, then the picture the
//! identity provider handed us, then the bundled default.

use thiserror::Error;

pub const DEFAULT_AVATAR: &str = "/images/default-avatar.svg";
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvatarUploadError {
    #[error("Please upload an image file")]
    NotAnImage,
    #[error("File size must be less than 5MB")]
    TooLarge,
    #[error("File name is required")]
    MissingFileName,
}

pub fn validate_avatar_upload(content_type: &str, size: usize) -> Result<(), AvatarUploadError> {
    if !content_type.starts_with("image/") {
        return Err(AvatarUploadError::NotAnImage);
    }
    if size > MAX_AVATAR_BYTES {
        return Err(AvatarUploadError::TooLarge);
    }
    Ok(())
}

/// Storage path for a user's avatar: `{user_id}/{file_name}`.
pub fn avatar_object_path(user_id: &str, file_name: &str) -> Result<String, AvatarUploadError> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(AvatarUploadError::MissingFileName)?;
    Ok(format!("{user_id}/{name}"))
}

pub fn display_name(
    profile_username: Option<&str>,
    metadata_username: Option<&str>,
    email: Option<&str>,
) -> String {
    let email_local = email.and_then(|email| email.split('@').next());

    [profile_username, metadata_username, email_local]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or("User")
        .to_string()
}

#[cfg(feature = "ssr")]
pub use resolver::*;

#[cfg(feature = "ssr")]
mod resolver {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use log::{debug, error, info, warn};

    use super::DEFAULT_AVATAR;
    use crate::cache::TtlCache;
    use crate::supabase::profiles::Profile;
    use crate::supabase::storage::{AvatarAccount, AvatarStore};
    use crate::supabase::{AuthUser, SupabaseError};

    pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);
    /// Shorter than the signature so a cached URL is never already expired.
    pub const SIGNED_URL_CACHE_TTL: Duration = Duration::from_secs(3000);

    pub type AvatarUrlCache = TtlCache<String, String>;

    pub struct AvatarContext<'a> {
        pub user: &'a AuthUser,
        pub profile: Option<&'a Profile>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Lookup {
        Hit(String),
        Miss,
        /// The profile points at a file that is gone.
        Stale(String),
    }

    #[async_trait]
    pub trait AvatarSource: Send + Sync {
        fn name(&self) -> &'static str;
        async fn lookup(&self, ctx: &AvatarContext<'_>) -> Lookup;
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AvatarResolution {
        pub url: String,
        pub source: &'static str,
        pub stale_path: Option<String>,
    }

    pub struct StoredAvatar<S> {
        store: S,
        cache: Arc<AvatarUrlCache>,
    }

    impl<S: AvatarStore + 'static> StoredAvatar<S> {
        pub fn new(store: S, cache: Arc<AvatarUrlCache>) -> Self {
            StoredAvatar { store, cache }
        }
    }

    #[async_trait]
    impl<S: AvatarStore + 'static> AvatarSource for StoredAvatar<S> {
        fn name(&self) -> &'static str {
            "storage"
        }

        async fn lookup(&self, ctx: &AvatarContext<'_>) -> Lookup {
            let Some(path) = ctx.profile.and_then(|p| p.avatar_url.as_deref()).filter(|p| !p.is_empty()) else {
                return Lookup::Miss;
            };

            if let Some(url) = self.cache.get(&path.to_string()) {
                debug!("Signed avatar URL served from cache for {path}");
                return Lookup::Hit(url);
            }

            match self.store.exists(path).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!("Avatar file {path} not found in storage");
                    return Lookup::Stale(path.to_string());
                }
                Err(e) => {
                    error!("Error checking avatar {path}: {e}");
                    return Lookup::Miss;
                }
            }

            match self.store.signed_url(path, SIGNED_URL_TTL).await {
                Ok(url) => {
                    self.cache.insert_with_ttl(path.to_string(), url.clone(), SIGNED_URL_CACHE_TTL);
                    Lookup::Hit(url)
                }
                Err(e) => {
                    error!("Error getting signed URL for {path}: {e}");
                    Lookup::Miss
                }
            }
        }
    }

    /// The picture supplied by the OAuth provider, if any.
    pub struct ProviderAvatar;

    #[async_trait]
    impl AvatarSource for ProviderAvatar {
        fn name(&self) -> &'static str {
            "provider"
        }

        async fn lookup(&self, ctx: &AvatarContext<'_>) -> Lookup {
            match ctx.user.user_metadata.avatar_url.as_deref() {
                Some(url) if !url.is_empty() => Lookup::Hit(url.to_string()),
                _ => Lookup::Miss,
            }
        }
    }

    pub struct DefaultAvatar;

    #[async_trait]
    impl AvatarSource for DefaultAvatar {
        fn name(&self) -> &'static str {
            "default"
        }

        async fn lookup(&self, _ctx: &AvatarContext<'_>) -> Lookup {
            Lookup::Hit(DEFAULT_AVATAR.to_string())
        }
    }

    pub struct AvatarResolver {
        sources: Vec<Box<dyn AvatarSource>>,
    }

    impl AvatarResolver {
        pub fn new(sources: Vec<Box<dyn AvatarSource>>) -> Self {
            AvatarResolver { sources }
        }

        /// storage -> provider -> default
        pub fn standard<S: AvatarStore + 'static>(store: S, cache: Arc<AvatarUrlCache>) -> Self {
            Self::new(vec![
                Box::new(StoredAvatar::new(store, cache)) as Box<dyn AvatarSource>,
                Box::new(ProviderAvatar) as Box<dyn AvatarSource>,
                Box::new(DefaultAvatar) as Box<dyn AvatarSource>,
            ])
        }

        pub async fn resolve(&self, ctx: &AvatarContext<'_>) -> AvatarResolution {
            let mut stale_path = None;

            for source in &self.sources {
                match source.lookup(ctx).await {
                    Lookup::Hit(url) => {
                        debug!("Avatar for user {} resolved from {}", ctx.user.id, source.name());
                        return AvatarResolution { url, source: source.name(), stale_path };
                    }
                    Lookup::Stale(path) => stale_path = Some(path),
                    Lookup::Miss => {}
                }
            }

            AvatarResolution {
                url: DEFAULT_AVATAR.to_string(),
                source: "default",
                stale_path,
            }
        }
    }

    /// Clears the profile's avatar path when resolution found the file gone.
    /// Returns whether the column was cleared.
    pub async fn forget_stale_avatar<A: AvatarAccount + ?Sized>(
        account: &A,
        user_id: &str,
        resolution: &AvatarResolution,
    ) -> bool {
        let Some(stale) = resolution.stale_path.as_deref() else {
            return false;
        };

        info!("Clearing missing avatar {stale} for user {user_id}");
        match account.set_stored_path(None).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to clear avatar path for {user_id}: {e}");
                false
            }
        }
    }

    /// Stores a new avatar and points the profile at it, then drops the
    /// previous file. A failed removal leaves an orphan file and is only
    /// logged; the profile never points at a deleted file.
    pub async fn replace_avatar<A: AvatarAccount + ?Sized>(
        account: &A,
        cache: &AvatarUrlCache,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError> {
        let previous = account.stored_path().await?.filter(|old| !old.is_empty());

        account.upload(path, bytes, content_type).await?;
        account.set_stored_path(Some(path)).await?;

        cache.invalidate(&path.to_string());
        if let Some(old) = previous.as_ref() {
            cache.invalidate(old);
        }

        let signed = account.signed_url(path, SIGNED_URL_TTL).await?;
        cache.insert_with_ttl(path.to_string(), signed.clone(), SIGNED_URL_CACHE_TTL);

        if let Some(old) = previous.filter(|old| old != path) {
            if let Err(e) = account.remove(&old).await {
                warn!("Failed to remove old avatar {old}: {e}");
            }
        }

        Ok(signed)
    }
}
