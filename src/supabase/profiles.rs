use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{decode, AuthUser, SupabaseClient, SupabaseError};
use crate::models::users::PlanUsage;

const PROFILES: &str = "profiles";

/// A row of the `profiles` table. `avatar_url` holds a storage path
/// (`{user_id}/{file_name}`), not a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
    /// Plan columns are read here, never written.
    #[serde(default, skip_serializing)]
    pub plan: Option<String>,
    #[serde(default, skip_serializing)]
    pub thumbnails_used: Option<u32>,
    #[serde(default, skip_serializing)]
    pub thumbnails_limit: Option<u32>,
}

impl Profile {
    /// Initial profile for a user who has never opened the account page.
    pub fn for_new_user(user: &AuthUser) -> Self {
        Profile {
            id: user.id.clone(),
            username: Some(default_username(user.email.as_deref())),
            avatar_url: None,
            updated_at: None,
            plan: None,
            thumbnails_used: None,
            thumbnails_limit: None,
        }
    }

    pub fn plan_usage(&self) -> PlanUsage {
        PlanUsage::new(self.plan.as_deref(), self.thumbnails_used, self.thumbnails_limit)
    }
}

pub fn default_username(email: Option<&str>) -> String {
    email
        .and_then(|email| email.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or("user")
        .to_string()
}

impl SupabaseClient {
    async fn execute_rest(&self, builder: postgrest::Builder) -> Result<(u16, String), SupabaseError> {
        let response = builder
            .execute()
            .await
            .map_err(|e| SupabaseError::Rest(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| SupabaseError::Rest(e.to_string()))?;
        Ok((status, body))
    }

    pub async fn fetch_profile(&self, access_token: &str, user_id: &str) -> Result<Option<Profile>, SupabaseError> {
        let builder = self.rest(Some(access_token)).from(PROFILES).select("*").eq("id", user_id);
        let (status, body) = self.execute_rest(builder).await?;
        let rows: Vec<Profile> = decode(status, &body)?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_profile(&self, access_token: &str, profile: &Profile) -> Result<Profile, SupabaseError> {
        let payload = serde_json::to_string(&[profile])?;
        let builder = self.rest(Some(access_token)).from(PROFILES).insert(payload);
        let (status, body) = self.execute_rest(builder).await?;
        let rows: Vec<Profile> = if body.trim().is_empty() && (200..300).contains(&status) {
            Vec::new()
        } else {
            decode(status, &body)?
        };
        Ok(rows.into_iter().next().unwrap_or_else(|| profile.clone()))
    }

    async fn update_profile(&self, access_token: &str, user_id: &str, changes: serde_json::Value) -> Result<(), SupabaseError> {
        let builder = self
            .rest(Some(access_token))
            .from(PROFILES)
            .eq("id", user_id)
            .update(changes.to_string());
        let (status, body) = self.execute_rest(builder).await?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(SupabaseError::Api { status, message: super::error_message(status, &body) })
        }
    }

    pub async fn update_username(&self, access_token: &str, user_id: &str, username: &str) -> Result<(), SupabaseError> {
        self.update_profile(access_token, user_id, json!({ "username": username })).await
    }

    pub async fn update_avatar_path(&self, access_token: &str, user_id: &str, path: Option<&str>) -> Result<(), SupabaseError> {
        self.update_profile(access_token, user_id, json!({ "avatar_url": path })).await
    }

    pub async fn delete_profile(&self, access_token: &str, user_id: &str) -> Result<(), SupabaseError> {
        let builder = self.rest(Some(access_token)).from(PROFILES).eq("id", user_id).delete();
        let (status, body) = self.execute_rest(builder).await?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(SupabaseError::Api { status, message: super::error_message(status, &body) })
        }
    }

    /// Returns the user's profile, creating it on first visit.
    pub async fn load_or_create_profile(&self, access_token: &str, user: &AuthUser) -> Result<Profile, SupabaseError> {
        if let Some(profile) = self.fetch_profile(access_token, &user.id).await? {
            debug!("Profile found for user {}", user.id);
            return Ok(profile);
        }

        info!("No profile found, creating new profile for user {}", user.id);
        self.insert_profile(access_token, &Profile::for_new_user(user)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supabase::UserMetadata;

    #[test]
    fn test_default_username() {
        assert_eq!(default_username(Some("ada.lovelace@example.com")), "ada.lovelace");
        assert_eq!(default_username(Some("@example.com")), "user");
        assert_eq!(default_username(None), "user");
    }

    #[test]
    fn test_new_profile_row() {
        let user = AuthUser {
            id: "u1".into(),
            email: Some("grace@example.com".into()),
            user_metadata: UserMetadata::default(),
        };

        let profile = Profile::for_new_user(&user);
        let row = serde_json::to_value(&profile).unwrap();

        assert_eq!(row, json!({ "id": "u1", "username": "grace", "avatar_url": null }));
    }

    #[test]
    fn test_plan_columns_default_when_absent() {
        let profile: Profile = serde_json::from_str(r#"{"id":"u1","username":"ada"}"#).unwrap();
        let usage = profile.plan_usage();

        assert_eq!(usage.plan, "Free");
        assert_eq!(usage.used, 0);
        assert_eq!(usage.limit, 50);

        let profile: Profile =
            serde_json::from_str(r#"{"id":"u1","plan":"Pro","thumbnails_used":12,"thumbnails_limit":200}"#).unwrap();
        assert_eq!(profile.plan_usage(), PlanUsage { plan: "Pro".into(), used: 12, limit: 200 });
    }
}
