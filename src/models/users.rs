use serde::{Deserialize, Serialize};

/// The signed-in user as the UI sees it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserView {
    pub id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub provider_avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProfileView {
    pub id: String,
    pub email: Option<String>,
    pub username: String,
    pub display_name: String,
    /// Ready to use as an `<img src>`.
    pub avatar_url: String,
    pub avatar_source: String,
    pub usage: PlanUsage,
}

pub const DEFAULT_PLAN: &str = "Free";
pub const DEFAULT_THUMBNAIL_LIMIT: u32 = 50;

/// Thumbnails generated against the plan allowance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlanUsage {
    pub plan: String,
    pub used: u32,
    pub limit: u32,
}

impl PlanUsage {
    /// Missing or zero limits fall back to the free allowance.
    pub fn new(plan: Option<&str>, used: Option<u32>, limit: Option<u32>) -> Self {
        PlanUsage {
            plan: plan
                .map(str::trim)
                .filter(|plan| !plan.is_empty())
                .unwrap_or(DEFAULT_PLAN)
                .to_string(),
            used: used.unwrap_or(0),
            limit: limit.filter(|limit| *limit > 0).unwrap_or(DEFAULT_THUMBNAIL_LIMIT),
        }
    }

    /// Share of the allowance used, for the progress bar. Capped at 100.
    pub fn percent(&self) -> u32 {
        let percent = u64::from(self.used) * 100 / u64::from(self.limit.max(1));
        percent.min(100) as u32
    }
}

impl Default for PlanUsage {
    fn default() -> Self {
        PlanUsage::new(None, None, None)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SignUpResult {
    SignedIn,
    ConfirmationRequired,
}

#[cfg(feature = "ssr")]
mod ssr {
    use super::UserView;
    use crate::avatar::display_name;
    use crate::supabase::AuthUser;

    impl From<&AuthUser> for UserView {
        fn from(user: &AuthUser) -> Self {
            UserView {
                id: user.id.clone(),
                email: user.email.clone(),
                display_name: display_name(
                    None,
                    user.user_metadata.username.as_deref(),
                    user.email.as_deref(),
                ),
                provider_avatar_url: user.user_metadata.avatar_url.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_uses_default_limit_when_missing() {
        let usage = PlanUsage::new(None, Some(10), None);

        assert_eq!(usage.plan, DEFAULT_PLAN);
        assert_eq!(usage.limit, 50);
        assert_eq!(usage.percent(), 20);
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(PlanUsage::default().percent(), 0);
        assert_eq!(PlanUsage::new(Some("Pro"), Some(1), Some(3)).percent(), 33);
        assert_eq!(PlanUsage::new(Some("Free"), Some(75), Some(50)).percent(), 100);
        assert_eq!(PlanUsage::new(Some(" "), Some(5), Some(0)).limit, DEFAULT_THUMBNAIL_LIMIT);
    }
}
