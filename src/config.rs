use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
}

/// Process configuration. Credentials stay on the server.
#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub supabase_url: String,
    pub supabase_key: String,
    /// Needed only to delete auth users; account deletion is refused without it.
    pub supabase_service_role_key: Option<String>,
    pub site_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(AppConfig {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: optional("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: optional("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            supabase_url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            supabase_key: required("SUPABASE_KEY")?,
            supabase_service_role_key: lookup("SUPABASE_SERVICE_ROLE_KEY").filter(|value| !value.trim().is_empty()),
            site_url: optional("SITE_URL", DEFAULT_SITE_URL).trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_fill_optional_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SUPABASE_URL", "https://proj.supabase.co/"),
            ("SUPABASE_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.supabase_url, "https://proj.supabase.co");
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.supabase_service_role_key, None);
    }

    #[test]
    fn test_service_role_key_is_optional() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("SUPABASE_KEY", "anon"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]))
        .unwrap();

        assert_eq!(config.supabase_service_role_key.as_deref(), Some("service"));
    }

    #[test]
    fn test_missing_api_key() {
        let result = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "  "),
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("SUPABASE_KEY", "anon"),
        ]));

        assert_eq!(result.err(), Some(ConfigError::Missing("OPENAI_API_KEY")));
    }
}
