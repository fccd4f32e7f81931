use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use dashmap::DashMap;
        use leptos::prelude::LeptosOptions;
        use std::sync::Arc;

        use crate::auth::oauth::OAuthState;
        use crate::avatar::{AvatarUrlCache, SIGNED_URL_CACHE_TTL};
        use crate::cache::TtlCache;
        use crate::config::AppConfig;
        use crate::generation::completion::{OpenAiCompletions, SharedCompletion};
        use crate::supabase::SupabaseClient;

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub config: Arc<AppConfig>,
            pub completion: SharedCompletion,
            pub supabase: SupabaseClient,
            pub avatar_cache: Arc<AvatarUrlCache>,
            pub oauth_states: Arc<DashMap<String, OAuthState>>,
        }

        impl AppState {
            pub fn new(leptos_options: LeptosOptions, config: AppConfig) -> Self {
                let http = reqwest::Client::new();
                let completion: SharedCompletion = Arc::new(OpenAiCompletions::from_config(http.clone(), &config));

                Self {
                    leptos_options,
                    supabase: SupabaseClient::from_config(http, &config),
                    config: Arc::new(config),
                    completion,
                    avatar_cache: Arc::new(TtlCache::new(SIGNED_URL_CACHE_TTL)),
                    oauth_states: Arc::new(DashMap::new()),
                }
            }
        }
    }
}
