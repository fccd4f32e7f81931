use leptos::prelude::*;

use crate::auth::{context::AuthContext, LogoutButton};
use crate::avatar::DEFAULT_AVATAR;
use crate::components::language::{use_language, LanguageSelector};
use crate::server_fn::get_avatar_url;

#[component]
pub fn DashboardHeader(
    /// Bumped after an upload so the header picks up the new avatar.
    #[prop(optional, into)]
    avatar_version: Option<Signal<u32>>,
) -> impl IntoView {
    let i18n = use_language();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");

    let avatar = Resource::new(
        move || avatar_version.map(|v| v.get()).unwrap_or_default(),
        |_| get_avatar_url(),
    );

    let display_name = move || {
        auth.current_user
            .get()
            .map(|user| user.display_name)
            .unwrap_or_default()
    };

    let nav_link = "text-gray-600 dark:text-gray-300 hover:text-seafoam-600 dark:hover:text-mint-400";

    view! {
        <div class="flex justify-between items-center p-4 border-b border-gray-200 dark:border-teal-700">
            <div class="flex items-center space-x-6">
                <a href="/" class="text-3xl text-seafoam-600 dark:text-mint-400 font-bold">
                    "thumbsmith"
                </a>
                <a href="/dashboard" class=nav_link>{move || i18n.t("header.dashboard")}</a>
                <a href="/dashboard/history" class=nav_link>{move || i18n.t("header.history")}</a>
                <a href="/dashboard/account" class=nav_link>{move || i18n.t("header.profile")}</a>
                <a href="/dashboard/settings" class=nav_link>{move || i18n.t("header.settings")}</a>
            </div>
            <div class="flex items-center space-x-4">
                <LanguageSelector />
                <Transition fallback=|| ()>
                    {move || {
                        let src = avatar
                            .get()
                            .and_then(Result::ok)
                            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());
                        view! { <img src=src alt="User avatar" class="w-8 h-8 rounded-full object-cover" /> }
                    }}
                </Transition>
                <span class="text-gray-700 dark:text-gray-200">{display_name}</span>
                <LogoutButton />
            </div>
        </div>
    }
}
