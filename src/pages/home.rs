use leptos::prelude::*;

use crate::auth::context::AuthContext;
use crate::components::footer::Footer;
use crate::components::language::{use_language, LanguageSelector};

#[component]
pub fn HomePage() -> impl IntoView {
    let i18n = use_language();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");

    let cta_href = move || if auth.is_authenticated() { "/dashboard" } else { "/signup" };

    view! {
        <div class="w-full min-h-screen mx-auto bg-gray-100 dark:bg-teal-900 flex flex-col">
            <div class="flex justify-between items-center p-4">
                <a href="/" class="text-3xl text-seafoam-600 dark:text-mint-400 font-bold">
                    "thumbsmith"
                </a>
                <div class="flex items-center space-x-4">
                    <LanguageSelector />
                    <Show when=move || !auth.is_authenticated()>
                        <a href="/login" class="text-gray-700 dark:text-gray-200">
                            {move || i18n.t("auth.signIn")}
                        </a>
                    </Show>
                </div>
            </div>
            <div class="flex-grow container mx-auto px-4 py-24 text-center space-y-6">
                <h1 class="text-5xl font-bold text-gray-800 dark:text-gray-100">
                    {move || i18n.t("home.headline")}
                </h1>
                <p class="text-xl text-gray-600 dark:text-gray-300">
                    {move || i18n.t("home.subheadline")}
                </p>
                <a
                    href=cta_href
                    class="inline-block bg-teal-500 hover:bg-teal-600 text-white font-bold py-3 px-6 rounded transition-colors"
                >
                    {move || i18n.t("home.getStarted")}
                </a>
            </div>
            <Footer />
        </div>
    }
}
