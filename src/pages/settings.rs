use leptos::prelude::*;

use crate::auth::RequireAuth;
use crate::components::dashboard_header::DashboardHeader;
use crate::components::delete_account::DeleteAccountDialog;
use crate::components::language::{use_language, LanguageSelector};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let i18n = use_language();
    let show_delete = RwSignal::new(false);

    let card = "bg-white dark:bg-teal-800 rounded-lg shadow-md p-6 space-y-4";
    let card_title = "text-lg font-semibold text-gray-800 dark:text-gray-200";

    view! {
        <RequireAuth>
            <div class="min-h-screen bg-gray-100 dark:bg-teal-900">
                <DashboardHeader />
                <div class="container mx-auto p-6 max-w-2xl space-y-6">
                    <h1 class="text-3xl font-bold text-gray-800 dark:text-gray-100">
                        {move || i18n.t("settings.title")}
                    </h1>

                    <div class=card>
                        <h2 class=card_title>{move || i18n.t("settings.language")}</h2>
                        <LanguageSelector />
                    </div>

                    <div class=card>
                        <h2 class=card_title>{move || i18n.t("settings.dataPrivacy")}</h2>
                        <button
                            class="px-4 py-2 text-sm font-medium text-salmon-600 border border-salmon-600 rounded-md hover:bg-salmon-600 hover:text-white"
                            on:click=move |_| show_delete.set(true)
                        >
                            {move || i18n.t("settings.deleteAccount")}
                        </button>
                        <p class="text-xs text-gray-500 dark:text-gray-400">
                            {move || i18n.t("settings.deleteAccountDesc")}
                        </p>
                    </div>
                </div>
                <DeleteAccountDialog open=show_delete />
            </div>
        </RequireAuth>
    }
}
