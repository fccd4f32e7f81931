use leptos::prelude::*;

use crate::auth::{context::AuthContext, RequireAuth};
use crate::components::dashboard_header::DashboardHeader;
use crate::components::generator::ThumbnailGenerator;
use crate::components::language::use_language;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let i18n = use_language();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");

    let name = move || {
        auth.current_user
            .get()
            .map(|user| user.display_name)
            .unwrap_or_default()
    };

    view! {
        <RequireAuth>
            <div class="min-h-screen bg-gray-100 dark:bg-teal-900">
                <DashboardHeader />
                <div class="container mx-auto p-6 space-y-6">
                    <div>
                        <h1 class="text-3xl font-bold text-gray-800 dark:text-gray-100">
                            {move || i18n.t("dashboard.welcome")} " " {name}
                        </h1>
                        <p class="text-gray-600 dark:text-gray-300">
                            {move || i18n.t("dashboard.createManage")}
                        </p>
                    </div>
                    <ThumbnailGenerator />
                </div>
            </div>
        </RequireAuth>
    }
}
