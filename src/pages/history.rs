use leptos::prelude::*;

use crate::auth::RequireAuth;
use crate::components::dashboard_header::DashboardHeader;
use crate::components::history::HistoryList;
use crate::components::language::use_language;
use crate::thumbnail::sample_history;

#[component]
pub fn HistoryPage() -> impl IntoView {
    let i18n = use_language();

    view! {
        <RequireAuth>
            <div class="min-h-screen bg-gray-100 dark:bg-teal-900">
                <DashboardHeader />
                <div class="container mx-auto p-6 space-y-6">
                    <h1 class="text-3xl font-bold text-gray-800 dark:text-gray-100">
                        {move || i18n.t("history.title")}
                    </h1>
                    <HistoryList entries=sample_history() />
                </div>
            </div>
        </RequireAuth>
    }
}
