use leptos::prelude::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <div class="flex flex-row left-0 pl-4 p-4 space-x-2 text-teal-400 dark-text-teal-600">
            <span>"thumbsmith"</span>
            <span>"•"</span>
            <a href="/dashboard" class="font-bold">"dashboard"</a>
            <span>"•"</span>
            <a href="/dashboard/history">"history"</a>
        </div>
    }
}
