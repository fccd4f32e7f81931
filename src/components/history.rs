use leptos::prelude::*;

use crate::components::language::use_language;
use crate::thumbnail::HistoryEntry;

#[component]
pub fn HistoryList(entries: Vec<HistoryEntry>) -> impl IntoView {
    let i18n = use_language();

    if entries.is_empty() {
        return view! {
            <p class="p-6 text-center text-gray-500 dark:text-gray-400">
                {move || i18n.t("history.empty")}
            </p>
        }
        .into_any();
    }

    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
            {entries
                .into_iter()
                .map(|entry| {
                    let style_key = entry.style.title_key();
                    view! {
                        <div class="bg-white dark:bg-teal-800 rounded-lg shadow-md overflow-hidden">
                            <img src=entry.image_url alt=entry.prompt.clone() class="w-full aspect-video object-cover" />
                            <div class="p-4 space-y-1">
                                <p class="text-gray-800 dark:text-gray-200">{entry.prompt}</p>
                                <div class="flex justify-between text-xs text-gray-500 dark:text-gray-400">
                                    <span>{move || i18n.t(&style_key)}</span>
                                    <span>{entry.created_on.format("%b %-d, %Y").to_string()}</span>
                                </div>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
    .into_any()
}
