use leptos::prelude::*;

use crate::components::language::use_language;
use crate::thumbnail::ThumbnailStyle;

/// Grid of style cards; clicking the selected card clears it.
#[component]
pub fn StyleSelector(selected: RwSignal<Option<ThumbnailStyle>>) -> impl IntoView {
    let i18n = use_language();

    view! {
        <div class="grid grid-cols-2 md:grid-cols-3 gap-3">
            {ThumbnailStyle::ALL
                .into_iter()
                .map(|style| {
                    let is_selected = move || selected.get() == Some(style);
                    view! {
                        <button
                            type="button"
                            class=move || {
                                if is_selected() {
                                    "text-left p-3 rounded-lg border-2 border-seafoam-600 dark:border-mint-400 bg-seafoam-50 dark:bg-teal-700"
                                } else {
                                    "text-left p-3 rounded-lg border border-gray-300 dark:border-teal-600 hover:border-seafoam-400"
                                }
                            }
                            on:click=move |_| {
                                selected
                                    .update(|current| {
                                        *current = if *current == Some(style) { None } else { Some(style) };
                                    })
                            }
                        >
                            <div class="font-semibold text-gray-800 dark:text-gray-200">
                                {move || i18n.t(&style.title_key())}
                            </div>
                            <div class="text-xs text-gray-500 dark:text-gray-400">
                                {move || i18n.t(&style.description_key())}
                            </div>
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
