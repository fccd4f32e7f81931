use leptos::{prelude::*, task::spawn_local};
use std::time::Duration;

use crate::components::language::use_language;
use crate::components::style_selector::StyleSelector;
use crate::components::toast::{Toast, ToastKind};
use crate::generation::generate_image;
use crate::thumbnail::{compose_prompt, GeneratedThumbnail, OutputFormat, ThumbnailStyle};

#[component]
pub fn ThumbnailGenerator() -> impl IntoView {
    let i18n = use_language();

    let prompt = RwSignal::new(String::new());
    let trigger = RwSignal::new(String::new());
    let style = RwSignal::new(None::<ThumbnailStyle>);
    let format = RwSignal::new(OutputFormat::default());

    let (is_generating, set_is_generating) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let thumbnails = RwSignal::new(Vec::<GeneratedThumbnail>::new());

    let (toast_visible, set_toast_visible) = signal(false);
    let (toast_message, set_toast_message) = signal(String::new());
    let (toast_kind, set_toast_kind) = signal(ToastKind::Success);

    let show_toast = move |message: String, kind: ToastKind| {
        set_toast_message.set(message);
        set_toast_kind.set(kind);
        set_toast_visible.set(true);
        set_timeout(move || set_toast_visible.set(false), Duration::from_secs(3));
    };

    let on_generate = move |_| {
        if is_generating.get_untracked() {
            return;
        }

        let full_prompt = compose_prompt(
            &prompt.get_untracked(),
            style.get_untracked(),
            &trigger.get_untracked(),
            format.get_untracked(),
        );
        if full_prompt.is_empty() {
            set_error.set(Some(i18n.t("dashboard.pleaseEnterPrompt")));
            return;
        }

        set_error.set(None);
        set_is_generating.set(true);

        let typed_prompt = prompt.get_untracked().trim().to_string();
        let chosen_style = style.get_untracked();
        let keyword = Some(trigger.get_untracked().trim().to_string()).filter(|k| !k.is_empty());

        spawn_local(async move {
            match generate_image(&full_prompt).await {
                Ok(url) => {
                    thumbnails.update(|list| {
                        let id = list.iter().map(|t| t.id).max().unwrap_or(0) + 1;
                        list.insert(
                            0,
                            GeneratedThumbnail {
                                id,
                                url,
                                prompt: typed_prompt,
                                style: chosen_style,
                                trigger_keyword: keyword,
                            },
                        );
                    });
                    show_toast(i18n.t("dashboard.generated"), ToastKind::Success);
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    show_toast(e.to_string(), ToastKind::Error);
                }
            }
            set_is_generating.set(false);
        });
    };

    let field_class = "w-full px-3 py-2 border border-gray-300 dark:border-teal-600 rounded-md \
                       bg-white dark:bg-teal-700 text-gray-800 dark:text-gray-200";

    view! {
        <div class="space-y-6">
            <div class="bg-white dark:bg-teal-800 rounded-lg shadow-md p-6 space-y-5">
                <h2 class="text-xl font-semibold text-gray-800 dark:text-gray-200">
                    {move || i18n.t("dashboard.createNew")}
                </h2>

                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                        {move || i18n.t("dashboard.prompt")}
                    </label>
                    <textarea
                        class=field_class
                        rows="4"
                        placeholder=move || i18n.t("dashboard.promptPlaceholder")
                        bind:value=prompt
                    ></textarea>
                    <p class="text-xs text-gray-500 dark:text-gray-400 mt-1">
                        {move || i18n.t("dashboard.promptHelper")}
                    </p>
                </div>

                <div>
                    <h3 class="text-sm font-medium text-gray-700 dark:text-gray-300 mb-2">
                        {move || i18n.t("dashboard.chooseStyle")}
                    </h3>
                    <StyleSelector selected=style />
                </div>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <div>
                        <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                            {move || i18n.t("dashboard.triggerKeyword")}
                        </label>
                        <input
                            type="text"
                            class=field_class
                            placeholder=move || i18n.t("dashboard.keywordPlaceholder")
                            bind:value=trigger
                        />
                        <p class="text-xs text-gray-500 dark:text-gray-400 mt-1">
                            {move || i18n.t("dashboard.keywordHelper")}
                        </p>
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                            {move || i18n.t("dashboard.chooseFormat")}
                        </label>
                        <select
                            class=field_class
                            on:change=move |ev| {
                                if let Some(selected) = OutputFormat::from_key(&event_target_value(&ev)) {
                                    format.set(selected);
                                }
                            }
                        >
                            {OutputFormat::ALL
                                .into_iter()
                                .map(|option| {
                                    view! {
                                        <option value=option.key() selected=move || format.get() == option>
                                            {move || i18n.t(&option.label_key())}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                </div>

                {move || {
                    error
                        .get()
                        .map(|message| view! { <p class="text-sm text-salmon-600">{message}</p> })
                }}

                <button
                    class="w-full px-4 py-2 bg-seafoam-600 dark:bg-teal-600 text-white rounded-md hover:bg-seafoam-700 dark:hover:bg-teal-700 disabled:opacity-50"
                    disabled=move || is_generating.get()
                    on:click=on_generate
                >
                    {move || {
                        if is_generating.get() {
                            i18n.t("dashboard.generating")
                        } else {
                            i18n.t("dashboard.generateThumbnails")
                        }
                    }}
                </button>
            </div>

            <Show when=move || thumbnails.with(|list| !list.is_empty())>
                <div class="bg-white dark:bg-teal-800 rounded-lg shadow-md p-6">
                    <h2 class="text-xl font-semibold text-gray-800 dark:text-gray-200 mb-4">
                        {move || i18n.t("dashboard.yourThumbnails")}
                    </h2>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <For
                            each=move || thumbnails.get()
                            key=|thumbnail| thumbnail.id
                            children=move |thumbnail| {
                                let style_label = thumbnail
                                    .style
                                    .map(|s| i18n.t(&s.title_key()))
                                    .unwrap_or_default();
                                view! {
                                    <figure class="space-y-2">
                                        <img
                                            src=thumbnail.url.clone()
                                            alt=thumbnail.prompt.clone()
                                            class="w-full rounded-md"
                                        />
                                        <figcaption class="text-sm text-gray-600 dark:text-gray-300">
                                            {thumbnail.prompt.clone()}
                                            <span class="ml-2 text-xs text-gray-400">{style_label}</span>
                                            {thumbnail
                                                .trigger_keyword
                                                .clone()
                                                .map(|k| view! { <span class="ml-2 text-xs text-teal-500">"#" {k}</span> })}
                                        </figcaption>
                                    </figure>
                                }
                            }
                        />
                    </div>
                </div>
            </Show>

            <Toast
                message=toast_message
                visible=toast_visible
                kind=toast_kind
                on_close=move |_| set_toast_visible.set(false)
            />
        </div>
    }
}
