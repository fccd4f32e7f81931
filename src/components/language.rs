use leptos::prelude::*;

use crate::i18n::{translate, Language};

const LANGUAGE_STORAGE_KEY: &str = "thumbsmith_language";

#[derive(Clone, Copy)]
pub struct LanguageContext {
    pub language: ReadSignal<Language>,
    set_language: WriteSignal<Language>,
}

impl LanguageContext {
    /// Reactive lookup; call inside a closure to follow language changes.
    pub fn t(&self, path: &str) -> String {
        translate(self.language.get(), path)
    }

    pub fn set(&self, language: Language) {
        self.set_language.set(language);
        store_language(language);
    }
}

pub fn use_language() -> LanguageContext {
    use_context::<LanguageContext>().expect("LanguageContext not found")
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn stored_language() -> Option<Language> {
    let code = local_storage()?.get_item(LANGUAGE_STORAGE_KEY).ok().flatten()?;
    Language::from_code(&code)
}

fn store_language(language: Language) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.set_item(LANGUAGE_STORAGE_KEY, language.code()) {
            log::warn!("Failed to persist language: {e:?}");
        }
    }
}

#[component]
pub fn LanguageProvider(children: Children) -> impl IntoView {
    let (language, set_language) = signal(Language::default());

    // storage only exists in the browser, so read it after hydration
    Effect::new(move |_| {
        if let Some(saved) = stored_language() {
            set_language.set(saved);
        }
    });

    provide_context(LanguageContext { language, set_language });

    view! { {children()} }
}

#[component]
pub fn LanguageSelector() -> impl IntoView {
    let i18n = use_language();

    view! {
        <label class="flex items-center space-x-2 text-sm text-gray-600 dark:text-gray-300">
            <span>{move || i18n.t("settings.language")}</span>
            <select
                class="bg-white dark:bg-teal-800 border border-gray-300 dark:border-teal-600 rounded-md px-2 py-1"
                on:change=move |ev| {
                    if let Some(language) = Language::from_code(&event_target_value(&ev)) {
                        i18n.set(language);
                    }
                }
            >
                {Language::ALL
                    .into_iter()
                    .map(|language| {
                        view! {
                            <option
                                value=language.code()
                                selected=move || i18n.language.get() == language
                            >
                                {language.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </label>
    }
}
