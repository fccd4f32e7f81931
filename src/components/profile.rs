use base64::{engine::general_purpose::STANDARD, Engine as _};
use leptos::{prelude::*, task::spawn_local};
use wasm_bindgen_futures::JsFuture;

use crate::avatar::validate_avatar_upload;
use crate::components::language::use_language;
use crate::models::users::{PlanUsage, ProfileView};
use crate::server_fn::{get_profile, upload_avatar, UpdateUsername};

struct PickedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_picked_file(input: &web_sys::HtmlInputElement) -> Result<Option<PickedFile>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let content_type = file.type_();
    validate_avatar_upload(&content_type, file.size() as usize).map_err(|e| e.to_string())?;

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(Some(PickedFile { name: file.name(), content_type, bytes }))
}

#[component]
pub fn ProfileCard(on_avatar_changed: Callback<()>) -> impl IntoView {
    let i18n = use_language();
    let profile = Resource::new(|| (), |_| get_profile());

    view! {
        <Suspense fallback=|| view! { <div class="p-4">"Loading..."</div> }>
            {move || {
                profile
                    .get()
                    .map(|result| match result {
                        Ok(view) => {
                            view! { <ProfileDetails profile=view on_avatar_changed=on_avatar_changed /> }
                                .into_any()
                        }
                        Err(e) => {
                            view! {
                                <div class="p-4 text-salmon-600">
                                    {move || i18n.t("profile.loadFailed")} ": " {e.to_string()}
                                </div>
                            }
                                .into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

#[component]
fn ProfileDetails(profile: ProfileView, on_avatar_changed: Callback<()>) -> impl IntoView {
    let i18n = use_language();

    let avatar_url = RwSignal::new(profile.avatar_url.clone());
    let display_name = RwSignal::new(profile.display_name.clone());
    let username = RwSignal::new(profile.username.clone());
    let (editing, set_editing) = signal(false);
    let (uploading, set_uploading) = signal(false);
    let (upload_error, set_upload_error) = signal(None::<String>);

    let update_action = ServerAction::<UpdateUsername>::new();
    Effect::new(move |_| {
        if let Some(Ok(updated)) = update_action.value().get() {
            display_name.set(updated.display_name);
            username.set(updated.username);
            set_editing.set(false);
        }
    });

    let file_input = NodeRef::<leptos::html::Input>::new();

    let on_file_change = move |_| {
        let Some(input) = file_input.get() else {
            return;
        };

        set_upload_error.set(None);
        set_uploading.set(true);
        spawn_local(async move {
            let result = match read_picked_file(&input).await {
                Ok(Some(file)) => upload_avatar(file.name, file.content_type, STANDARD.encode(&file.bytes))
                    .await
                    .map(Some)
                    .map_err(|e| match e {
                        ServerFnError::ServerError(message) => message,
                        other => other.to_string(),
                    }),
                Ok(None) => Ok(None),
                Err(message) => Err(message),
            };

            match result {
                Ok(Some(url)) => {
                    avatar_url.set(url);
                    on_avatar_changed.run(());
                }
                Ok(None) => {}
                Err(message) => {
                    log::error!("Avatar upload failed: {message}");
                    set_upload_error.set(Some(message));
                }
            }
            input.set_value("");
            set_uploading.set(false);
        });
    };

    let verified_with_google = profile.avatar_source == "provider";
    let email = profile.email.clone().unwrap_or_default();
    let usage = profile.usage.clone();

    view! {
        <div class="bg-white dark:bg-teal-800 rounded-lg shadow-md p-6 space-y-6">
            <div class="flex items-center space-x-6">
                <img
                    src=move || avatar_url.get()
                    alt="User avatar"
                    class="w-24 h-24 rounded-full object-cover"
                />
                <div class="space-y-1">
                    <h2 class="text-2xl font-semibold text-gray-800 dark:text-gray-200">
                        {move || display_name.get()}
                    </h2>
                    <p class="text-gray-600 dark:text-gray-400">{email}</p>
                    {verified_with_google
                        .then(|| {
                            view! {
                                <p class="text-xs text-teal-500">
                                    {move || i18n.t("profile.verifiedWithGoogle")}
                                </p>
                            }
                        })}
                </div>
            </div>

            <div class="space-y-2">
                <label class="inline-block px-3 py-2 bg-seafoam-600 dark:bg-teal-600 text-white rounded-md cursor-pointer hover:bg-seafoam-700">
                    {move || {
                        if uploading.get() { i18n.t("profile.uploading") } else { i18n.t("profile.changeAvatar") }
                    }}
                    <input
                        type="file"
                        accept="image/*"
                        class="hidden"
                        node_ref=file_input
                        disabled=move || uploading.get()
                        on:change=on_file_change
                    />
                </label>
                <p class="text-xs text-gray-500 dark:text-gray-400">
                    {move || i18n.t("profile.supportedFormats")}
                </p>
                {move || upload_error.get().map(|message| view! { <p class="text-sm text-salmon-600">{message}</p> })}
            </div>

            <PlanUsageBlock usage=usage />

            <div class="space-y-2">
                <Show
                    when=move || editing.get()
                    fallback=move || {
                        view! {
                            <div class="flex items-center space-x-3">
                                <span class="text-gray-700 dark:text-gray-200">"@" {move || username.get()}</span>
                                <button
                                    class="text-sm text-seafoam-600 dark:text-aqua-400"
                                    on:click=move |_| set_editing.set(true)
                                >
                                    {move || i18n.t("profile.editUsername")}
                                </button>
                            </div>
                        }
                    }
                >
                    <form
                        class="flex items-center space-x-2"
                        on:submit=move |ev| {
                            ev.prevent_default();
                            update_action.dispatch(UpdateUsername { username: username.get_untracked() });
                        }
                    >
                        <input
                            type="text"
                            class="px-3 py-1 border border-gray-300 dark:border-teal-600 rounded-md bg-white dark:bg-teal-700"
                            bind:value=username
                        />
                        <button type="submit" class="px-3 py-1 bg-seafoam-600 text-white rounded-md">
                            {move || i18n.t("profile.save")}
                        </button>
                        <button
                            type="button"
                            class="px-3 py-1 text-gray-600 dark:text-gray-300"
                            on:click=move |_| set_editing.set(false)
                        >
                            {move || i18n.t("profile.cancel")}
                        </button>
                    </form>
                </Show>
                {move || {
                    match update_action.value().get() {
                        Some(Err(e)) => Some(view! { <p class="text-sm text-salmon-600">{e.to_string()}</p> }),
                        _ => None,
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn PlanUsageBlock(usage: PlanUsage) -> impl IntoView {
    let i18n = use_language();
    let percent = usage.percent();
    let counts = format!("{} / {}", usage.used, usage.limit);

    view! {
        <div class="space-y-2 border-t border-gray-200 dark:border-teal-700 pt-4">
            <div class="flex justify-between items-center">
                <h3 class="font-semibold text-gray-800 dark:text-gray-200">
                    {move || i18n.t("profile.planInformation")}
                </h3>
                <span class="px-2 py-0.5 text-xs rounded-full bg-seafoam-100 dark:bg-teal-700 text-seafoam-700 dark:text-mint-400">
                    {usage.plan}
                </span>
            </div>
            <div class="flex justify-between text-sm text-gray-600 dark:text-gray-400">
                <span>{move || i18n.t("profile.usage")}</span>
                <span>{counts} " " {move || i18n.t("profile.thumbnailsUsed")}</span>
            </div>
            <div class="w-full h-2 rounded-full bg-gray-200 dark:bg-teal-900">
                <div
                    class="h-2 rounded-full bg-seafoam-600 dark:bg-mint-400"
                    style=format!("width: {percent}%")
                ></div>
            </div>
        </div>
    }
}
