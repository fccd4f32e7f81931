use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::auth::context::AuthContext;
use crate::components::language::use_language;
use crate::server_fn::{confirms_deletion, DeleteAccount, DELETE_CONFIRMATION};

/// Confirmation dialog for deleting the account. Nothing is sent until the
/// user types the confirmation word.
#[component]
pub fn DeleteAccountDialog(open: RwSignal<bool>) -> impl IntoView {
    let i18n = use_language();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");
    let navigate = use_navigate();

    let confirm_text = RwSignal::new(String::new());
    let (error, set_error) = signal(None::<String>);
    let delete_action = ServerAction::<DeleteAccount>::new();

    Effect::new(move |_| match delete_action.value().get() {
        Some(Ok(())) => {
            open.set(false);
            auth.refresh_auth();
            navigate("/", Default::default());
        }
        Some(Err(e)) => {
            log::error!("Error deleting account: {e}");
            set_error.set(Some(i18n.t("settings.deleteFailed")));
        }
        None => {}
    });

    let on_delete = move |_| {
        let confirmation = confirm_text.get_untracked();
        if !confirms_deletion(&confirmation) {
            set_error.set(Some(i18n.t("settings.confirmRequired")));
            return;
        }
        set_error.set(None);
        delete_action.dispatch(DeleteAccount { confirmation });
    };

    let on_cancel = move |_| {
        confirm_text.set(String::new());
        set_error.set(None);
        open.set(false);
    };

    view! {
        <Show when=move || open.get()>
            <div class="fixed inset-0 z-50 bg-black/30 flex items-center justify-center p-4">
                <div class="max-w-sm w-full rounded-lg bg-white dark:bg-teal-800 p-6 space-y-4">
                    <h2 class="text-lg font-medium text-gray-900 dark:text-gray-100">
                        {move || i18n.t("settings.deleteAccount")}
                    </h2>
                    <p class="text-sm text-gray-500 dark:text-gray-400">
                        {move || i18n.t("settings.deleteWarning")}
                    </p>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300">
                        {move || i18n.t("settings.typeDelete")}
                        <input
                            type="text"
                            class="mt-1 block w-full px-3 py-2 border border-gray-300 dark:border-teal-600 rounded-md bg-white dark:bg-teal-700"
                            placeholder=DELETE_CONFIRMATION
                            bind:value=confirm_text
                        />
                    </label>
                    {move || error.get().map(|message| view! { <p class="text-sm text-salmon-600">{message}</p> })}
                    <div class="flex justify-end gap-3">
                        <button
                            type="button"
                            class="px-4 py-2 text-sm border border-gray-300 dark:border-teal-600 rounded-md text-gray-700 dark:text-gray-200"
                            disabled=move || delete_action.pending().get()
                            on:click=on_cancel
                        >
                            {move || i18n.t("settings.cancel")}
                        </button>
                        <button
                            type="button"
                            class="px-4 py-2 text-sm bg-salmon-600 hover:bg-salmon-700 text-white rounded-md disabled:opacity-50"
                            disabled=move || delete_action.pending().get()
                            on:click=on_delete
                        >
                            {move || {
                                if delete_action.pending().get() {
                                    i18n.t("settings.deleting")
                                } else {
                                    i18n.t("settings.deleteAccount")
                                }
                            }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
