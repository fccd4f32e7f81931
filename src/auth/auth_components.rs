use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::auth::{context::AuthContext, SignIn, SignOut, SignUp};
use crate::components::language::use_language;
use crate::models::users::SignUpResult;

fn error_text(err: &ServerFnError) -> String {
    match err {
        ServerFnError::ServerError(message) => message.clone(),
        other => other.to_string(),
    }
}

#[component]
fn GoogleButton() -> impl IntoView {
    let i18n = use_language();

    view! {
        <a
            href="/auth/google"
            target="_self"
            rel="external"
            class="w-full flex items-center justify-center px-4 py-2
            bg-white dark:bg-teal-700 border border-gray-300 dark:border-teal-600
            rounded-md shadow-sm text-gray-700 dark:text-gray-200
            hover:bg-gray-50 dark:hover:bg-teal-600 transition-colors"
        >
            <svg class="w-5 h-5 mr-2" viewBox="0 0 24 24">
                <path
                    fill="#4285F4"
                    d="M22.56 12.25c0-.78-.07-1.53-.2-2.25H12v4.26h5.92c-.26 1.37-1.04 2.53-2.21 3.31v2.77h3.57c2.08-1.92 3.28-4.74 3.28-8.09z"
                ></path>
                <path
                    fill="#34A853"
                    d="M12 23c2.97 0 5.46-.98 7.28-2.66l-3.57-2.77c-.98.66-2.23 1.06-3.71 1.06-2.86 0-5.29-1.93-6.16-4.53H2.18v2.84C3.99 20.53 7.7 23 12 23z"
                ></path>
                <path
                    fill="#FBBC05"
                    d="M5.84 14.09c-.22-.66-.35-1.36-.35-2.09s.13-1.43.35-2.09V7.07H2.18C1.43 8.55 1 10.22 1 12s.43 3.45 1.18 4.93l2.85-2.22.81-.62z"
                ></path>
                <path
                    fill="#EA4335"
                    d="M12 5.38c1.62 0 3.06.56 4.21 1.64l3.15-3.15C17.45 2.09 14.97 1 12 1 7.7 1 3.99 3.47 2.18 7.07l3.66 2.84c.87-2.6 3.3-4.53 6.16-4.53z"
                ></path>
            </svg>
            {move || i18n.t("auth.continueWithGoogle")}
        </a>
    }
}

#[component]
fn CredentialFields(email: RwSignal<String>, password: RwSignal<String>) -> impl IntoView {
    let i18n = use_language();
    let input_class = "w-full px-3 py-2 border border-gray-300 dark:border-teal-600 rounded-md \
                       bg-white dark:bg-teal-700 text-gray-800 dark:text-gray-200";

    view! {
        <label class="block text-sm text-gray-600 dark:text-gray-300">
            {move || i18n.t("auth.email")}
            <input type="email" class=input_class bind:value=email required />
        </label>
        <label class="block text-sm text-gray-600 dark:text-gray-300">
            {move || i18n.t("auth.password")}
            <input type="password" class=input_class bind:value=password required />
        </label>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let i18n = use_language();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");
    let navigate = use_navigate();
    let query = use_query_map();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let sign_in_action = ServerAction::<SignIn>::new();

    Effect::new(move |_| {
        if let Some(Ok(())) = sign_in_action.value().get() {
            auth.refresh_auth();
            navigate("/dashboard", Default::default());
        }
    });

    let error = move || match sign_in_action.value().get() {
        Some(Err(e)) => Some(error_text(&e)),
        _ => query.with(|q| q.get("error")),
    };

    view! {
        <div class="min-h-screen bg-gray-100 dark:bg-teal-900 flex items-center justify-center">
            <div class="max-w-md w-full bg-white dark:bg-teal-800 rounded-lg shadow-md p-6 space-y-4">
                <h2 class="text-2xl font-bold text-center text-gray-800 dark:text-gray-200">
                    {move || i18n.t("auth.signIn")}
                </h2>
                <form
                    class="space-y-4"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        sign_in_action
                            .dispatch(SignIn {
                                email: email.get_untracked(),
                                password: password.get_untracked(),
                            });
                    }
                >
                    <CredentialFields email=email password=password />
                    {move || {
                        error()
                            .map(|message| {
                                view! { <p class="text-sm text-salmon-600">{message}</p> }
                            })
                    }}
                    <button
                        type="submit"
                        class="w-full px-4 py-2 bg-seafoam-600 dark:bg-teal-600 text-white rounded-md hover:bg-seafoam-700 dark:hover:bg-teal-700 disabled:opacity-50"
                        disabled=move || sign_in_action.pending().get()
                    >
                        {move || i18n.t("auth.signIn")}
                    </button>
                </form>
                <GoogleButton />
                <p class="text-sm text-center text-gray-600 dark:text-gray-400">
                    {move || i18n.t("auth.noAccount")} " "
                    <a href="/signup" class="text-seafoam-600 dark:text-aqua-400">
                        {move || i18n.t("auth.signUp")}
                    </a>
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let i18n = use_language();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let sign_up_action = ServerAction::<SignUp>::new();

    Effect::new(move |_| {
        if let Some(Ok(SignUpResult::SignedIn)) = sign_up_action.value().get() {
            auth.refresh_auth();
            navigate("/dashboard", Default::default());
        }
    });

    let status = move || match sign_up_action.value().get() {
        Some(Err(e)) => Some(view! { <p class="text-sm text-salmon-600">{error_text(&e)}</p> }.into_any()),
        Some(Ok(SignUpResult::ConfirmationRequired)) => Some(
            view! { <p class="text-sm text-teal-600 dark:text-mint-300">{i18n.t("auth.checkEmail")}</p> }
                .into_any(),
        ),
        _ => None,
    };

    view! {
        <div class="min-h-screen bg-gray-100 dark:bg-teal-900 flex items-center justify-center">
            <div class="max-w-md w-full bg-white dark:bg-teal-800 rounded-lg shadow-md p-6 space-y-4">
                <h2 class="text-2xl font-bold text-center text-gray-800 dark:text-gray-200">
                    {move || i18n.t("auth.signUp")}
                </h2>
                <form
                    class="space-y-4"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        sign_up_action
                            .dispatch(SignUp {
                                email: email.get_untracked(),
                                password: password.get_untracked(),
                            });
                    }
                >
                    <CredentialFields email=email password=password />
                    {status}
                    <button
                        type="submit"
                        class="w-full px-4 py-2 bg-seafoam-600 dark:bg-teal-600 text-white rounded-md hover:bg-seafoam-700 dark:hover:bg-teal-700 disabled:opacity-50"
                        disabled=move || sign_up_action.pending().get()
                    >
                        {move || i18n.t("auth.signUp")}
                    </button>
                </form>
                <GoogleButton />
                <p class="text-sm text-center text-gray-600 dark:text-gray-400">
                    {move || i18n.t("auth.haveAccount")} " "
                    <a href="/login" class="text-seafoam-600 dark:text-aqua-400">
                        {move || i18n.t("auth.signIn")}
                    </a>
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn LogoutButton() -> impl IntoView {
    let i18n = use_language();
    let sign_out_action = ServerAction::<SignOut>::new();
    let navigate = use_navigate();
    let auth = use_context::<AuthContext>().expect("AuthContext not found");

    Effect::new(move |_| {
        if sign_out_action.value().get().is_some() {
            auth.refresh_auth();
            navigate("/", Default::default());
        }
    });

    view! {
        <button
            on:click=move |_| {
                sign_out_action.dispatch(SignOut {});
            }
            class="px-3 py-1 text-sm bg-salmon-600 hover:bg-salmon-700 text-white rounded-md transition-colors"
        >
            {move || i18n.t("header.signOut")}
        </button>
    }
}

/// Sends signed-out visitors to the login page once the session check settles.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_context::<AuthContext>().expect("AuthContext not found");
    let navigate = use_navigate();

    Effect::new(move |_| {
        if !auth.is_loading.get() && !auth.is_authenticated() {
            navigate("/login", Default::default());
        }
    });

    view! {
        <Show
            when=move || auth.is_authenticated()
            fallback=|| view! { <div class="p-4">"Loading..."</div> }
        >
            {children()}
        </Show>
    }
}
