use leptos::{prelude::*, task::spawn_local};

use crate::auth::get_current_user;
use crate::models::users::UserView;

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub current_user: ReadSignal<Option<UserView>>,
    pub is_loading: ReadSignal<bool>,
    pub refresh: WriteSignal<u32>,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.with(Option::is_some)
    }

    pub fn refresh_auth(&self) {
        self.refresh.update(|v| *v = (*v + 1) % 1000);
    }
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let (current_user, set_current_user) = signal(None::<UserView>);
    let (is_loading, set_is_loading) = signal(true);
    let (refresh, set_refresh) = signal(0u32);

    let auth_context = AuthContext {
        current_user,
        is_loading,
        refresh: set_refresh,
    };

    Effect::new(move |_| {
        refresh.get();
        spawn_local(async move {
            set_is_loading.set(true);

            match get_current_user().await {
                Ok(user) => set_current_user.set(user),
                Err(e) => {
                    log::error!("Failed to load current user: {e}");
                    set_current_user.set(None);
                }
            }
            set_is_loading.set(false);
        });
    });

    provide_context(auth_context);

    view! { {children()} }
}
