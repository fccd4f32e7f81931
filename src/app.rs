use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    path, StaticSegment,
};

use crate::auth::auth_components::{LoginPage, SignUpPage};
use crate::auth::context::AuthProvider;
use crate::components::language::LanguageProvider;
use crate::pages::{
    account::AccountPage, dashboard::DashboardPage, history::HistoryPage, home::HomePage, settings::SettingsPage,
};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/thumbsmith.css" />
        <Title text="Thumbsmith" />
        <LanguageProvider>
            <AuthProvider>
                <Router>
                    <main>
                        <Routes fallback=|| "Page not found.".into_view()>
                            <Route path=StaticSegment("") view=HomePage />
                            <Route path=path!("login") view=LoginPage />
                            <Route path=path!("signup") view=SignUpPage />
                            <Route path=path!("dashboard") view=DashboardPage />
                            <Route path=path!("dashboard/account") view=AccountPage />
                            <Route path=path!("dashboard/history") view=HistoryPage />
                            <Route path=path!("dashboard/settings") view=SettingsPage />
                        </Routes>
                    </main>
                </Router>
            </AuthProvider>
        </LanguageProvider>
    }
}
