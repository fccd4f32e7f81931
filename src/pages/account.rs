use leptos::prelude::*;

use crate::auth::RequireAuth;
use crate::components::dashboard_header::DashboardHeader;
use crate::components::profile::ProfileCard;

#[component]
pub fn AccountPage() -> impl IntoView {
    let (avatar_version, set_avatar_version) = signal(0u32);
    let on_avatar_changed = Callback::new(move |_: ()| {
        set_avatar_version.update(|v| *v = v.wrapping_add(1));
    });

    view! {
        <RequireAuth>
            <div class="min-h-screen bg-gray-100 dark:bg-teal-900">
                <DashboardHeader avatar_version=avatar_version />
                <div class="container mx-auto p-6 max-w-2xl">
                    <ProfileCard on_avatar_changed=on_avatar_changed />
                </div>
            </div>
        </RequireAuth>
    }
}
