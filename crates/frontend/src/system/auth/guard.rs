use leptos::prelude::*;

use super::context::use_session;

/// Renders `children` only when the session holds one of `any_of`.
/// Otherwise shows the no-access notice.
#[component]
pub fn RequirePermission(any_of: Vec<&'static str>, children: ChildrenFn) -> impl IntoView {
    let session = use_session();

    view! {
        <Show
            when=move || session.permissions().has_any(&any_of)
            fallback=|| view! {
                <div class="access-denied">
                    "Accès refusé : vous n'avez pas la permission d'accéder à cette section."
                </div>
            }
        >
            {children()}
        </Show>
    }
}

/// Hides `children` without a notice when `permission` is missing
#[component]
pub fn IfPermitted(permission: &'static str, children: ChildrenFn) -> impl IntoView {
    let session = use_session();

    view! {
        <Show when=move || session.can(permission)>
            {children()}
        </Show>
    }
}
