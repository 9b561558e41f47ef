//! Section menu, signed-in user and logout

use leptos::prelude::*;

use crate::layout::global_context::{resolve_active, visible_sections, AppGlobalContext};
use crate::system::auth::use_session;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let session = use_session();

    let sections = move || visible_sections(&session.permissions());
    let current = move || resolve_active(ctx.active.get(), &sections());
    let collapsed = move || !ctx.sidebar_open.get();

    view! {
        <nav class="app-sidebar" class:app-sidebar--collapsed=collapsed>
            <div class="app-sidebar__header">
                <span class="app-sidebar__brand" class:hidden=collapsed>"Tricol"</span>
                <button
                    type="button"
                    class="app-sidebar__toggle"
                    title="Réduire / déplier"
                    on:click=move |_| ctx.toggle_sidebar()
                >
                    {move || if collapsed() { "»" } else { "«" }}
                </button>
            </div>

            <div class="app-sidebar__content">
                {move || {
                    sections()
                        .into_iter()
                        .map(|section| {
                            view! {
                                <div
                                    class="app-sidebar__item"
                                    class:app-sidebar__item--active=move || current() == Some(section)
                                    title=section.label()
                                    on:click=move |_| ctx.activate(section)
                                >
                                    <span class="app-sidebar__icon">{section.icon()}</span>
                                    <span class="app-sidebar__label" class:hidden=collapsed>
                                        {section.label()}
                                    </span>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="app-sidebar__footer">
                <span class="app-sidebar__user" class:hidden=collapsed>
                    {move || session.username().unwrap_or_default()}
                </span>
                <button
                    type="button"
                    class="app-sidebar__logout"
                    title="Déconnexion"
                    on:click=move |_| session.logout()
                >
                    "⎋"
                    <span class:hidden=collapsed>" Déconnexion"</span>
                </button>
            </div>
        </nav>
    }
}
