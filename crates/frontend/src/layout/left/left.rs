use leptos::prelude::*;

use crate::layout::global_context::AppGlobalContext;

#[component]
pub fn Left(children: Children) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let is_open = move || ctx.sidebar_open.get();

    view! {
        <div data-zone="left" class="left" class:left--collapsed=move || !is_open()>
            {children()}
        </div>
    }
}
