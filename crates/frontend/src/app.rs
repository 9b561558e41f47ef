use leptos::prelude::*;

use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::system::auth::provide_session;

#[component]
pub fn App() -> impl IntoView {
    provide_session();
    provide_context(AppGlobalContext::new());

    view! { <AppRoutes /> }
}
