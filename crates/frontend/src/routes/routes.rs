use leptos::prelude::*;

use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use crate::system::auth::use_session;
use crate::system::pages::login::LoginPage;
use crate::system::pages::register::RegisterPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthScreen {
    Login,
    Register,
}

#[component]
fn MainLayout() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    ctx.init_router_integration();

    view! { <Shell /> }
}

/// Login and register pages until a session exists, then the dashboard
#[component]
pub fn AppRoutes() -> impl IntoView {
    let session = use_session();
    let screen = RwSignal::new(AuthScreen::Login);

    let auth_pages = move || match screen.get() {
        AuthScreen::Login => view! {
            <LoginPage on_register=Callback::new(move |_| screen.set(AuthScreen::Register)) />
        }
        .into_any(),
        AuthScreen::Register => view! {
            <RegisterPage on_login=Callback::new(move |_| screen.set(AuthScreen::Login)) />
        }
        .into_any(),
    };

    view! {
        <Show when=move || session.is_authenticated() fallback=auth_pages>
            <MainLayout />
        </Show>
    }
}
