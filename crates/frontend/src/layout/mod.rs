pub mod dashboard;
pub mod global_context;
pub mod left;

use leptos::prelude::*;

use dashboard::Dashboard;
use left::{Left, Sidebar};

/// Authenticated shell: sidebar on the left, active section in the middle
#[component]
pub fn Shell() -> impl IntoView {
    view! {
        <div class="app-layout">
            <div class="app-body">
                <Left>
                    <Sidebar />
                </Left>
                <main class="app-main">
                    <Dashboard />
                </main>
            </div>
        </div>
    }
}
