use leptos::prelude::*;

/// Badge class for a backend order status; unknown statuses stay neutral
pub fn order_status_class(status: &str) -> &'static str {
    match status {
        "EN_ATTENTE" => "badge badge--warning",
        "VALIDEE" => "badge badge--primary",
        "LIVREE" | "RECEPTIONNEE" => "badge badge--success",
        "ANNULEE" => "badge badge--error",
        _ => "badge badge--neutral",
    }
}

#[component]
pub fn Badge(#[prop(into)] class: String, children: Children) -> impl IntoView {
    view! { <span class=class>{children()}</span> }
}

/// Actif / Inactif marker of a user account
#[component]
pub fn EnabledBadge(enabled: bool) -> impl IntoView {
    let (class, text) = if enabled {
        ("badge badge--success", "Actif")
    } else {
        ("badge badge--error", "Inactif")
    };
    view! { <Badge class=class>{text}</Badge> }
}
