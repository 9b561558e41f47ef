use leptos::prelude::*;

use crate::domain::a001_supplier::ui::list::SupplierList;
use crate::domain::a002_product::ui::list::ProductList;
use crate::domain::a003_purchase_order::ui::list::OrderList;
use crate::domain::a004_stock::ui::list::StockView;
use crate::layout::global_context::{resolve_active, visible_sections, AppGlobalContext, Section};
use crate::system::auth::{use_session, RequirePermission};
use crate::system::users::ui::list::UserList;

/// Screen of `section`, built anew each time its permission gate opens
fn section_body(section: Section) -> impl Fn() -> AnyView + Copy + Send + Sync + 'static {
    move || match section {
        Section::Suppliers => view! { <SupplierList /> }.into_any(),
        Section::Products => view! { <ProductList /> }.into_any(),
        Section::Orders => view! { <OrderList /> }.into_any(),
        Section::Stock => view! { <StockView /> }.into_any(),
        Section::Users => view! { <UserList /> }.into_any(),
    }
}

fn section_view(section: Section) -> AnyView {
    view! {
        <RequirePermission any_of=vec![section.view_permission()]>
            {section_body(section)}
        </RequirePermission>
    }
    .into_any()
}

/// Shows the active section, or a notice when no section is permitted
#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let session = use_session();

    let current = Memo::new(move |_| {
        resolve_active(ctx.active.get(), &visible_sections(&session.permissions()))
    });

    move || match current.get() {
        Some(section) => section_view(section),
        None => view! {
            <div class="access-denied">
                "Aucune section accessible : contactez un administrateur pour obtenir des permissions."
            </div>
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_gate_children<F: Fn() -> AnyView + Send + Sync + 'static>(_: F) {}

    #[test]
    fn test_section_body_can_be_rebuilt_by_the_gate() {
        for section in Section::ALL {
            let body = section_body(section);
            assert_gate_children(body);
            assert_gate_children(body);
        }
    }
}
