use contracts::domain::a002_product::aggregate::{Product, ProductDto};
use contracts::domain::common::RowId;
use contracts::system::permissions::names;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::details::ProductDetails;
use crate::domain::a002_product::api::ProductResource;
use crate::shared::components::ui::{Badge, Button, ButtonVariant};
use crate::shared::components::{CellValue, ColumnKind, DataTable, TableAction, TableColumn};
use crate::shared::crud::{signals, CrudController, CrudState, ScreenMessages};
use crate::shared::dialogs::BrowserDialogs;
use crate::system::auth::{use_session, PermissionEvaluator};

pub type ProductController =
    CrudController<ProductResource, ProductDto, RwSignal<CrudState<Product, ProductDto>>, BrowserDialogs>;

pub static MESSAGES: ScreenMessages = ScreenMessages {
    entity: "produit",
    load_failed: "Erreur lors du chargement des produits",
    save_failed: "Erreur lors de l'enregistrement du produit",
    delete_confirm: "Êtes-vous sûr de vouloir supprimer ce produit ?",
    delete_failed: "Erreur lors de la suppression du produit",
    created: Some("Produit ajouté avec succès"),
    updated: Some("Produit modifié avec succès"),
    deleted: None,
};

const EDIT: TableAction = TableAction::new("edit", "Modifier").icon("✏️").class("btn-edit");
const DELETE: TableAction = TableAction::new("delete", "Supprimer").icon("🗑️").class("btn-delete");

/// `12.5` → `12.50 DH`
pub fn format_price(value: Option<&CellValue>) -> String {
    match value.and_then(CellValue::as_f64) {
        Some(price) => format!("{:.2} DH", price),
        None => "-".to_string(),
    }
}

pub fn columns() -> Vec<TableColumn<Product>> {
    vec![
        TableColumn::new("id", "ID", |p: &Product| Some(CellValue::from(p.id))).kind(ColumnKind::Number),
        TableColumn::new("nom", "Nom", |p: &Product| CellValue::non_empty(&p.nom)),
        TableColumn::new("reference", "Référence", |p: &Product| CellValue::non_empty(&p.reference)),
        TableColumn::new("categorie", "Catégorie", |p: &Product| {
            p.categorie.as_deref().and_then(CellValue::non_empty)
        }),
        TableColumn::new("prixUnitaire", "Prix unitaire", |p: &Product| p.prix_unitaire.map(CellValue::from))
            .kind(ColumnKind::Number)
            .format(format_price),
        TableColumn::new("stockActuel", "Stock actuel", |p: &Product| p.stock_actuel.map(CellValue::from))
            .kind(ColumnKind::Number),
    ]
}

pub fn row_actions(permissions: &PermissionEvaluator) -> Vec<TableAction> {
    [(names::EDIT_PRODUCT, EDIT), (names::DELETE_PRODUCT, DELETE)]
        .into_iter()
        .filter(|(permission, _)| permissions.has_permission(permission))
        .map(|(_, action)| action)
        .collect()
}

#[component]
pub fn ProductList() -> impl IntoView {
    let session = use_session();
    let state = RwSignal::new(CrudState::<Product, ProductDto>::default());
    let ctl: ProductController = CrudController::new(ProductResource, state, BrowserDialogs, &MESSAGES);

    let load = move || {
        spawn_local(async move {
            ctl.refresh().await;
        });
    };

    Effect::new(move |_| {
        if state.with_untracked(|s| s.list.is_idle()) {
            load();
        }
    });

    let on_action = Callback::new(move |(name, id): (&'static str, RowId)| match name {
        "edit" => {
            ctl.open_edit(id);
        }
        "delete" => spawn_local(async move {
            ctl.delete(id).await;
        }),
        other => log::debug!("product action {} ignored", other),
    });

    let loading = signals::loading(state);

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Produits"</h1>
                    <Badge class="badge badge--neutral">
                        {move || state.with(|s| s.list.rows.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || session.can(names::CREATE_PRODUCT)>
                        <Button on_click=Callback::new(move |_| ctl.open_create())>
                            "+ Nouveau produit"
                        </Button>
                    </Show>
                    <Button
                        variant=ButtonVariant::Secondary
                        disabled=loading
                        on_click=Callback::new(move |_| load())
                    >
                        "Actualiser"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <DataTable
                    columns=columns()
                    rows=signals::rows(state)
                    actions=Signal::derive(move || row_actions(&session.permissions()))
                    loading=loading
                    empty_message="Aucun produit"
                    on_action=on_action
                />
            </div>

            <Show when=move || state.with(|s| s.form.is_some())>
                <ProductDetails ctl=ctl />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::components::data_table::resolve_cell;
    use crate::shared::crud::testing::FakeResource;
    use crate::shared::dialogs::testing::RecordingDialogs;
    use crate::shared::state::StateCell;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn product(id: RowId, nom: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "reference": format!("TX-{:02}", id),
            "nom": nom,
            "prixUnitaire": 12.5
        }))
        .unwrap()
    }

    #[test]
    fn test_delete_without_confirmation_sends_nothing() {
        let fake = FakeResource::<Product, ProductDto>::new();
        let dialogs = Rc::new(RecordingDialogs::refusing());
        let cell: Rc<RefCell<CrudState<Product, ProductDto>>> =
            Rc::new(RefCell::new(CrudState::default()));
        let ctl = CrudController::new(fake.clone(), cell, dialogs.clone(), &MESSAGES);

        fake.queue_list(Ok(vec![product(1, "Coton"), product(2, "Lin")]));
        block_on(ctl.refresh());
        let before = ctl.state().read(|s| s.list.rows.clone());

        assert!(!block_on(ctl.delete(2)));
        assert!(fake.deletes.borrow().is_empty());
        assert_eq!(fake.list_calls.get(), 1);
        assert_eq!(ctl.state().read(|s| s.list.rows.clone()), before);
        assert_eq!(
            *dialogs.confirms.borrow(),
            vec!["Êtes-vous sûr de vouloir supprimer ce produit ?".to_string()]
        );
    }

    #[test]
    fn test_price_and_missing_stock() {
        let cols = columns();
        let row = product(3, "Soie");
        let cells: Vec<String> = cols.iter().map(|c| resolve_cell(c, &row)).collect();
        assert_eq!(cells, vec!["3", "Soie", "TX-03", "-", "12.50 DH", "-"]);
    }

    #[test]
    fn test_no_session_no_row_actions() {
        assert!(row_actions(&PermissionEvaluator::for_session(None)).is_empty());
    }
}
