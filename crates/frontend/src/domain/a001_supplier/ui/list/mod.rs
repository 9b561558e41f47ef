use contracts::domain::a001_supplier::aggregate::{Supplier, SupplierDto};
use contracts::domain::common::RowId;
use contracts::system::permissions::names;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::details::SupplierDetails;
use crate::domain::a001_supplier::api::SupplierResource;
use crate::shared::components::ui::{Badge, Button, ButtonVariant};
use crate::shared::components::{CellValue, ColumnKind, DataTable, TableAction, TableColumn};
use crate::shared::crud::{signals, CrudController, CrudState, ScreenMessages};
use crate::shared::dialogs::BrowserDialogs;
use crate::system::auth::{use_session, PermissionEvaluator};

pub type SupplierController =
    CrudController<SupplierResource, SupplierDto, RwSignal<CrudState<Supplier, SupplierDto>>, BrowserDialogs>;

pub static MESSAGES: ScreenMessages = ScreenMessages {
    entity: "fournisseur",
    load_failed: "Erreur lors du chargement des fournisseurs",
    save_failed: "Erreur lors de l'enregistrement du fournisseur",
    delete_confirm: "Êtes-vous sûr de vouloir supprimer ce fournisseur ?",
    delete_failed: "Erreur lors de la suppression du fournisseur",
    created: Some("Fournisseur ajouté avec succès"),
    updated: Some("Fournisseur modifié avec succès"),
    deleted: None,
};

const EDIT: TableAction = TableAction::new("edit", "Modifier").icon("✏️").class("btn-edit");
const DELETE: TableAction = TableAction::new("delete", "Supprimer").icon("🗑️").class("btn-delete");

pub fn columns() -> Vec<TableColumn<Supplier>> {
    vec![
        TableColumn::new("id", "ID", |s: &Supplier| Some(CellValue::from(s.id))).kind(ColumnKind::Number),
        TableColumn::new("raisonSociale", "Raison Sociale", |s: &Supplier| {
            CellValue::non_empty(&s.raison_sociale)
        }),
        TableColumn::new("personneContact", "Personne Contact", |s: &Supplier| {
            CellValue::non_empty(&s.personne_contact)
        }),
        TableColumn::new("email", "Email", |s: &Supplier| CellValue::non_empty(&s.email)),
        TableColumn::new("telephone", "Téléphone", |s: &Supplier| CellValue::non_empty(&s.telephone)),
        TableColumn::new("adresse", "Adresse", |s: &Supplier| CellValue::non_empty(&s.adresse)),
        TableColumn::new("ville", "Ville", |s: &Supplier| CellValue::non_empty(&s.ville)),
        TableColumn::new("ice", "ICE", |s: &Supplier| CellValue::non_empty(&s.ice)),
    ]
}

/// Row buttons the session may use
pub fn row_actions(permissions: &PermissionEvaluator) -> Vec<TableAction> {
    let mut actions = Vec::new();
    if permissions.has_permission(names::EDIT_SUPPLIER) {
        actions.push(EDIT);
    }
    if permissions.has_permission(names::DELETE_SUPPLIER) {
        actions.push(DELETE);
    }
    actions
}

#[component]
pub fn SupplierList() -> impl IntoView {
    let session = use_session();
    let state = RwSignal::new(CrudState::<Supplier, SupplierDto>::default());
    let ctl: SupplierController = CrudController::new(SupplierResource, state, BrowserDialogs, &MESSAGES);

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
        other => log::debug!("supplier action {} ignored", other),
    });

    let can_create = move || session.can(names::CREATE_SUPPLIER);
    let loading = signals::loading(state);

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Fournisseurs"</h1>
                    <Badge class="badge badge--neutral">
                        {move || state.with(|s| s.list.rows.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Show when=can_create>
                        <Button on_click=Callback::new(move |_| ctl.open_create())>
                            "+ Nouveau fournisseur"
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
                    empty_message="Aucun fournisseur"
                    on_action=on_action
                />
            </div>

            <Show when=move || state.with(|s| s.form.is_some())>
                <SupplierDetails ctl=ctl />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::components::data_table::resolve_cell;
    use crate::shared::crud::testing::FakeResource;
    use crate::shared::crud::ScreenPhase;
    use crate::shared::dialogs::testing::RecordingDialogs;
    use crate::shared::state::StateCell;
    use crate::system::auth::Session;
    use contracts::system::users::User;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn supplier(id: RowId) -> Supplier {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "raisonSociale": "Atlas Tissus SARL",
            "ville": "Casablanca",
            "ice": "001234567000089"
        }))
        .unwrap()
    }

    fn valid_form() -> SupplierDto {
        SupplierDto {
            raison_sociale: "Atlas Tissus SARL".into(),
            adresse: "12 rue des Teinturiers".into(),
            ville: "Casablanca".into(),
            personne_contact: "Samira B.".into(),
            email: "contact@atlas-tissus.ma".into(),
            telephone: "+212522000000".into(),
            ice: "001234567000089".into(),
        }
    }

    #[test]
    fn test_create_sends_once_then_refetches_once() {
        let fake = FakeResource::<Supplier, SupplierDto>::new();
        let dialogs = Rc::new(RecordingDialogs::accepting());
        let cell: Rc<RefCell<CrudState<Supplier, SupplierDto>>> =
            Rc::new(RefCell::new(CrudState::default()));
        let ctl = CrudController::new(fake.clone(), cell, dialogs.clone(), &MESSAGES);
        fake.queue_list(Ok(vec![supplier(1)]));

        ctl.open_create();
        ctl.update_form(|f| *f = valid_form());
        assert!(block_on(ctl.submit()));

        assert_eq!(fake.submits.borrow().len(), 1);
        assert_eq!(fake.submits.borrow()[0].0, crate::shared::crud::FormMode::Create);
        assert_eq!(fake.list_calls.get(), 1);
        assert_eq!(ctl.state().read(|s| s.phase()), ScreenPhase::Loaded);
        assert_eq!(ctl.state().read(|s| s.list.rows.len()), 1);
        assert_eq!(
            *dialogs.alerts.borrow(),
            vec!["Fournisseur ajouté avec succès".to_string()]
        );
    }

    #[test]
    fn test_columns_fall_back_to_placeholder() {
        let cols = columns();
        let row = supplier(4);
        let cells: Vec<String> = cols.iter().map(|c| resolve_cell(c, &row)).collect();
        assert_eq!(cells[0], "4");
        assert_eq!(cells[1], "Atlas Tissus SARL");
        assert_eq!(cells[3], "-");
        assert_eq!(cols.len(), 8);
    }

    #[test]
    fn test_actions_follow_permissions() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"username":"achat","permissions":["CONSULTER_FOURNISSEUR","MODIFIER_FOURNISSEUR"]}"#,
        )
        .unwrap();
        let session = Session {
            user,
            access_token: "jwt".into(),
            refresh_token: None,
        };
        let actions = row_actions(&PermissionEvaluator::for_session(Some(&session)));
        assert_eq!(actions, vec![EDIT]);
        assert!(row_actions(&PermissionEvaluator::for_session(None)).is_empty());
    }
}
