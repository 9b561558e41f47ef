pub mod transitions;

use contracts::domain::a003_purchase_order::aggregate::{PurchaseOrder, PurchaseOrderDto};
use contracts::domain::common::RowId;
use contracts::system::permissions::names;
use leptos::prelude::*;
use leptos::task::spawn_local;

use self::transitions::{run_transition, Transition};
use super::details::{load_references, OrderDetails, OrderReferences};
use crate::domain::a003_purchase_order::api::OrderResource;
use crate::shared::components::ui::{Badge, Button, ButtonVariant};
use crate::shared::components::{CellValue, ColumnKind, DataTable, TableAction, TableColumn};
use crate::shared::crud::{signals, CrudController, CrudState, ScreenMessages};
use crate::shared::dialogs::BrowserDialogs;
use crate::system::auth::{use_session, PermissionEvaluator};

pub type OrderController = CrudController<
    OrderResource,
    PurchaseOrderDto,
    RwSignal<CrudState<PurchaseOrder, PurchaseOrderDto>>,
    BrowserDialogs,
>;

pub static MESSAGES: ScreenMessages = ScreenMessages {
    entity: "commande",
    load_failed: "Erreur lors du chargement des commandes",
    save_failed: "Erreur lors de l'enregistrement de la commande",
    delete_confirm: "Êtes-vous sûr de vouloir supprimer cette commande ?",
    delete_failed: "Erreur lors de la suppression de la commande",
    created: Some("Commande créée avec succès"),
    updated: Some("Commande modifiée avec succès"),
    deleted: None,
};

const RECEIVE: TableAction = TableAction::new("receive", "Recevoir").icon("📦").class("btn-receive");
const VALIDATE: TableAction = TableAction::new("validate", "Valider").icon("✓").class("btn-validate");
const CANCEL: TableAction = TableAction::new("cancel", "Annuler").icon("✗").class("btn-cancel");
const EDIT: TableAction = TableAction::new("edit", "Modifier").icon("✏️").class("btn-edit");
const DELETE: TableAction = TableAction::new("delete", "Supprimer").icon("🗑️").class("btn-delete");

/// `2026-01-05T00:00:00` → `2026-01-05`
fn order_date(order: &PurchaseOrder) -> Option<CellValue> {
    let raw = order.date_commande.as_deref()?;
    CellValue::non_empty(raw.split('T').next().unwrap_or(raw))
}

fn format_amount(value: Option<&CellValue>) -> String {
    match value.and_then(CellValue::as_f64) {
        Some(amount) => format!("{:.2}", amount),
        None => "-".to_string(),
    }
}

pub fn columns() -> Vec<TableColumn<PurchaseOrder>> {
    vec![
        TableColumn::new("id", "ID", |o: &PurchaseOrder| Some(CellValue::from(o.id))).kind(ColumnKind::Number),
        TableColumn::new("numeroCommande", "N° commande", |o: &PurchaseOrder| {
            CellValue::non_empty(&o.numero_commande)
        }),
        TableColumn::new("fournisseur", "Fournisseur", |o: &PurchaseOrder| {
            o.fournisseur.as_ref().and_then(|f| f.name()).and_then(CellValue::non_empty)
        }),
        TableColumn::new("dateCommande", "Date", order_date).kind(ColumnKind::Date),
        TableColumn::new("statut", "Statut", |o: &PurchaseOrder| {
            o.statut.as_deref().and_then(CellValue::non_empty)
        })
        .kind(ColumnKind::Status),
        TableColumn::new("montantTotal", "Montant (DH)", |o: &PurchaseOrder| o.montant_total.map(CellValue::from))
            .kind(ColumnKind::Number)
            .format(format_amount),
    ]
}

/// Transitions are offered on every row; the backend decides whether the
/// order's current status allows them
pub fn row_actions(permissions: &PermissionEvaluator) -> Vec<TableAction> {
    [
        (names::RECEIVE_ORDER, RECEIVE),
        (names::VALIDATE_ORDER, VALIDATE),
        (names::CANCEL_ORDER, CANCEL),
        (names::EDIT_ORDER, EDIT),
        (names::DELETE_ORDER, DELETE),
    ]
    .into_iter()
    .filter(|(permission, _)| permissions.has_permission(permission))
    .map(|(_, action)| action)
    .collect()
}

#[component]
pub fn OrderList() -> impl IntoView {
    let session = use_session();
    let state = RwSignal::new(CrudState::<PurchaseOrder, PurchaseOrderDto>::default());
    let references = RwSignal::new(OrderReferences::default());
    let ctl: OrderController = CrudController::new(OrderResource, state, BrowserDialogs, &MESSAGES);

    let load = move || {
        spawn_local(async move {
            ctl.refresh().await;
        });
    };

    Effect::new(move |_| {
        if state.with_untracked(|s| s.list.is_idle()) {
            load();
            spawn_local(load_references(references, BrowserDialogs));
        }
    });

    let on_action = Callback::new(move |(name, id): (&'static str, RowId)| {
        if let Some(transition) = Transition::from_action(name) {
            spawn_local(async move {
                let now = chrono::Local::now().naive_local();
                run_transition(&ctl, transition, id, now).await;
            });
            return;
        }
        match name {
            "edit" => {
                ctl.open_edit(id);
            }
            "delete" => spawn_local(async move {
                ctl.delete(id).await;
            }),
            other => log::debug!("order action {} ignored", other),
        }
    });

    let loading = signals::loading(state);

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Commandes fournisseurs"</h1>
                    <Badge class="badge badge--neutral">
                        {move || state.with(|s| s.list.rows.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || session.can(names::CREATE_ORDER)>
                        <Button on_click=Callback::new(move |_| ctl.open_create())>
                            "+ Nouvelle commande"
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
                    empty_message="Aucune commande"
                    on_action=on_action
                />
            </div>

            <Show when=move || state.with(|s| s.form.is_some())>
                <OrderDetails ctl=ctl references=references />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::components::data_table::resolve_cell;
    use crate::shared::crud::testing::FakeResource;
    use crate::shared::crud::ListPhase;
    use crate::shared::dialogs::testing::RecordingDialogs;
    use crate::shared::http::ApiError;
    use crate::shared::state::StateCell;
    use crate::system::auth::Session;
    use contracts::system::users::User;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn order(id: RowId) -> PurchaseOrder {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "numeroCommande": format!("CMD-{}", id),
            "fournisseur": {"id": 4, "raisonSociale": "Atlas Textile"},
            "dateCommande": "2026-02-14T09:30:00",
            "statut": "EN_ATTENTE",
            "montantTotal": 1250.5
        }))
        .unwrap()
    }

    #[test]
    fn test_unreachable_backend_keeps_previous_rows() {
        let fake = FakeResource::<PurchaseOrder, PurchaseOrderDto>::new();
        let dialogs = Rc::new(RecordingDialogs::accepting());
        let cell: Rc<RefCell<CrudState<PurchaseOrder, PurchaseOrderDto>>> =
            Rc::new(RefCell::new(CrudState::default()));
        let ctl = CrudController::new(fake.clone(), cell, dialogs.clone(), &MESSAGES);

        fake.queue_list(Ok(vec![order(1), order(2)]));
        assert!(block_on(ctl.refresh()));

        fake.queue_list(Err(ApiError::from_status(0, "")));
        assert!(!block_on(ctl.refresh()));

        assert_eq!(ctl.state().read(|s| s.list.rows.len()), 2);
        assert_eq!(ctl.state().read(|s| s.list.phase), ListPhase::LoadError);
        let alerts = dialogs.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Erreur lors du chargement des commandes"));
    }

    #[test]
    fn test_cells() {
        let row = order(7);
        let cells: Vec<String> = columns().iter().map(|c| resolve_cell(c, &row)).collect();
        assert_eq!(
            cells,
            vec!["7", "CMD-7", "Atlas Textile", "2026-02-14", "EN_ATTENTE", "1250.50"]
        );

        let bare: PurchaseOrder = serde_json::from_str(r#"{"id":8}"#).unwrap();
        let cells: Vec<String> = columns().iter().map(|c| resolve_cell(c, &bare)).collect();
        assert_eq!(cells, vec!["8", "-", "-", "-", "-", "-"]);
    }

    #[test]
    fn test_actions_follow_permissions() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"username":"mag","permissions":["CONSULTER_COMMANDE","RECEPTIONNER_COMMANDE"]}"#,
        )
        .unwrap();
        let session = Session {
            user,
            access_token: "jwt".into(),
            refresh_token: None,
        };
        let actions = row_actions(&PermissionEvaluator::for_session(Some(&session)));
        assert_eq!(actions, vec![RECEIVE]);
        assert!(row_actions(&PermissionEvaluator::for_session(None)).is_empty());
    }
}
