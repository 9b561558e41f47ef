use contracts::domain::common::RowId;
use contracts::system::permissions::names;
use contracts::system::users::{Role, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::details::{AssignRoleModal, PermissionModal, UserAdminForm};
use crate::shared::components::ui::{Badge, Button, ButtonVariant};
use crate::shared::components::{CellValue, ColumnKind, DataTable, TableAction, TableColumn};
use crate::shared::crud::{
    load_list, signals, ActionMessages, CrudController, CrudState, DeleteResource, FormMode,
    ListResource, ListState, ScreenMessages, SubmitResource,
};
use crate::shared::dialogs::{BrowserDialogs, Dialogs};
use crate::shared::state::StateCell;
use crate::system::auth::{use_session, PermissionEvaluator};
use crate::system::users::api::{fetch_roles, UserAccounts, UserResource};

pub type UserController =
    CrudController<UserResource, UserAdminForm, RwSignal<CrudState<User, UserAdminForm>>, BrowserDialogs>;

pub static MESSAGES: ScreenMessages = ScreenMessages {
    entity: "utilisateur",
    load_failed: "Erreur lors du chargement des utilisateurs",
    save_failed: "Erreur lors de la mise à jour de l'utilisateur",
    delete_confirm: "Êtes-vous sûr de vouloir supprimer cet utilisateur ?",
    delete_failed: "Erreur lors de la suppression",
    created: None,
    updated: None,
    deleted: Some("Utilisateur supprimé avec succès"),
};

static ENABLE: ActionMessages = ActionMessages {
    name: "activation",
    confirm: None,
    success: "Utilisateur activé avec succès",
    failure: "Erreur lors de l'activation",
};

static DISABLE: ActionMessages = ActionMessages {
    name: "désactivation",
    confirm: None,
    success: "Utilisateur désactivé avec succès",
    failure: "Erreur lors de la désactivation",
};

static REMOVE_ROLE: ActionMessages = ActionMessages {
    name: "retrait du rôle",
    confirm: Some("Êtes-vous sûr de vouloir retirer le rôle de cet utilisateur ?"),
    success: "Rôle retiré avec succès",
    failure: "Erreur lors du retrait du rôle",
};

const TOGGLE: TableAction = TableAction::new("toggle", "Activer/Désactiver").icon("🔄").class("btn-toggle");
const ASSIGN_ROLE: TableAction = TableAction::new("assign_role", "Assigner Rôle").icon("👤").class("btn-edit");
const REMOVE: TableAction = TableAction::new("remove_role", "Retirer Rôle").icon("🚫").class("btn-cancel");
const PERMISSIONS: TableAction =
    TableAction::new("permissions", "Gérer Permissions").icon("🔐").class("btn-edit");
const DELETE: TableAction = TableAction::new("delete", "Supprimer").icon("🗑️").class("btn-delete");

fn format_enabled(value: Option<&CellValue>) -> String {
    match value.and_then(CellValue::as_bool) {
        Some(false) => "Inactif".to_string(),
        _ => "Actif".to_string(),
    }
}

pub fn columns() -> Vec<TableColumn<User>> {
    vec![
        TableColumn::new("id", "ID", |u: &User| Some(CellValue::from(u.id))).kind(ColumnKind::Number),
        TableColumn::new("username", "Username", |u: &User| CellValue::non_empty(&u.username)),
        TableColumn::new("email", "Email", |u: &User| u.email.as_deref().and_then(CellValue::non_empty)),
        TableColumn::path("role.name", "Rôle"),
        TableColumn::new("permissions", "Permissions", |u: &User| Some(CellValue::from(u.permissions_summary()))),
        TableColumn::new("enabled", "Statut", |u: &User| Some(CellValue::from(u.enabled)))
            .kind(ColumnKind::Status)
            .format(format_enabled),
    ]
}

pub fn row_actions(permissions: &PermissionEvaluator) -> Vec<TableAction> {
    if permissions.has_permission(names::MANAGE_USERS) {
        vec![TOGGLE, ASSIGN_ROLE, REMOVE, PERMISSIONS, DELETE]
    } else {
        Vec::new()
    }
}

/// Flip the enabled flag of a listed user
pub async fn toggle_enabled<R, C, D>(ctl: &CrudController<R, UserAdminForm, C, D>, id: RowId) -> bool
where
    R: ListResource<Row = User> + SubmitResource<UserAdminForm> + DeleteResource + UserAccounts,
    C: StateCell<CrudState<User, UserAdminForm>>,
    D: Dialogs,
{
    let Some(enabled) = ctl.state().read(|s| s.list.find(id).map(|u| u.enabled)) else {
        log::warn!("toggle: no user {}", id);
        return false;
    };
    let messages = if enabled { &DISABLE } else { &ENABLE };
    let resource = ctl.resource();
    ctl.run_action(messages, |_| resource.set_enabled(id, !enabled))
        .await
}

pub async fn remove_role<R, C, D>(ctl: &CrudController<R, UserAdminForm, C, D>, id: RowId) -> bool
where
    R: ListResource<Row = User> + SubmitResource<UserAdminForm> + DeleteResource + UserAccounts,
    C: StateCell<CrudState<User, UserAdminForm>>,
    D: Dialogs,
{
    let resource = ctl.resource();
    ctl.run_action(&REMOVE_ROLE, |_| resource.remove_role(id)).await
}

/// Open the permission form on a listed user
pub fn open_permissions<R, C, D>(ctl: &CrudController<R, UserAdminForm, C, D>, id: RowId) -> bool
where
    R: ListResource<Row = User> + SubmitResource<UserAdminForm> + DeleteResource,
    C: StateCell<CrudState<User, UserAdminForm>>,
    D: Dialogs,
{
    if ctl.state().read(|s| s.list.find(id).is_none()) {
        return false;
    }
    ctl.open_with(FormMode::Edit(id), UserAdminForm::permission());
    true
}

/// Submit whichever form is open and announce its own success text
pub async fn submit_admin_form<R, C, D>(ctl: &CrudController<R, UserAdminForm, C, D>) -> bool
where
    R: ListResource<Row = User> + SubmitResource<UserAdminForm> + DeleteResource,
    C: StateCell<CrudState<User, UserAdminForm>>,
    D: Dialogs,
{
    let Some(success) = ctl
        .state()
        .read(|s| s.form_values().map(UserAdminForm::success_message))
    else {
        return false;
    };
    let saved = ctl.submit().await;
    if saved {
        ctl.dialogs().alert(success);
    }
    saved
}

#[component]
pub fn UserList() -> impl IntoView {
    let session = use_session();
    let state = RwSignal::new(CrudState::<User, UserAdminForm>::default());
    let roles = RwSignal::new(ListState::<Role>::default());
    let ctl: UserController = CrudController::new(UserResource, state, BrowserDialogs, &MESSAGES);

    let load = move || {
        spawn_local(async move {
            ctl.refresh().await;
        });
    };

    Effect::new(move |_| {
        if state.with_untracked(|s| s.list.is_idle()) {
            load();
            spawn_local(async move {
                load_list::<ListState<Role>, Role, _, _, _>(
                    &roles,
                    &BrowserDialogs,
                    "Erreur lors du chargement des rôles",
                    fetch_roles(),
                )
                .await;
            });
        }
    });

    let on_action = Callback::new(move |(name, id): (&'static str, RowId)| match name {
        "toggle" => spawn_local(async move {
            toggle_enabled(&ctl, id).await;
        }),
        "assign_role" => {
            ctl.open_edit(id);
        }
        "remove_role" => spawn_local(async move {
            remove_role(&ctl, id).await;
        }),
        "permissions" => {
            open_permissions(&ctl, id);
        }
        "delete" => spawn_local(async move {
            ctl.delete(id).await;
        }),
        other => log::debug!("user action {} ignored", other),
    });

    let loading = signals::loading(state);
    let open_form = move || {
        state.with(|s| match s.form_values() {
            Some(UserAdminForm::AssignRole(_)) => Some(true),
            Some(UserAdminForm::Permission(_)) => Some(false),
            None => None,
        })
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Utilisateurs"</h1>
                    <Badge class="badge badge--neutral">
                        {move || state.with(|s| s.list.rows.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
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
                    empty_message="Aucun utilisateur"
                    on_action=on_action
                />
            </div>

            <Show when=move || open_form() == Some(true)>
                <AssignRoleModal ctl=ctl roles=roles />
            </Show>
            <Show when=move || open_form() == Some(false)>
                <PermissionModal ctl=ctl roles=roles />
            </Show>
        </div>
    }
}
