//! Role assignment and permission override forms of the users screen

use contracts::shared::FieldErrors;
use contracts::system::users::{
    permission_breakdown, permission_catalog, AssignRoleRequest, PermissionEntry, Role,
    UpdatePermissionRequest, User,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::list::{submit_admin_form, UserController};
use crate::shared::components::ui::SelectField;
use crate::shared::components::FormModal;
use crate::shared::crud::{signals, FormMode, FormModel, ListState};

/// The two forms opened on a user row
#[derive(Debug, Clone, PartialEq)]
pub enum UserAdminForm {
    AssignRole(AssignRoleRequest),
    Permission(UpdatePermissionRequest),
}

impl Default for UserAdminForm {
    fn default() -> Self {
        Self::AssignRole(AssignRoleRequest::default())
    }
}

impl UserAdminForm {
    /// Fresh permission form: nothing chosen, granting
    pub fn permission() -> Self {
        Self::Permission(UpdatePermissionRequest::default())
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::AssignRole(_) => "Rôle assigné avec succès",
            Self::Permission(_) => "Permission mise à jour avec succès",
        }
    }

    fn role_name(&self) -> String {
        match self {
            Self::AssignRole(r) => r.role_name.clone(),
            Self::Permission(_) => String::new(),
        }
    }

    fn permission_name(&self) -> String {
        match self {
            Self::Permission(p) => p.permission_name.clone(),
            Self::AssignRole(_) => String::new(),
        }
    }

    fn granted(&self) -> bool {
        match self {
            Self::Permission(p) => p.granted,
            Self::AssignRole(_) => true,
        }
    }
}

impl FormModel for UserAdminForm {
    type Row = User;

    /// Role form prefilled with the current role
    fn from_row(row: &User) -> Self {
        Self::AssignRole(AssignRoleRequest {
            role_name: row.role_name().unwrap_or_default().to_string(),
        })
    }

    fn validate(&self) -> FieldErrors {
        match self {
            Self::AssignRole(request) => request.validate(),
            Self::Permission(request) => request.validate(),
        }
    }
}

pub fn role_options(roles: &[Role]) -> Vec<(String, String)> {
    roles
        .iter()
        .map(|r| {
            let label = match r.description.as_deref() {
                Some(description) if !description.is_empty() => format!("{} ({})", r.name, description),
                _ => r.name.clone(),
            };
            (r.name.clone(), label)
        })
        .collect()
}

pub fn permission_options(users: &[User], roles: &[Role]) -> Vec<(String, String)> {
    permission_catalog(users, roles)
        .into_iter()
        .map(|p| {
            let label = match p.category.as_deref() {
                Some(category) => format!("{} [{}]", p.name, category),
                None => p.name.clone(),
            };
            (p.name, label)
        })
        .collect()
}

fn entry_status(entry: &PermissionEntry) -> &'static str {
    match (entry.from_role, entry.has_custom, entry.granted) {
        (true, false, _) => "Rôle",
        (true, true, true) => "Rôle (confirmée)",
        (true, true, false) => "Révoquée",
        (false, _, _) => "Personnalisée",
    }
}

#[component]
pub fn AssignRoleModal(ctl: UserController, roles: RwSignal<ListState<Role>>) -> impl IntoView {
    let state = *ctl.state();

    view! {
        <FormModal
            title="Assigner un rôle".to_string()
            submit_label="Assigner".to_string()
            on_close=Callback::new(move |_| ctl.close_form())
            on_submit=Callback::new(move |_| {
                spawn_local(async move {
                    submit_admin_form(&ctl).await;
                });
            })
            submitting=signals::submitting(state)
            error=signals::submit_error(state)
        >
            <SelectField
                label="Rôle"
                value=Signal::derive(move || {
                    state.with(|s| s.form_values().map(UserAdminForm::role_name).unwrap_or_default())
                })
                options=Signal::derive(move || roles.with(|r| role_options(&r.rows)))
                on_change=Callback::new(move |role_name: String| {
                    ctl.update_form(|f| *f = UserAdminForm::AssignRole(AssignRoleRequest { role_name }))
                })
                error=signals::error(state, AssignRoleRequest::ROLE_NAME.name)
            />
        </FormModal>
    }
}

#[component]
pub fn PermissionModal(ctl: UserController, roles: RwSignal<ListState<Role>>) -> impl IntoView {
    let state = *ctl.state();

    let selected_user = move || {
        state.with(|s| {
            let id = match s.form.as_ref().map(|f| f.mode) {
                Some(FormMode::Edit(id)) => id,
                _ => return None,
            };
            s.list.find(id).cloned()
        })
    };

    let breakdown = move || {
        selected_user()
            .map(|user| permission_breakdown(&user))
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                let status = entry_status(&entry);
                let class = if entry.granted { "perm perm--granted" } else { "perm perm--revoked" };
                view! {
                    <li class=class>
                        <span class="perm__name">{entry.name}</span>
                        <span class="perm__category">{entry.category.unwrap_or_default()}</span>
                        <span class="perm__status">{status}</span>
                    </li>
                }
            })
            .collect_view()
    };

    let catalog = Signal::derive(move || {
        let users = state.with(|s| s.list.rows.clone());
        roles.with(|r| permission_options(&users, &r.rows))
    });

    let update = move |edit: fn(&mut UpdatePermissionRequest, String), value: String| {
        ctl.update_form(|f| {
            if let UserAdminForm::Permission(request) = f {
                edit(request, value);
            }
        })
    };

    view! {
        <FormModal
            title=Signal::derive(move || {
                selected_user()
                    .map(|u| format!("Permissions de {}", u.username))
                    .unwrap_or_else(|| "Permissions".to_string())
            })
            submit_label="Mettre à jour".to_string()
            on_close=Callback::new(move |_| ctl.close_form())
            on_submit=Callback::new(move |_| {
                spawn_local(async move {
                    submit_admin_form(&ctl).await;
                });
            })
            submitting=signals::submitting(state)
            error=signals::submit_error(state)
        >
            <ul class="perm-list">{breakdown}</ul>
            <SelectField
                label="Permission"
                value=Signal::derive(move || {
                    state.with(|s| s.form_values().map(UserAdminForm::permission_name).unwrap_or_default())
                })
                options=catalog
                on_change=Callback::new(move |name: String| {
                    update(|r, v| r.permission_name = v, name)
                })
                error=signals::error(state, UpdatePermissionRequest::PERMISSION_NAME.name)
            />
            <SelectField
                label="Action"
                value=Signal::derive(move || {
                    let granted = state.with(|s| s.form_values().map_or(true, UserAdminForm::granted));
                    if granted { "true" } else { "false" }.to_string()
                })
                options=vec![
                    ("true".to_string(), "Accorder".to_string()),
                    ("false".to_string(), "Révoquer".to_string()),
                ]
                on_change=Callback::new(move |raw: String| {
                    update(|r, v| r.granted = v != "false", raw)
                })
            />
        </FormModal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::users::Permission;

    fn role(name: &str, description: Option<&str>, perms: &[&str]) -> Role {
        Role {
            id: None,
            name: name.to_string(),
            description: description.map(str::to_string),
            permissions: perms
                .iter()
                .map(|p| Permission {
                    id: None,
                    name: p.to_string(),
                    description: None,
                    category: Some("STOCK".into()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_forms_validate_their_own_field() {
        let errors = UserAdminForm::default().validate();
        assert!(errors.get("roleName").is_some());

        let errors = UserAdminForm::permission().validate();
        assert!(errors.get("permissionName").is_some());
        assert!(errors.get("roleName").is_none());
    }

    #[test]
    fn test_role_form_prefilled_from_user() {
        let user: User =
            serde_json::from_str(r#"{"id":1,"username":"chef","role":"WORKSHOP_MANAGER"}"#).unwrap();
        assert_eq!(
            UserAdminForm::from_row(&user),
            UserAdminForm::AssignRole(AssignRoleRequest {
                role_name: "WORKSHOP_MANAGER".into()
            })
        );
    }

    #[test]
    fn test_options() {
        let roles = vec![
            role("ADMIN", Some("Administrateur"), &["GERER_UTILISATEURS"]),
            role("WAREHOUSE_KEEPER", None, &["CONSULTER_STOCK"]),
        ];
        assert_eq!(
            role_options(&roles),
            vec![
                ("ADMIN".to_string(), "ADMIN (Administrateur)".to_string()),
                ("WAREHOUSE_KEEPER".to_string(), "WAREHOUSE_KEEPER".to_string()),
            ]
        );
        let options = permission_options(&[], &roles);
        assert_eq!(options[0], ("CONSULTER_STOCK".to_string(), "CONSULTER_STOCK [STOCK]".to_string()));
        assert_eq!(options.len(), 2);
    }
}
