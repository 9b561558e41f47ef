use async_trait::async_trait;
use contracts::domain::common::RowId;
use contracts::system::users::{AssignRoleRequest, Role, UpdatePermissionRequest, User};

use super::ui::details::UserAdminForm;
use crate::shared::crud::{DeleteResource, FormMode, ListResource, SubmitResource};
use crate::shared::http::{ApiClient, ApiError};

const BASE: &str = "/v1/admin/users";

pub async fn fetch_users() -> Result<Vec<User>, ApiError> {
    ApiClient::new().get_json(BASE).await
}

pub async fn fetch_roles() -> Result<Vec<Role>, ApiError> {
    ApiClient::new().get_json(&format!("{}/roles", BASE)).await
}

pub async fn delete_user(id: RowId) -> Result<(), ApiError> {
    ApiClient::new().delete(&format!("{}/{}", BASE, id)).await
}

pub async fn enable_user(id: RowId) -> Result<(), ApiError> {
    ApiClient::new()
        .put_empty(&format!("{}/{}/enable", BASE, id))
        .await
}

pub async fn disable_user(id: RowId) -> Result<(), ApiError> {
    ApiClient::new()
        .put_empty(&format!("{}/{}/disable", BASE, id))
        .await
}

pub async fn assign_role(id: RowId, request: &AssignRoleRequest) -> Result<(), ApiError> {
    ApiClient::new()
        .put(&format!("{}/{}/role", BASE, id), request)
        .await
}

pub async fn remove_user_role(id: RowId) -> Result<(), ApiError> {
    ApiClient::new()
        .delete(&format!("{}/{}/role", BASE, id))
        .await
}

pub async fn update_permission(id: RowId, request: &UpdatePermissionRequest) -> Result<(), ApiError> {
    ApiClient::new()
        .put(&format!("{}/{}/permissions", BASE, id), request)
        .await
}

/// Account operations that are not form submissions
#[async_trait(?Send)]
pub trait UserAccounts {
    async fn set_enabled(&self, id: RowId, enabled: bool) -> Result<(), ApiError>;
    async fn remove_role(&self, id: RowId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserResource;

#[async_trait(?Send)]
impl ListResource for UserResource {
    type Row = User;

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        fetch_users().await
    }
}

#[async_trait(?Send)]
impl SubmitResource<UserAdminForm> for UserResource {
    /// Users are never created from this screen; both forms target an
    /// existing account
    async fn submit(&self, mode: FormMode, form: &UserAdminForm) -> Result<(), ApiError> {
        let FormMode::Edit(id) = mode else {
            return Err(ApiError::Encode("aucun utilisateur sélectionné".to_string()));
        };
        match form {
            UserAdminForm::AssignRole(request) => assign_role(id, request).await,
            UserAdminForm::Permission(request) => update_permission(id, request).await,
        }
    }
}

#[async_trait(?Send)]
impl DeleteResource for UserResource {
    async fn delete(&self, id: RowId) -> Result<(), ApiError> {
        delete_user(id).await
    }
}

#[async_trait(?Send)]
impl UserAccounts for UserResource {
    async fn set_enabled(&self, id: RowId, enabled: bool) -> Result<(), ApiError> {
        if enabled {
            enable_user(id).await
        } else {
            disable_user(id).await
        }
    }

    async fn remove_role(&self, id: RowId) -> Result<(), ApiError> {
        remove_user_role(id).await
    }
}
