use crate::domain::common::{Identified, RowId};
use crate::shared::validation::{FieldErrors, FieldSpec, ValidationRules};
use crate::system::permissions::{CustomPermission, PermissionSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RowId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "role_by_name_or_record")]
    pub role: Option<Role>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Flat permission names as computed by the backend
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub custom_permissions: Vec<CustomPermission>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

/// Some endpoints send the role as a bare name instead of a record
fn role_by_name_or_record<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RoleField {
        Name(String),
        Record(Role),
    }

    Ok(match Option::<RoleField>::deserialize(deserializer)? {
        None => None,
        Some(RoleField::Name(name)) => Some(Role {
            id: None,
            name,
            description: None,
            permissions: Vec::new(),
        }),
        Some(RoleField::Record(role)) => Some(role),
    })
}

impl Identified for User {
    fn row_id(&self) -> RowId {
        self.id
    }
}

impl User {
    /// Role grants plus any flat names the backend attached, before overrides
    pub fn baseline_permissions(&self) -> impl Iterator<Item = &str> {
        self.role
            .iter()
            .flat_map(|r| r.permissions.iter().map(|p| p.name.as_str()))
            .chain(self.permissions.iter().map(String::as_str))
    }

    pub fn effective_permissions(&self) -> PermissionSet {
        PermissionSet::effective(self.baseline_permissions(), &self.custom_permissions)
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role
            .as_ref()
            .map(|r| r.name.as_str())
            .or_else(|| self.roles.first().map(String::as_str))
    }

    /// Summary shown in the users table
    pub fn permissions_summary(&self) -> String {
        match self.effective_permissions().len() {
            0 => "Aucune".to_string(),
            n => format!("{} permissions", n),
        }
    }
}

/// One row of the permission breakdown shown when editing a user's overrides
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionEntry {
    pub name: String,
    pub category: Option<String>,
    pub from_role: bool,
    pub granted: bool,
    pub has_custom: bool,
}

/// Role permissions with their override state, then custom-only grants
pub fn permission_breakdown(user: &User) -> Vec<PermissionEntry> {
    let role_perms: &[Permission] = user.role.as_ref().map(|r| r.permissions.as_slice()).unwrap_or(&[]);
    let custom = &user.custom_permissions;

    let mut entries: Vec<PermissionEntry> = role_perms
        .iter()
        .map(|p| {
            let over = custom.iter().find(|c| c.permission_name == p.name);
            PermissionEntry {
                name: p.name.clone(),
                category: p.category.clone(),
                from_role: true,
                granted: over.map(|c| c.granted).unwrap_or(true),
                has_custom: over.is_some(),
            }
        })
        .collect();

    entries.extend(
        custom
            .iter()
            .filter(|c| c.granted && !role_perms.iter().any(|p| p.name == c.permission_name))
            .map(|c| PermissionEntry {
                name: c.permission_name.clone(),
                category: c.permission_category.clone(),
                from_role: false,
                granted: true,
                has_custom: true,
            }),
    );

    entries
}

/// Every permission that can be granted, deduplicated by name and sorted
pub fn permission_catalog(users: &[User], roles: &[Role]) -> Vec<Permission> {
    let mut by_name: BTreeMap<String, Permission> = BTreeMap::new();
    let from_roles = roles.iter().flat_map(|r| r.permissions.iter());
    let from_users = users
        .iter()
        .filter_map(|u| u.role.as_ref())
        .flat_map(|r| r.permissions.iter());
    for p in from_roles.chain(from_users) {
        by_name.entry(p.name.clone()).or_insert_with(|| p.clone());
    }
    by_name.into_values().collect()
}

// ============================================================================
// Administration requests
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role_name: String,
}

impl AssignRoleRequest {
    pub const ROLE_NAME: FieldSpec = FieldSpec::new("roleName", "Rôle", ValidationRules::required());

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check_text(&Self::ROLE_NAME, &self.role_name);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionRequest {
    pub permission_name: String,
    pub granted: bool,
}

impl Default for UpdatePermissionRequest {
    fn default() -> Self {
        Self {
            permission_name: String::new(),
            granted: true,
        }
    }
}

impl UpdatePermissionRequest {
    pub const PERMISSION_NAME: FieldSpec =
        FieldSpec::new("permissionName", "Permission", ValidationRules::required());

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check_text(&Self::PERMISSION_NAME, &self.permission_name);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::permissions::names;

    fn user_json() -> &'static str {
        r#"{
            "id": 3,
            "username": "magasinier",
            "email": "m@tricol.ma",
            "enabled": true,
            "role": {
                "id": 2,
                "name": "WAREHOUSE_KEEPER",
                "permissions": [
                    {"id": 1, "name": "CONSULTER_STOCK", "category": "STOCK"},
                    {"id": 2, "name": "CONSULTER_PRODUIT", "category": "PRODUIT"}
                ]
            },
            "customPermissions": [
                {"permissionId": 2, "permissionName": "CONSULTER_PRODUIT", "granted": false},
                {"permissionId": 9, "permissionName": "CONSULTER_COMMANDE", "permissionCategory": "COMMANDE", "granted": true},
                {"permissionId": 1, "permissionName": "CONSULTER_STOCK", "granted": true}
            ]
        }"#
    }

    #[test]
    fn test_effective_permissions_from_payload() {
        let user: User = serde_json::from_str(user_json()).unwrap();
        let set = user.effective_permissions();
        assert!(set.contains(names::VIEW_STOCK));
        assert!(!set.contains(names::VIEW_PRODUCTS));
        assert!(set.contains(names::VIEW_ORDERS));
        assert_eq!(set.len(), 2);
        assert_eq!(user.permissions_summary(), "2 permissions");
        assert_eq!(user.role_name(), Some("WAREHOUSE_KEEPER"));
    }

    #[test]
    fn test_flat_permissions_only() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"username":"admin","permissions":["GERER_UTILISATEURS","GERER_UTILISATEURS"]}"#,
        )
        .unwrap();
        assert!(user.enabled);
        assert_eq!(user.effective_permissions().len(), 1);

        let none: User = serde_json::from_str(r#"{"id":2,"username":"nobody"}"#).unwrap();
        assert_eq!(none.permissions_summary(), "Aucune");
        assert!(none.role.is_none());

        let named: User =
            serde_json::from_str(r#"{"id":4,"username":"chef","role":"WORKSHOP_MANAGER"}"#).unwrap();
        assert_eq!(named.role_name(), Some("WORKSHOP_MANAGER"));
    }

    #[test]
    fn test_breakdown_marks_overrides() {
        let user: User = serde_json::from_str(user_json()).unwrap();
        let entries = permission_breakdown(&user);
        assert_eq!(entries.len(), 3);

        let produit = entries.iter().find(|e| e.name == "CONSULTER_PRODUIT").unwrap();
        assert!(produit.from_role && produit.has_custom && !produit.granted);

        let stock = entries.iter().find(|e| e.name == "CONSULTER_STOCK").unwrap();
        assert!(stock.from_role && stock.granted);

        let commande = entries.iter().find(|e| e.name == "CONSULTER_COMMANDE").unwrap();
        assert!(!commande.from_role && commande.granted);
    }

    #[test]
    fn test_catalog_deduplicates() {
        let user: User = serde_json::from_str(user_json()).unwrap();
        let roles = vec![Role {
            id: Some(1),
            name: "ADMIN".into(),
            description: None,
            permissions: vec![
                Permission { id: Some(1), name: "CONSULTER_STOCK".into(), description: None, category: None },
                Permission { id: Some(5), name: "GERER_UTILISATEURS".into(), description: None, category: None },
            ],
        }];
        let catalog = permission_catalog(&[user], &roles);
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["CONSULTER_PRODUIT", "CONSULTER_STOCK", "GERER_UTILISATEURS"]);
    }

    #[test]
    fn test_admin_requests_validate() {
        assert!(AssignRoleRequest::default().validate().get("roleName").is_some());
        let req = UpdatePermissionRequest::default();
        assert!(req.granted);
        assert!(req.validate().get("permissionName").is_some());
        let json = serde_json::to_value(UpdatePermissionRequest {
            permission_name: "CONSULTER_STOCK".into(),
            granted: false,
        })
        .unwrap();
        assert_eq!(json["permissionName"], "CONSULTER_STOCK");
        assert_eq!(json["granted"], false);
    }
}
