//! Effective permission computation
//!
//! A user's effective set is the role-granted permissions with explicit
//! revocations removed, plus explicitly granted custom permissions. This is
//! the only permission model the client evaluates; role names are never
//! compared for gating.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Permission names known to the client
pub mod names {
    pub const VIEW_SUPPLIERS: &str = "CONSULTER_FOURNISSEUR";
    pub const CREATE_SUPPLIER: &str = "CREER_FOURNISSEUR";
    pub const EDIT_SUPPLIER: &str = "MODIFIER_FOURNISSEUR";
    pub const DELETE_SUPPLIER: &str = "SUPPRIMER_FOURNISSEUR";

    pub const VIEW_PRODUCTS: &str = "CONSULTER_PRODUIT";
    pub const CREATE_PRODUCT: &str = "CREER_PRODUIT";
    pub const EDIT_PRODUCT: &str = "MODIFIER_PRODUIT";
    pub const DELETE_PRODUCT: &str = "SUPPRIMER_PRODUIT";

    pub const VIEW_ORDERS: &str = "CONSULTER_COMMANDE";
    pub const CREATE_ORDER: &str = "CREER_COMMANDE";
    pub const EDIT_ORDER: &str = "MODIFIER_COMMANDE";
    pub const DELETE_ORDER: &str = "SUPPRIMER_COMMANDE";
    pub const VALIDATE_ORDER: &str = "VALIDER_COMMANDE";
    pub const CANCEL_ORDER: &str = "ANNULER_COMMANDE";
    pub const RECEIVE_ORDER: &str = "RECEPTIONNER_COMMANDE";

    pub const VIEW_STOCK: &str = "CONSULTER_STOCK";

    pub const MANAGE_USERS: &str = "GERER_UTILISATEURS";
}

/// Per-user override of a single permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPermission {
    #[serde(default)]
    pub permission_id: Option<i64>,
    pub permission_name: String,
    #[serde(default)]
    pub permission_category: Option<String>,
    /// `true` grants, `false` revokes
    pub granted: bool,
    #[serde(default)]
    pub assigned_at: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
}

/// A set of permission names with set semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(baseline − revoked) ∪ granted`
    pub fn effective<'a, I>(baseline: I, overrides: &[CustomPermission]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set: BTreeSet<String> = baseline.into_iter().map(str::to_string).collect();
        for o in overrides.iter().filter(|o| !o.granted) {
            set.remove(&o.permission_name);
        }
        for o in overrides.iter().filter(|o| o.granted) {
            set.insert(o.permission_name.clone());
        }
        Self(set)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn contains_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|n| self.contains(n.as_ref()))
    }

    pub fn contains_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.contains(n.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
