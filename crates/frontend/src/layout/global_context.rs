//! Dashboard navigation state: active section and sidebar visibility
//!
//! The active section is mirrored into the `?section=` query parameter so a
//! reload lands on the same screen.

use contracts::system::permissions::names;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

use crate::system::auth::PermissionEvaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Suppliers,
    Products,
    Orders,
    Stock,
    Users,
}

impl Section {
    /// Sidebar order
    pub const ALL: [Section; 5] = [
        Section::Suppliers,
        Section::Products,
        Section::Orders,
        Section::Stock,
        Section::Users,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Suppliers => "fournisseurs",
            Self::Products => "produits",
            Self::Orders => "commandes",
            Self::Stock => "stock",
            Self::Users => "utilisateurs",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Suppliers => "Fournisseurs",
            Self::Products => "Produits",
            Self::Orders => "Commandes",
            Self::Stock => "Stock",
            Self::Users => "Utilisateurs",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Suppliers => "🏭",
            Self::Products => "📦",
            Self::Orders => "🧾",
            Self::Stock => "📊",
            Self::Users => "👥",
        }
    }

    pub fn view_permission(&self) -> &'static str {
        match self {
            Self::Suppliers => names::VIEW_SUPPLIERS,
            Self::Products => names::VIEW_PRODUCTS,
            Self::Orders => names::VIEW_ORDERS,
            Self::Stock => names::VIEW_STOCK,
            Self::Users => names::MANAGE_USERS,
        }
    }
}

pub fn visible_sections(permissions: &PermissionEvaluator) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|s| permissions.has_permission(s.view_permission()))
        .collect()
}

/// The requested section when visible, else the first visible one
pub fn resolve_active(requested: Option<Section>, visible: &[Section]) -> Option<Section> {
    requested
        .filter(|s| visible.contains(s))
        .or_else(|| visible.first().copied())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SectionQuery {
    #[serde(default)]
    section: Option<String>,
}

pub fn parse_section_query(search: &str) -> Option<Section> {
    let query: SectionQuery = serde_qs::from_str(search.trim_start_matches('?')).ok()?;
    query.section.as_deref().and_then(Section::from_key)
}

pub fn section_query(section: Section) -> String {
    let query = SectionQuery {
        section: Some(section.key().to_string()),
    };
    format!("?{}", serde_qs::to_string(&query).unwrap_or_default())
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    /// Requested section; what is shown is resolved against permissions
    pub active: RwSignal<Option<Section>>,
    pub sidebar_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(None),
            sidebar_open: RwSignal::new(true),
        }
    }

    /// Restore the section from the URL, then keep the URL in sync
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if let Some(section) = parse_section_query(&search) {
            log::debug!("section {} restored from url", section.key());
            self.active.set(Some(section));
        }

        let active = self.active;
        Effect::new(move |_| {
            let Some(section) = active.get() else {
                return;
            };
            let new_url = section_query(section);
            let Some(w) = window() else {
                return;
            };
            let current = w.location().search().unwrap_or_default();
            if current != new_url {
                if let Ok(history) = w.history() {
                    let _ = history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some(&new_url),
                    );
                }
            }
        });
    }

    pub fn activate(&self, section: Section) {
        log::debug!("activate section {}", section.key());
        self.active.set(Some(section));
    }

    pub fn toggle_sidebar(&self) {
        self.sidebar_open.update(|open| *open = !*open);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
