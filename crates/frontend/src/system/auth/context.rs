use contracts::system::auth::{LoginRequest, RegisterForm};
use contracts::system::users::User;
use leptos::prelude::*;

use super::api::HttpAuthApi;
use super::permissions::PermissionEvaluator;
use super::session::{AuthError, SessionStore};
use super::storage::BrowserStorage;

/// Reactive handle on the session, shared through context
#[derive(Clone, Copy)]
pub struct SessionContext {
    store: RwSignal<SessionStore<BrowserStorage>>,
}

impl SessionContext {
    /// Restore from local storage once, at startup
    pub fn restore() -> Self {
        Self {
            store: RwSignal::new(SessionStore::restore(BrowserStorage)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.with(|s| s.is_authenticated())
    }

    pub fn user(&self) -> Option<User> {
        self.store.with(|s| s.user().cloned())
    }

    pub fn username(&self) -> Option<String> {
        self.store.with(|s| s.user().map(|u| u.username.clone()))
    }

    /// Tracked: re-evaluated whenever the session changes
    pub fn permissions(&self) -> PermissionEvaluator {
        self.store
            .with(|s| PermissionEvaluator::for_session(s.session()))
    }

    pub fn can(&self, permission: &str) -> bool {
        self.permissions().has_permission(permission)
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<(), AuthError> {
        let mut store = self.store.get_untracked();
        store.authenticate(&HttpAuthApi, &credentials).await?;
        self.store.set(store);
        Ok(())
    }

    pub async fn register(&self, form: RegisterForm) -> Result<(), AuthError> {
        let mut store = self.store.get_untracked();
        store.register(&HttpAuthApi, &form).await?;
        self.store.set(store);
        Ok(())
    }

    pub fn logout(&self) {
        log::info!("logout");
        self.store.update(|s| s.logout());
    }
}

pub fn provide_session() -> SessionContext {
    let session = SessionContext::restore();
    provide_context(session);
    session
}

/// Hook to access the session
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext not found in component tree")
}
