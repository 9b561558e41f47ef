//! Authenticated session and its persistence
//!
//! [`SessionStore`] is the single writer of the auth keys in local storage.
//! In-memory state and storage change together: a successful
//! authentication writes both, logout clears both, failures touch neither.

use contracts::shared::FieldErrors;
use contracts::system::auth::{AuthResponse, LoginRequest, RegisterForm};
use contracts::system::users::User;
use thiserror::Error;

use super::api::AuthApi;
use super::storage::{KeyValueStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use crate::shared::http::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// Rejected before contacting the backend
    #[error("{}", first_message(.0))]
    Invalid(FieldErrors),

    #[error("Réponse d'authentification invalide")]
    MalformedResponse,

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn first_message(errors: &FieldErrors) -> &str {
    errors
        .iter()
        .next()
        .map(|(_, message)| message)
        .unwrap_or("Formulaire invalide")
}

impl AuthError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Api(api) => api.field_errors(),
            Self::MalformedResponse => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStore<S> {
    storage: S,
    current: Option<Session>,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// Rebuild the session persisted in `storage`.
    ///
    /// Unparseable or partial data is cleared, as if the user had logged out.
    pub fn restore(storage: S) -> Self {
        let mut store = Self {
            storage,
            current: None,
        };

        let token = store.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty());
        let raw_user = store.storage.get(USER_KEY);
        match (raw_user, token) {
            (Some(raw), Some(access_token)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    log::info!("session restored for {}", user.username);
                    store.current = Some(Session {
                        user,
                        access_token,
                        refresh_token: store.storage.get(REFRESH_TOKEN_KEY),
                    });
                }
                Err(e) => {
                    log::warn!("stored user unreadable, clearing session: {}", e);
                    store.logout();
                }
            },
            (None, None) => {
                if store.storage.get(REFRESH_TOKEN_KEY).is_some() {
                    store.logout();
                }
            }
            _ => {
                log::warn!("partial session in storage, clearing");
                store.logout();
            }
        }
        store
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| !s.access_token.is_empty())
    }

    pub async fn authenticate<A: AuthApi>(
        &mut self,
        api: &A,
        credentials: &LoginRequest,
    ) -> Result<Session, AuthError> {
        let errors = credentials.validate();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }
        let response = api.login(credentials).await?;
        self.establish(response)
    }

    pub async fn register<A: AuthApi>(
        &mut self,
        api: &A,
        form: &RegisterForm,
    ) -> Result<Session, AuthError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }
        let response = api.register(&form.to_request()).await?;
        if let Some(message) = response.message.as_deref() {
            log::info!("register: {}", message);
        }
        self.establish(response)
    }

    /// Keep the session carried by a successful auth response
    pub fn establish(&mut self, response: AuthResponse) -> Result<Session, AuthError> {
        let access_token = response
            .bearer()
            .map(str::to_string)
            .ok_or(AuthError::MalformedResponse)?;
        let user = response.user.ok_or(AuthError::MalformedResponse)?;
        let raw_user = serde_json::to_string(&user).map_err(|_| AuthError::MalformedResponse)?;

        self.storage.set(ACCESS_TOKEN_KEY, &access_token);
        match response.refresh_token.as_deref() {
            Some(refresh) => self.storage.set(REFRESH_TOKEN_KEY, refresh),
            None => self.storage.remove(REFRESH_TOKEN_KEY),
        }
        self.storage.set(USER_KEY, &raw_user);

        log::info!("signed in as {}", user.username);
        let session = Session {
            user,
            access_token,
            refresh_token: response.refresh_token,
        };
        self.current = Some(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        self.current = None;
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }
}
