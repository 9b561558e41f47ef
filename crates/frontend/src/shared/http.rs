//! HTTP access to the inventory backend
//!
//! Every call goes through [`ApiClient`], which joins paths onto the
//! configured base, attaches the bearer token read from local storage and
//! turns non-2xx responses into a classified [`ApiError`].

use contracts::domain::common::ErrorBody;
use contracts::shared::FieldErrors;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::api_base;
use crate::system::auth::storage::{BrowserStorage, KeyValueStorage, ACCESS_TOKEN_KEY};

/// Failure of a backend call, classified by status code.
///
/// `Display` is the message shown to the user; text supplied by the backend
/// replaces the default wording of its class.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Impossible de se connecter au serveur. Vérifiez votre connexion.")]
    Network { detail: String },

    #[error("{}", text_or(.message, "Non authentifié : identifiants invalides ou session expirée"))]
    Unauthorized { message: Option<String> },

    #[error("{}", text_or(.message, "Accès refusé : permission insuffisante"))]
    Forbidden { message: Option<String> },

    #[error("{}", text_or(.message, "Ressource introuvable"))]
    NotFound { message: Option<String> },

    /// 400, 409 and 422: the request was understood and refused
    #[error("{}", rejected_text(.status, .message))]
    Rejected {
        status: u16,
        message: Option<String>,
        fields: FieldErrors,
    },

    #[error("{}", text_or(.message, "Erreur serveur. Veuillez réessayer plus tard."))]
    Server { status: u16, message: Option<String> },

    #[error("{}", unexpected_text(.status, .message))]
    Unexpected { status: u16, message: Option<String> },

    #[error("Impossible de préparer la requête")]
    Encode(String),

    #[error("Réponse du serveur illisible")]
    Decode(String),
}

fn text_or<'a>(message: &'a Option<String>, default: &'a str) -> &'a str {
    message.as_deref().unwrap_or(default)
}

fn rejected_text(status: &u16, message: &Option<String>) -> String {
    match (message, status) {
        (Some(text), _) => text.clone(),
        (None, 409) => "Conflit : la ressource existe déjà".to_string(),
        (None, _) => "Données de la requête invalides".to_string(),
    }
}

fn unexpected_text(status: &u16, message: &Option<String>) -> String {
    message
        .clone()
        .unwrap_or_else(|| format!("Erreur : {}", status))
}

impl ApiError {
    /// Classify a failed response from its status and raw body
    pub fn from_status(status: u16, raw_body: &str) -> Self {
        let body = ErrorBody::parse(raw_body);
        let message = body.text();
        match status {
            0 => Self::Network {
                detail: message.unwrap_or_default(),
            },
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            400 | 409 | 422 => Self::Rejected {
                status,
                message,
                fields: body
                    .errors
                    .map(|errors| errors.into_iter().collect())
                    .unwrap_or_default(),
            },
            s if s >= 500 => Self::Server { status, message },
            _ => Self::Unexpected { status, message },
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Field markers the backend attached to a refused request
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

/// Login and registration are the only anonymous endpoints
pub fn needs_bearer(path: &str) -> bool {
    !(path.contains("/auth/login") || path.contains("/auth/register"))
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self { base: api_base() }
    }

    fn builder(&self, method: HttpMethod, path: &str) -> RequestBuilder {
        let url = join_url(&self.base, path);
        let builder = match method {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
            HttpMethod::Put => Request::put(&url),
            HttpMethod::Delete => Request::delete(&url),
        };
        if !needs_bearer(path) {
            return builder;
        }
        match BrowserStorage.get(ACCESS_TOKEN_KEY) {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<Response, ApiError> {
        let builder = self.builder(method, path);
        let sent = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(json)
                .map_err(|e| ApiError::Encode(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| {
            log::warn!("{:?} {} failed: {}", method, path, e);
            ApiError::Network {
                detail: e.to_string(),
            }
        })?;

        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let raw = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &raw);
        log::warn!("{:?} {} -> {}: {}", method, path, status, error);
        Err(error)
    }

    fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
        serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(HttpMethod::Get, path, None).await?;
        Self::decode(response).await
    }

    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let response = self.send(HttpMethod::Get, path, None).await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(HttpMethod::Post, path, Some(Self::encode(body)?))
            .await?;
        Self::decode(response).await
    }

    /// POST whose response body is not needed
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.send(HttpMethod::Post, path, Some(Self::encode(body)?))
            .await
            .map(drop)
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.send(HttpMethod::Put, path, Some(Self::encode(body)?))
            .await
            .map(drop)
    }

    /// PUT on an action endpoint that takes no payload
    pub async fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(HttpMethod::Put, path, Some("{}".to_string()))
            .await
            .map(drop)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(HttpMethod::Delete, path, None).await.map(drop)
    }
}
