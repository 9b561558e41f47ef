use crate::shared::validation::{FieldErrors, FieldSpec, Pattern, ValidationRules};
use crate::system::users::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub const USERNAME: FieldSpec =
        FieldSpec::new("username", "Nom d'utilisateur", ValidationRules::required());
    pub const PASSWORD: FieldSpec =
        FieldSpec::new("password", "Mot de passe", ValidationRules::required());

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check_text(&Self::USERNAME, &self.username);
        errors.check_text(&Self::PASSWORD, &self.password);
        errors
    }
}

/// Roles selectable at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    PurchasingManager,
    #[default]
    WarehouseKeeper,
    WorkshopManager,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        Self::Admin,
        Self::PurchasingManager,
        Self::WarehouseKeeper,
        Self::WorkshopManager,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::PurchasingManager => "PURCHASING_MANAGER",
            Self::WarehouseKeeper => "WAREHOUSE_KEEPER",
            Self::WorkshopManager => "WORKSHOP_MANAGER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::PurchasingManager => "Responsable Achats",
            Self::WarehouseKeeper => "Magasinier",
            Self::WorkshopManager => "Chef d'Atelier",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}

/// Registration form as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
    pub role: UserRole,
}

impl RegisterForm {
    pub const USERNAME: FieldSpec = FieldSpec::new(
        "username",
        "Nom d'utilisateur",
        ValidationRules::required().min_length(3).max_length(50),
    );
    pub const EMAIL: FieldSpec = FieldSpec::new(
        "email",
        "Email",
        ValidationRules::required().pattern(Pattern::Email),
    );
    pub const FIRST_NAME: FieldSpec =
        FieldSpec::new("firstName", "Prénom", ValidationRules::required());
    pub const LAST_NAME: FieldSpec = FieldSpec::new("lastName", "Nom", ValidationRules::required());
    pub const PASSWORD: FieldSpec = FieldSpec::new(
        "password",
        "Mot de passe",
        ValidationRules::required().min_length(6),
    );
    pub const CONFIRM_PASSWORD: FieldSpec = FieldSpec::new(
        "confirmPassword",
        "Confirmation",
        ValidationRules::required(),
    );

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check_text(&Self::USERNAME, &self.username);
        errors.check_text(&Self::EMAIL, &self.email);
        errors.check_text(&Self::FIRST_NAME, &self.first_name);
        errors.check_text(&Self::LAST_NAME, &self.last_name);
        errors.check_text(&Self::PASSWORD, &self.password);
        errors.check_text(&Self::CONFIRM_PASSWORD, &self.confirm_password);
        if errors.get(Self::CONFIRM_PASSWORD.name).is_none() && self.password != self.confirm_password {
            errors.insert(
                Self::CONFIRM_PASSWORD.name,
                "Les mots de passe ne correspondent pas",
            );
        }
        errors
    }

    /// Body sent to `/auth/register`; names and confirmation stay local
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// `accessToken` when present, else `token`
    pub fn bearer(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .or(self.token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegisterForm {
        RegisterForm {
            username: "amina".into(),
            email: "amina@tricol.ma".into(),
            first_name: "Amina".into(),
            last_name: "Alaoui".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            role: UserRole::default(),
        }
    }

    #[test]
    fn test_register_rules() {
        assert!(filled().validate().is_empty());

        let mut form = filled();
        form.username = "ab".into();
        form.confirm_password = "secret2".into();
        let errors = form.validate();
        assert!(errors.get("username").is_some());
        assert_eq!(
            errors.get("confirmPassword"),
            Some("Les mots de passe ne correspondent pas")
        );

        let mut form = filled();
        form.password = "abc".into();
        form.confirm_password = "abc".into();
        assert!(form.validate().get("password").is_some());
    }

    #[test]
    fn test_register_request_drops_local_fields() {
        let json = serde_json::to_value(filled().to_request()).unwrap();
        assert_eq!(json["role"], "WAREHOUSE_KEEPER");
        assert!(json.get("firstName").is_none());
        assert!(json.get("confirmPassword").is_none());
        assert_eq!(UserRole::from_code("WORKSHOP_MANAGER"), Some(UserRole::WorkshopManager));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginRequest { username: "x".into(), password: String::new() }.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn test_bearer_prefers_access_token() {
        let resp: AuthResponse = serde_json::from_str(
            r#"{"token":"legacy","accessToken":"fresh","refreshToken":"r","user":{"id":1,"username":"a"}}"#,
        )
        .unwrap();
        assert_eq!(resp.bearer(), Some("fresh"));

        let resp: AuthResponse = serde_json::from_str(r#"{"token":"legacy"}"#).unwrap();
        assert_eq!(resp.bearer(), Some("legacy"));
        assert!(resp.user.is_none());
    }
}
