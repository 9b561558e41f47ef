/// Backend identifier of a persisted record
pub type RowId = i64;

/// Records that carry a stable backend identity
pub trait Identified {
    fn row_id(&self) -> RowId;
}

/// Wire-format error body returned by the backend on failures.
///
/// Field names vary between endpoints (`message`, `Erreur`, `error`), and
/// validation failures may carry a field → message map.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "Erreur", default)]
    pub erreur: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<std::collections::BTreeMap<String, String>>,
}

impl ErrorBody {
    /// Parse a raw response body; anything unparseable yields an empty body
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Most specific human-readable text the backend supplied
    pub fn text(&self) -> Option<String> {
        [&self.message, &self.erreur, &self.error]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_message() {
        let body = ErrorBody::parse(r#"{"message":"Doublon","Erreur":"autre"}"#);
        assert_eq!(body.text().as_deref(), Some("Doublon"));

        let body = ErrorBody::parse(r#"{"Erreur":"Commande déjà validée"}"#);
        assert_eq!(body.text().as_deref(), Some("Commande déjà validée"));
    }

    #[test]
    fn test_error_body_tolerates_garbage() {
        let body = ErrorBody::parse("<html>502</html>");
        assert!(body.text().is_none());
        assert!(body.errors.is_none());
    }

    #[test]
    fn test_error_body_field_errors() {
        let body = ErrorBody::parse(r#"{"errors":{"email":"déjà utilisé"}}"#);
        let errors = body.errors.unwrap_or_default();
        assert_eq!(errors.get("email").map(String::as_str), Some("déjà utilisé"));
    }
}
